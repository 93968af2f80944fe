//! 配置校验模块
//!
//! 校验规则：
//! - destination 与 host 二选一
//! - port 仅与 host 一起使用
//! - destination / host 非空
//! - chunk_bytes 在 1..=65507 之间

use contracts::{ContractError, RelayConfig, MAX_DATAGRAM_BYTES};

/// 校验 RelayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_sink(config)?;
    validate_stream(config)?;
    Ok(())
}

/// 校验输出目标
fn validate_sink(config: &RelayConfig) -> Result<(), ContractError> {
    let sink = &config.sink;

    match (&sink.destination, &sink.host) {
        (Some(_), Some(_)) => {
            return Err(ContractError::config_validation(
                "sink",
                "set either 'destination' or 'host', not both",
            ))
        }
        (None, None) => {
            return Err(ContractError::config_validation(
                "sink",
                "one of 'destination' or 'host' is required",
            ))
        }
        (Some(destination), None) if destination.trim().is_empty() => {
            return Err(ContractError::config_validation(
                "sink.destination",
                "must not be empty",
            ))
        }
        (None, Some(host)) if host.trim().is_empty() => {
            return Err(ContractError::config_validation(
                "sink.host",
                "must not be empty",
            ))
        }
        _ => {}
    }

    if sink.port.is_some() && sink.host.is_none() {
        return Err(ContractError::config_validation(
            "sink.port",
            "only valid together with 'host'; put the port in the destination instead",
        ));
    }

    Ok(())
}

/// 校验流配置
fn validate_stream(config: &RelayConfig) -> Result<(), ContractError> {
    let chunk = config.stream.chunk_bytes;
    if chunk == 0 || chunk > MAX_DATAGRAM_BYTES {
        return Err(ContractError::config_validation(
            "stream.chunk_bytes",
            format!("must be in 1..={MAX_DATAGRAM_BYTES}, got {chunk}"),
        ));
    }
    Ok(())
}
