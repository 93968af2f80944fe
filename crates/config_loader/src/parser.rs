//! Relay config decoding
//!
//! Decoding only; nothing here checks that a sink was selected, so partial
//! files (e.g. only `[stream]`) decode fine and are completed by the caller.

use std::path::Path;

use contracts::{ContractError, RelayConfig};

/// On-disk config encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `toml` / `json`, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format implied by the file name of `path`
    pub fn for_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse(format!("{}: no file extension", path.display()))
        })?;
        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("{}: unsupported format .{ext}", path.display()))
        })
    }
}

/// Decode `content` into a possibly incomplete relay config
pub fn decode(content: &str, format: ConfigFormat) -> Result<RelayConfig, ContractError> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ContractError::ConfigParse {
            message: format!("TOML: {e}"),
            source: Some(Box::new(e)),
        }),
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("JSON: {e}"),
                source: Some(Box::new(e)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AudioFlag, LogFormat};

    #[test]
    fn test_decode_toml_full() {
        let content = r#"
[sink]
destination = "udp://127.0.0.1:23456"
debug = 2

[stream]
chunk_bytes = 640
slot = 1
end_flag = "drain"

[observability]
log_format = "json"
level = "debug"
"#;
        let config = decode(content, ConfigFormat::Toml).unwrap();
        assert_eq!(
            config.sink.destination.as_deref(),
            Some("udp://127.0.0.1:23456")
        );
        assert_eq!(config.sink.debug, 2);
        assert_eq!(config.stream.chunk_bytes, 640);
        assert_eq!(config.stream.slot, 1);
        assert_eq!(config.stream.end_flag, Some(AudioFlag::Drain));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_decode_json_legacy_pair() {
        let content = r#"{ "sink": { "host": "localhost", "port": 23456 } }"#;
        let config = decode(content, ConfigFormat::Json).unwrap();
        assert_eq!(config.sink.host.as_deref(), Some("localhost"));
        assert_eq!(config.sink.port, Some(23456));
        assert!(config.sink.destination.is_none());
    }

    #[test]
    fn test_decode_partial_file_without_sink() {
        let config = decode("[stream]\nchunk_bytes = 160\n", ConfigFormat::Toml).unwrap();
        assert!(config.sink.destination.is_none());
        assert!(config.sink.host.is_none());
        assert_eq!(config.stream.chunk_bytes, 160);
    }

    #[test]
    fn test_decode_rejects_unknown_flag() {
        let err = decode("[stream]\nend_flag = \"hang_time\"\n", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(
            ConfigFormat::for_path(Path::new("relay.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::for_path(Path::new("relay.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::for_path(Path::new("relay.yaml")).is_err());
        assert!(ConfigFormat::for_path(Path::new("relay")).is_err());
    }
}
