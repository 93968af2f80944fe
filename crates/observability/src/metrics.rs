//! 音频输出指标记录模块
//!
//! 通过 `metrics` facade 记录；未安装 recorder 时为空操作。

use contracts::{AudioFlag, BackendKind};
use metrics::{counter, gauge, histogram};

/// 记录一次发送
///
/// `delivered < requested` 视为降级发送。
pub fn record_send(backend: BackendKind, requested: usize, delivered: usize) {
    let status = if delivered >= requested {
        "complete"
    } else if delivered == 0 {
        "dropped"
    } else {
        "partial"
    };

    counter!(
        "audio_sink_sends_total",
        "backend" => backend.as_str(),
        "status" => status
    )
    .increment(1);

    counter!("audio_sink_bytes_total", "backend" => backend.as_str()).increment(delivered as u64);

    histogram!("audio_sink_send_bytes", "backend" => backend.as_str()).record(requested as f64);
}

/// 记录控制标志发送
pub fn record_flag(backend: BackendKind, flag: AudioFlag, slot: u16, delivered: bool) {
    counter!(
        "audio_sink_flags_total",
        "backend" => backend.as_str(),
        "flag" => format!("{flag:?}").to_lowercase(),
        "slot" => slot.to_string(),
        "delivered" => delivered.to_string()
    )
    .increment(1);
}

/// 记录 sink 计数器快照
pub fn record_sink_snapshot(
    backend: BackendKind,
    bytes_sent: u64,
    short_count: u64,
    dropped_count: u64,
) {
    gauge!("audio_sink_bytes_sent", "backend" => backend.as_str()).set(bytes_sent as f64);
    gauge!("audio_sink_short_sends", "backend" => backend.as_str()).set(short_count as f64);
    gauge!("audio_sink_dropped_sends", "backend" => backend.as_str()).set(dropped_count as f64);
}
