//! Relay configuration
//!
//! Loaded from TOML/JSON by `config_loader`, overridable from the CLI.

use serde::{Deserialize, Serialize};

use crate::AudioFlag;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Where audio goes
    #[serde(default)]
    pub sink: SinkConfig,

    /// How input is chunked and addressed
    #[serde(default)]
    pub stream: StreamConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: LogSettings,
}

/// Sink destination settings
///
/// Either `destination` (scheme form) or the legacy `host` + `port` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    /// `udp://host[:port]`, `file://path` or `ws:port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Legacy UDP host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Legacy UDP port, 0 disables the sink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Debug verbosity
    #[serde(default)]
    pub debug: u32,
}

/// Input streaming settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Bytes per send, at most one UDP datagram
    #[serde(default = "default_chunk_bytes")]
    pub chunk_bytes: usize,

    /// Audio channel slot
    #[serde(default)]
    pub slot: u16,

    /// Flag sent after the last chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_flag: Option<AudioFlag>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: default_chunk_bytes(),
            slot: 0,
            end_flag: None,
        }
    }
}

/// 20 ms of 8 kHz signed 16 bit mono
fn default_chunk_bytes() -> usize {
    320
}

/// Largest UDP payload over IPv4
pub const MAX_DATAGRAM_BYTES: usize = 65507;

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Prometheus port (None = disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            level: default_log_level(),
            metrics_port: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
