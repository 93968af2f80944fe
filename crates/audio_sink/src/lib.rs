//! # Audio Sink
//!
//! Output routing for decoded audio.
//!
//! Responsible for:
//! - Parsing a destination string (`udp://`, `file://`, `ws:`)
//! - Activating exactly one delivery backend
//! - Exposing one send facade that never fails, only reports bytes delivered

pub mod backend;
pub mod destination;
pub mod metrics;
pub mod resolver;
pub mod sink;
pub mod sinks;

pub use backend::Backend;
pub use contracts::{AudioFlag, AudioTransport, BackendKind, Destination, DEFAULT_UDP_PORT};
pub use destination::{
    destination_from_config, has_wav_suffix, legacy_destination, parse_destination,
};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use resolver::resolve_ipv4;
pub use sink::AudioSink;
pub use sinks::{EchoHandler, FileTransport, UdpTransport, WebsocketTransport, WsEventHandler};
