//! AudioSink - the send facade used by the decoding pipeline
//!
//! Callers never check which backend is active: every send returns the
//! number of bytes delivered, which is 0 when nothing is active.

use std::net::SocketAddr;

use contracts::{AudioFlag, BackendKind, Destination, SinkConfig};
use tracing::{debug, error, info, instrument, warn};

use crate::backend::Backend;
use crate::destination::{destination_from_config, legacy_destination, parse_destination};
use crate::metrics::SinkMetrics;

/// Output sink for one configured destination
pub struct AudioSink {
    destination: Destination,
    debug: u32,
    /// Port for generic data (`send_to`)
    write_port: u16,
    /// Base port for audio channels
    audio_port: u16,
    backend: Backend,
    metrics: SinkMetrics,
}

impl AudioSink {
    /// Build from a `udp://host[:port]`, `file://path` or `ws:port` destination
    #[instrument(name = "audio_sink_new", skip(debug))]
    pub fn new(destination: &str, debug: u32) -> Self {
        Self::activate(parse_destination(destination), debug)
    }

    /// Build a UDP sink from an explicit host and port; port 0 leaves it disabled
    #[instrument(name = "audio_sink_with_host_port", skip(debug))]
    pub fn with_host_port(host: &str, port: u16, debug: u32) -> Self {
        Self::activate(legacy_destination(host, port), debug)
    }

    /// Build from configuration; `destination` wins over the legacy pair
    pub fn from_config(config: &SinkConfig) -> Self {
        Self::activate(destination_from_config(config), config.debug)
    }

    /// Open the backend for an already parsed destination
    ///
    /// Activation failures are logged and leave the sink disabled.
    pub fn activate(destination: Destination, debug: u32) -> Self {
        let port = destination.port().unwrap_or(0);

        let backend = match Backend::open(&destination, debug) {
            Ok(backend) => backend,
            Err(e) => {
                error!(destination = %destination, error = %e, "Sink disabled");
                Backend::Disabled
            }
        };

        match backend.kind() {
            BackendKind::Udp => info!(
                sink = "udp",
                destination = %destination,
                write_port = port,
                audio_port = port,
                "UDP output enabled"
            ),
            BackendKind::Disabled => debug!(destination = %destination, "No active backend"),
            kind => info!(sink = %kind, destination = %destination, "Output enabled"),
        }

        Self {
            destination,
            debug,
            write_port: port,
            audio_port: port,
            backend,
            metrics: SinkMetrics::new(),
        }
    }

    /// Send generic data to the write port
    pub fn send_to(&self, buf: &[u8]) -> usize {
        self.do_send(buf, self.write_port, false)
    }

    /// Send audio to the audio port
    pub fn send_audio(&self, buf: &[u8]) -> usize {
        self.do_send(buf, self.audio_port, false)
    }

    /// Send audio on channel `slot_id`, i.e. port `audio_port + 2 * slot_id`
    pub fn send_audio_channel(&self, buf: &[u8], slot_id: u16) -> usize {
        match self.channel_port(slot_id) {
            Some(port) => self.do_send(buf, port, false),
            None => {
                warn!(audio_port = self.audio_port, slot_id, "Channel port out of range");
                0
            }
        }
    }

    /// Send a 2 byte little endian flag on channel `slot_id`
    pub fn send_audio_flag_channel(&self, flag: AudioFlag, slot_id: u16) -> usize {
        match self.channel_port(slot_id) {
            Some(port) => self.do_send(&flag.to_le_bytes(), port, true),
            None => {
                warn!(audio_port = self.audio_port, slot_id, ?flag, "Channel port out of range");
                0
            }
        }
    }

    /// Send a flag on channel 0
    pub fn send_audio_flag(&self, flag: AudioFlag) -> usize {
        self.send_audio_flag_channel(flag, 0)
    }

    /// Port that carries audio for `slot_id`, if it fits in 16 bits
    pub fn channel_port(&self, slot_id: u16) -> Option<u16> {
        slot_id
            .checked_mul(2)
            .and_then(|offset| self.audio_port.checked_add(offset))
    }

    fn do_send(&self, buf: &[u8], port: u16, is_ctrl: bool) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let Some(transport) = self.backend.transport() else {
            self.metrics.inc_dropped_count();
            return 0;
        };
        if is_ctrl && !transport.accepts_control() {
            self.metrics.inc_suppressed_count();
            return 0;
        }

        let delivered = transport.send(buf, port, is_ctrl);
        self.metrics.record_send(buf.len(), delivered);
        delivered
    }

    /// Stop the active backend; later sends return 0. Safe to call twice.
    pub fn close(&mut self) {
        if self.backend.kind() != BackendKind::Disabled {
            debug!(destination = %self.destination, "Closing sink");
        }
        self.backend.shutdown();
    }

    /// Parsed destination
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Active backend kind
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Whether any backend is active
    pub fn is_active(&self) -> bool {
        self.backend_kind() != BackendKind::Disabled
    }

    /// Debug verbosity
    pub fn debug_level(&self) -> u32 {
        self.debug
    }

    pub fn write_port(&self) -> u16 {
        self.write_port
    }

    pub fn audio_port(&self) -> u16 {
        self.audio_port
    }

    /// Listening address of a websocket backend
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.backend {
            Backend::Websocket(ws) => Some(ws.local_addr()),
            _ => None,
        }
    }

    /// Connected websocket clients, 0 for other backends
    pub fn client_count(&self) -> usize {
        match &self.backend {
            Backend::Websocket(ws) => ws.client_count(),
            _ => 0,
        }
    }

    /// Delivery counters
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }
}

impl Drop for AudioSink {
    fn drop(&mut self) {
        self.close();
    }
}
