//! UdpTransport - best-effort datagrams, one socket for every channel port

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use contracts::{AudioTransport, BackendKind, ContractError};
use tracing::{debug, error, info, instrument, trace};

use crate::resolver::resolve_ipv4;

/// Sink that sends audio over UDP
///
/// The host is fixed at open time; the port is chosen per send so one
/// socket can address the base port and every channel port above it.
#[derive(Debug)]
pub struct UdpTransport {
    host: Ipv4Addr,
    socket: Option<UdpSocket>,
    debug: u32,
}

impl UdpTransport {
    /// Resolve `host` and open the sending socket
    #[instrument(name = "udp_transport_open", skip(debug))]
    pub fn open(host: &str, debug: u32) -> Result<Self, ContractError> {
        let ip = resolve_ipv4(host)?;
        Self::with_addr(ip, debug)
    }

    /// Open the sending socket for an already resolved address
    pub fn with_addr(host: Ipv4Addr, debug: u32) -> Result<Self, ContractError> {
        // Bind to any available port
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|e| ContractError::sink_open("udp", e.to_string()))?;

        if debug > 0 {
            info!(sink = "udp", %host, local = ?socket.local_addr().ok(), "UDP socket opened");
        }

        Ok(Self {
            host,
            socket: Some(socket),
            debug,
        })
    }
}

impl AudioTransport for UdpTransport {
    fn kind(&self) -> BackendKind {
        BackendKind::Udp
    }

    fn send(&self, buf: &[u8], port: u16, _is_ctrl: bool) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let Some(socket) = self.socket.as_ref() else {
            return 0;
        };

        let target = SocketAddrV4::new(self.host, port);
        match socket.send_to(buf, target) {
            Ok(sent) => {
                if self.debug >= 10 {
                    trace!(sink = "udp", %target, bytes = sent, "Sent");
                }
                sent
            }
            Err(e) => {
                // Log but don't fail - UDP is best-effort
                error!(sink = "udp", %target, len = buf.len(), error = %e, "UDP send failed");
                0
            }
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!(sink = "udp", host = %self.host, "UDP socket closed");
        }
    }
}
