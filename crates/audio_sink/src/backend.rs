//! Backend selection
//!
//! One variant per destination kind; the sink stores exactly one of them.

use contracts::{AudioTransport, BackendKind, ContractError, Destination};

use crate::sinks::{FileTransport, UdpTransport, WebsocketTransport};

/// The single active delivery backend of a sink
pub enum Backend {
    Udp(UdpTransport),
    File(FileTransport),
    Websocket(WebsocketTransport),
    Disabled,
}

impl Backend {
    /// Activate the backend a destination asks for
    ///
    /// # Errors
    /// Resolution, socket, file or listener failures. The caller decides
    /// whether to fall back to [`Backend::Disabled`].
    pub fn open(destination: &Destination, debug: u32) -> Result<Self, ContractError> {
        Ok(match destination {
            Destination::Udp { host, .. } => Self::Udp(UdpTransport::open(host, debug)?),
            Destination::File { path } => Self::File(FileTransport::open(path, debug)?),
            Destination::Websocket { port } => {
                Self::Websocket(WebsocketTransport::start(*port, debug)?)
            }
            Destination::Disabled => Self::Disabled,
        })
    }

    /// Active transport, if any
    pub fn transport(&self) -> Option<&dyn AudioTransport> {
        match self {
            Self::Udp(t) => Some(t),
            Self::File(t) => Some(t),
            Self::Websocket(t) => Some(t),
            Self::Disabled => None,
        }
    }

    fn transport_mut(&mut self) -> Option<&mut dyn AudioTransport> {
        match self {
            Self::Udp(t) => Some(t),
            Self::File(t) => Some(t),
            Self::Websocket(t) => Some(t),
            Self::Disabled => None,
        }
    }

    /// Backend kind
    pub fn kind(&self) -> BackendKind {
        self.transport()
            .map_or(BackendKind::Disabled, |t| t.kind())
    }

    /// Close the active transport and switch to [`Backend::Disabled`]
    pub fn shutdown(&mut self) {
        if let Some(transport) = self.transport_mut() {
            transport.close();
        }
        *self = Self::Disabled;
    }
}
