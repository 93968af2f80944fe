//! Destination descriptors
//!
//! A destination is parsed once when a sink is built and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// UDP port used when a `udp://` destination omits one
pub const DEFAULT_UDP_PORT: u16 = 23456;

/// Where decoded audio goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Datagrams to `host`, base port `port`
    Udp { host: String, port: u16 },
    /// Raw bytes written into a local file
    File { path: PathBuf },
    /// Websocket server listening on `port`
    Websocket { port: u16 },
    /// Nothing matched; every send is a no-op
    Disabled,
}

impl Destination {
    /// Backend kind this destination activates
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Udp { .. } => BackendKind::Udp,
            Self::File { .. } => BackendKind::File,
            Self::Websocket { .. } => BackendKind::Websocket,
            Self::Disabled => BackendKind::Disabled,
        }
    }

    /// Base port for port-addressed destinations
    pub fn port(&self) -> Option<u16> {
        match self {
            Self::Udp { port, .. } | Self::Websocket { port } => Some(*port),
            Self::File { .. } | Self::Disabled => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udp { host, port } => write!(f, "udp://{host}:{port}"),
            Self::File { path } => write!(f, "file://{}", path.display()),
            Self::Websocket { port } => write!(f, "ws:{port}"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// Backend selector, one per destination variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Udp,
    File,
    Websocket,
    Disabled,
}

impl BackendKind {
    /// Stable name used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::File => "file",
            Self::Websocket => "websocket",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
