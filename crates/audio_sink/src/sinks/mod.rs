//! Transport backends
//!
//! Contains UdpTransport, FileTransport, and WebsocketTransport.

mod file;
mod udp;
mod websocket;

pub use self::file::FileTransport;
pub use self::udp::UdpTransport;
pub use self::websocket::{EchoHandler, WebsocketTransport, WsEventHandler};
