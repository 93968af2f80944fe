//! # Contracts
//!
//! Interface contracts shared by every crate in the workspace: destination
//! descriptors, the transport trait implemented by each backend, audio flag
//! codes, relay configuration and the layered error type.
//!
//! Business crates depend on this crate only; reverse dependencies are prohibited.

mod config;
mod destination;
mod error;
mod flag;
mod sink;

pub use config::*;
pub use destination::*;
pub use error::*;
pub use flag::AudioFlag;
pub use sink::AudioTransport;
