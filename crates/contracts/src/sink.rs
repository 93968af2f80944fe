//! AudioTransport trait - Sink backend interface
//!
//! Defines the capability every delivery backend provides.

use crate::BackendKind;

/// Byte delivery to a port-addressable channel
///
/// Implementations never report errors to the caller: failures are logged
/// where they happen and show up only as a short byte count.
pub trait AudioTransport: Send + Sync {
    /// Which backend this is (used for logging/metrics)
    fn kind(&self) -> BackendKind;

    /// Whether out-of-band flags are delivered by this backend
    fn accepts_control(&self) -> bool {
        true
    }

    /// Deliver `buf` on `port`
    ///
    /// `is_ctrl` marks out-of-band flag data. Returns the number of bytes
    /// actually delivered; an empty buffer returns 0 without any I/O.
    fn send(&self, buf: &[u8], port: u16, is_ctrl: bool) -> usize;

    /// Release the underlying resource. Calling it twice is a no-op.
    fn close(&mut self);
}
