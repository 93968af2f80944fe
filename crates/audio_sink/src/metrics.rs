//! Delivery counters for a sink

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Sends that reached a backend
    send_count: AtomicU64,
    /// Total bytes delivered
    bytes_sent: AtomicU64,
    /// Sends that delivered fewer bytes than requested
    short_count: AtomicU64,
    /// Control flags the active backend does not carry
    suppressed_count: AtomicU64,
    /// Sends discarded because no backend is active
    dropped_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one send that reached a backend
    pub fn record_send(&self, requested: usize, delivered: usize) {
        self.send_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(delivered as u64, Ordering::Relaxed);
        if delivered < requested {
            self.short_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get send count
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::Relaxed)
    }

    /// Get bytes delivered
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Get short send count
    pub fn short_count(&self) -> u64 {
        self.short_count.load(Ordering::Relaxed)
    }

    /// Get suppressed flag count
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count.load(Ordering::Relaxed)
    }

    /// Increment suppressed flag count
    pub fn inc_suppressed_count(&self) {
        self.suppressed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            send_count: self.send_count(),
            bytes_sent: self.bytes_sent(),
            short_count: self.short_count(),
            suppressed_count: self.suppressed_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub send_count: u64,
    pub bytes_sent: u64,
    pub short_count: u64,
    pub suppressed_count: u64,
    pub dropped_count: u64,
}
