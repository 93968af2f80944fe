//! Streaming statistics.

use std::time::Duration;

/// Statistics from a `stream` run
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    /// Chunks handed to the sink
    pub chunks: u64,

    /// Bytes read from input
    pub bytes_read: u64,

    /// Bytes the sink reported as delivered
    pub bytes_sent: u64,

    /// Chunks delivered only partly or not at all
    pub short_sends: u64,

    /// Whether the end-of-stream flag went out
    pub end_flag_sent: bool,

    /// Total duration of the run
    pub duration: Duration,
}

impl StreamStats {
    /// Account for one chunk
    pub fn record(&mut self, requested: usize, delivered: usize) {
        self.chunks += 1;
        self.bytes_read += requested as u64;
        self.bytes_sent += delivered as u64;
        if delivered < requested {
            self.short_sends += 1;
        }
    }

    /// Delivered bytes per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_sent as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Share of read bytes that were not delivered, as percentage
    pub fn loss_rate(&self) -> f64 {
        if self.bytes_read > 0 {
            (self.bytes_read - self.bytes_sent) as f64 / self.bytes_read as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self, destination: &str) {
        println!("\n=== Stream Summary ===\n");
        println!("  Destination: {destination}");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Chunks: {}", self.chunks);
        println!("  Bytes read: {}", self.bytes_read);
        println!("  Bytes delivered: {}", self.bytes_sent);
        println!("  Short sends: {}", self.short_sends);
        println!("  Loss: {:.2}%", self.loss_rate());
        println!("  Throughput: {:.0} B/s", self.throughput());
        println!("  End flag sent: {}", self.end_flag_sent);
        println!();
    }
}
