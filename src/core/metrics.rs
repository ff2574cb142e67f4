//! Output sink metrics for observability
//!
//! Counters describing connection health: how often the collector was
//! dialed, how often a dead connection was detected, and where records
//! ended up.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one [`OutputSink`](crate::sink::OutputSink)
///
/// # Example
///
/// ```
/// use rust_remote_logger::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
/// metrics.record_dial();
/// metrics.record_remote_write();
///
/// assert_eq!(metrics.dial_attempts(), 1);
/// assert_eq!(metrics.remote_writes(), 1);
/// ```
#[derive(Debug)]
pub struct SinkMetrics {
    /// Dials issued to the transport, including the one made at construction
    dial_attempts: AtomicU64,

    /// Reconnects that installed a fresh connection
    reconnects: AtomicU64,

    /// Reconnect dials that failed
    failed_reconnects: AtomicU64,

    /// Dead connections detected by the liveness probe
    disconnects: AtomicU64,

    /// Records written to the remote connection
    remote_writes: AtomicU64,

    /// Records written to the local stream
    local_writes: AtomicU64,

    /// Writes that failed on the active destination and were discarded
    write_failures: AtomicU64,
}

impl SinkMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dial_attempts: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
            failed_reconnects: AtomicU64::new(0),
            disconnects: AtomicU64::new(0),
            remote_writes: AtomicU64::new(0),
            local_writes: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dial_attempts(&self) -> u64 {
        self.dial_attempts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reconnects(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_reconnects(&self) -> u64 {
        self.failed_reconnects.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn disconnects(&self) -> u64 {
        self.disconnects.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn remote_writes(&self) -> u64 {
        self.remote_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn local_writes(&self) -> u64 {
        self.local_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Record a dial; returns the previous count
    #[inline]
    pub fn record_dial(&self) -> u64 {
        self.dial_attempts.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reconnect(&self) -> u64 {
        self.reconnects.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed_reconnect(&self) -> u64 {
        self.failed_reconnects.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_disconnect(&self) -> u64 {
        self.disconnects.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_remote_write(&self) -> u64 {
        self.remote_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_local_write(&self) -> u64 {
        self.local_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dial_attempts.store(0, Ordering::Relaxed);
        self.reconnects.store(0, Ordering::Relaxed);
        self.failed_reconnects.store(0, Ordering::Relaxed);
        self.disconnects.store(0, Ordering::Relaxed);
        self.remote_writes.store(0, Ordering::Relaxed);
        self.local_writes.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SinkMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dial_attempts: AtomicU64::new(self.dial_attempts()),
            reconnects: AtomicU64::new(self.reconnects()),
            failed_reconnects: AtomicU64::new(self.failed_reconnects()),
            disconnects: AtomicU64::new(self.disconnects()),
            remote_writes: AtomicU64::new(self.remote_writes()),
            local_writes: AtomicU64::new(self.local_writes()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}
