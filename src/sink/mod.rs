//! Output sink with connection health tracking
//!
//! An [`OutputSink`] owns exactly one active destination: the local stream
//! or a connection to a remote collector. Before each record is written the
//! logger asks the sink to verify the remote connection and, if it is gone,
//! to dial once more. When that fails, records go to the local stream until
//! a later call manages to reconnect.
//!
//! Transport faults never reach the logging caller. They are counted in
//! [`SinkMetrics`] and reported on stderr.

pub mod local;
pub mod transport;

pub use local::LocalStream;
pub use transport::{Connection, TcpConnection, TcpTransport, Transport};

use crate::core::{LoggerError, Result, SinkMetrics};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Health of the remote side of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Where the next record is written
enum Destination {
    Local,
    Remote(Box<dyn Connection>),
}

struct RemoteTarget {
    address: String,
    transport: Arc<dyn Transport>,
}

struct SinkState {
    local: LocalStream,
    destination: Destination,
}

impl SinkState {
    fn status(&self) -> ConnectionStatus {
        match self.destination {
            Destination::Remote(_) => ConnectionStatus::Connected,
            Destination::Local => ConnectionStatus::Disconnected,
        }
    }

    /// Close the live connection, if any, and fall back to the local stream
    fn fall_back_to_local(&mut self) {
        if let Destination::Remote(mut conn) =
            std::mem::replace(&mut self.destination, Destination::Local)
        {
            let _ = conn.close();
        }
    }
}

/// Thread-safe write destination with lazy reconnect
///
/// `status` is derived from the destination: a sink is `Connected` exactly
/// when a remote connection is installed. All state changes happen under one
/// mutex, so concurrent writers never interleave bytes and never race on the
/// connection.
pub struct OutputSink {
    remote: Option<RemoteTarget>,
    state: Mutex<SinkState>,
    metrics: SinkMetrics,
}

impl OutputSink {
    /// Sink that always writes to `local`; no reconnect logic ever runs
    pub fn local(local: LocalStream) -> Self {
        Self {
            remote: None,
            state: Mutex::new(SinkState {
                local,
                destination: Destination::Local,
            }),
            metrics: SinkMetrics::new(),
        }
    }

    /// Dial `address` synchronously and build a sink streaming to it
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Connection`] if the first dial fails.
    pub fn connect(
        address: impl Into<String>,
        transport: Arc<dyn Transport>,
        local: LocalStream,
    ) -> Result<Self> {
        let address = address.into();
        let metrics = SinkMetrics::new();

        metrics.record_dial();
        let conn = transport
            .dial(&address)
            .map_err(|err| LoggerError::connection(address.clone(), err))?;

        Ok(Self {
            remote: Some(RemoteTarget { address, transport }),
            state: Mutex::new(SinkState {
                local,
                destination: Destination::Remote(conn),
            }),
            metrics,
        })
    }

    /// Collector address, `None` for a local-only sink
    pub fn remote_address(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.address.as_str())
    }

    /// Current remote health, `None` for a local-only sink
    pub fn status(&self) -> Option<ConnectionStatus> {
        self.remote.as_ref()?;
        Some(self.state.lock().status())
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Whether records are currently landing on an interactive terminal
    pub fn is_terminal(&self) -> bool {
        let state = self.state.lock();
        match state.destination {
            Destination::Local => state.local.is_terminal(),
            Destination::Remote(_) => false,
        }
    }

    /// Probe the remote connection
    ///
    /// Always healthy for a local-only sink. With no connection installed
    /// the sink is unhealthy. A failed probe closes the connection and marks
    /// the sink disconnected.
    pub fn ensure_healthy(&self) -> bool {
        let Some(remote) = &self.remote else {
            return true;
        };

        let mut state = self.state.lock();
        let probe = match &mut state.destination {
            Destination::Local => return false,
            Destination::Remote(conn) => conn.probe(),
        };

        match probe {
            Ok(()) => true,
            Err(err) => {
                state.fall_back_to_local();
                let count = self.metrics.record_disconnect();
                if should_alert(count) {
                    eprintln!(
                        "[LOGGER WARNING] Lost connection to log collector at {}: {}. \
                         Writing locally until it comes back.",
                        remote.address, err
                    );
                }
                false
            }
        }
    }

    /// Dial the collector once
    ///
    /// Returns `true` when a connection is installed, either by this call or
    /// by a concurrent caller that got the lock first. On failure the local
    /// stream stays active and `false` is returned; nothing is retried.
    pub fn reconnect(&self) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };

        let mut state = self.state.lock();
        if state.status() == ConnectionStatus::Connected {
            return true;
        }
        state.fall_back_to_local();

        self.metrics.record_dial();
        match remote.transport.dial(&remote.address) {
            Ok(conn) => {
                state.destination = Destination::Remote(conn);
                self.metrics.record_reconnect();
                true
            }
            Err(err) => {
                let count = self.metrics.record_failed_reconnect();
                if should_alert(count) {
                    eprintln!(
                        "[LOGGER WARNING] Reconnect to log collector at {} failed ({} so far): {}",
                        remote.address,
                        count + 1,
                        err
                    );
                }
                false
            }
        }
    }

    /// Verify the remote connection and reconnect if needed
    ///
    /// No-op for a local-only sink.
    pub fn check_and_reconnect(&self) {
        if self.remote.is_some() && !self.ensure_healthy() {
            self.reconnect();
        }
    }

    /// Write one rendered record to the active destination
    ///
    /// Errors are observed and discarded: logging must not fail at the call
    /// site, and the record is not retried. A failed remote write drops the
    /// connection, so the next log call redials before writing.
    pub fn write(&self, bytes: &[u8]) {
        let mut state = self.state.lock();
        let SinkState { local, destination } = &mut *state;

        let (result, remote) = match destination {
            Destination::Local => (write_record(local, bytes), false),
            Destination::Remote(conn) => (write_record(conn.as_mut(), bytes), true),
        };

        match result {
            Ok(()) if remote => {
                self.metrics.record_remote_write();
            }
            Ok(()) => {
                self.metrics.record_local_write();
            }
            Err(err) => {
                let count = self.metrics.record_write_failure();
                if should_alert(count) {
                    eprintln!(
                        "[LOGGER ERROR] Failed to write log record ({} failures so far): {}",
                        count + 1,
                        err
                    );
                }
                if remote {
                    state.fall_back_to_local();
                    self.metrics.record_disconnect();
                }
            }
        }
    }

    /// Flush the active destination
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        let SinkState { local, destination } = &mut *state;
        match destination {
            Destination::Local => local.flush()?,
            Destination::Remote(conn) => conn.flush()?,
        }
        Ok(())
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let _ = state.local.flush();
        if let Destination::Remote(conn) = &mut state.destination {
            let _ = conn.flush();
            let _ = conn.close();
        }
    }
}

fn write_record<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

/// Alert on the first fault and every 1000th after it
fn should_alert(previous_count: u64) -> bool {
    previous_count == 0 || (previous_count + 1) % 1000 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeTransport, SharedBuffer};
    use std::thread;

    fn remote_sink(fake: &FakeTransport, buffer: &SharedBuffer) -> OutputSink {
        OutputSink::connect(
            "collector:5001",
            Arc::new(fake.clone()),
            LocalStream::writer(buffer.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_local_sink_never_dials() {
        let buffer = SharedBuffer::new();
        let sink = OutputSink::local(LocalStream::writer(buffer.clone()));

        assert!(sink.ensure_healthy());
        assert!(!sink.reconnect());
        sink.check_and_reconnect();
        sink.write(b"local\n");

        assert_eq!(sink.status(), None);
        assert_eq!(sink.remote_address(), None);
        assert_eq!(sink.metrics().dial_attempts(), 0);
        assert_eq!(buffer.contents(), "local\n");
    }

    #[test]
    fn test_connect_failure_is_construction_error() {
        let fake = FakeTransport::new();
        fake.set_reachable(false);

        let result = OutputSink::connect(
            "collector:5001",
            Arc::new(fake.clone()),
            LocalStream::writer(SharedBuffer::new()),
        );

        match result {
            Err(LoggerError::Connection { address, .. }) => assert_eq!(address, "collector:5001"),
            _ => panic!("expected connection error"),
        }
        assert_eq!(fake.dials(), 1);
    }

    #[test]
    fn test_healthy_connection_receives_writes() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        assert!(sink.ensure_healthy());
        sink.write(b"remote\n");

        assert_eq!(sink.status(), Some(ConnectionStatus::Connected));
        assert_eq!(fake.received(), "remote\n");
        assert!(buffer.contents().is_empty());
        assert_eq!(sink.metrics().remote_writes(), 1);
    }

    #[test]
    fn test_failed_probe_closes_and_disconnects() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        fake.drop_connections();

        assert!(!sink.ensure_healthy());
        assert_eq!(sink.status(), Some(ConnectionStatus::Disconnected));
        assert_eq!(fake.closes(), 1);
        assert_eq!(sink.metrics().disconnects(), 1);

        // No connection installed: unhealthy without probing again
        assert!(!sink.ensure_healthy());
        assert_eq!(sink.metrics().disconnects(), 1);
    }

    #[test]
    fn test_reconnect_failure_falls_back_to_local() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        fake.drop_connections();
        fake.set_reachable(false);

        sink.check_and_reconnect();
        sink.write(b"fallback\n");

        assert_eq!(sink.status(), Some(ConnectionStatus::Disconnected));
        assert_eq!(buffer.contents(), "fallback\n");
        assert_eq!(sink.metrics().failed_reconnects(), 1);
        assert_eq!(sink.metrics().local_writes(), 1);
    }

    #[test]
    fn test_reconnect_success_restores_remote() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        fake.drop_connections();
        fake.set_reachable(false);
        sink.check_and_reconnect();
        sink.write(b"one\n");

        fake.set_reachable(true);
        sink.check_and_reconnect();
        sink.write(b"two\n");

        assert_eq!(sink.status(), Some(ConnectionStatus::Connected));
        assert_eq!(buffer.contents(), "one\n");
        assert_eq!(fake.received(), "two\n");
        assert_eq!(fake.dials(), 3);
        assert_eq!(sink.metrics().reconnects(), 1);
    }

    #[test]
    fn test_reconnect_when_connected_does_not_dial() {
        let fake = FakeTransport::new();
        let sink = remote_sink(&fake, &SharedBuffer::new());

        assert!(sink.reconnect());
        assert_eq!(fake.dials(), 1);
    }

    #[test]
    fn test_write_failure_is_absorbed_and_disconnects() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        // The connection passes its check but refuses the write
        fake.set_fail_writes(true);
        assert!(sink.ensure_healthy());
        sink.write(b"lost\n");

        assert_eq!(sink.metrics().write_failures(), 1);
        assert_eq!(sink.metrics().disconnects(), 1);
        assert_eq!(sink.status(), Some(ConnectionStatus::Disconnected));
        assert_eq!(fake.closes(), 1);
        assert!(buffer.contents().is_empty());

        // The next record redials instead of reusing the broken connection
        fake.set_fail_writes(false);
        sink.check_and_reconnect();
        sink.write(b"next\n");

        assert_eq!(fake.dials(), 2);
        assert_eq!(fake.received(), "next\n");
        assert_eq!(sink.status(), Some(ConnectionStatus::Connected));
    }

    #[test]
    fn test_write_failure_with_collector_gone_goes_local() {
        let fake = FakeTransport::new();
        let buffer = SharedBuffer::new();
        let sink = remote_sink(&fake, &buffer);

        fake.set_fail_writes(true);
        fake.set_reachable(false);
        sink.check_and_reconnect();
        sink.write(b"lost\n");

        sink.check_and_reconnect();
        sink.write(b"kept\n");

        assert_eq!(buffer.contents(), "kept\n");
        assert_eq!(sink.metrics().failed_reconnects(), 1);
    }

    #[test]
    fn test_concurrent_callers_dial_once() {
        let fake = FakeTransport::new();
        fake.set_dial_delay(std::time::Duration::from_millis(50));
        let sink = Arc::new(remote_sink(&fake, &SharedBuffer::new()));

        fake.drop_connections();

        let barrier = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sink = Arc::clone(&sink);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    sink.check_and_reconnect();
                    sink.write(b"x\n");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // One dial at construction, one reconnect
        assert_eq!(fake.dials(), 2);
        assert_eq!(fake.received(), "x\n".repeat(8));
    }

    #[test]
    fn test_drop_closes_connection() {
        let fake = FakeTransport::new();
        let sink = remote_sink(&fake, &SharedBuffer::new());

        drop(sink);
        assert_eq!(fake.closes(), 1);
    }

    #[test]
    fn test_should_alert_cadence() {
        assert!(should_alert(0));
        assert!(!should_alert(1));
        assert!(should_alert(999));
        assert!(!should_alert(1000));
    }
}
