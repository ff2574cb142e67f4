//! In-memory doubles shared by unit tests

use crate::sink::{Connection, Transport};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable writer whose contents can be inspected after logging
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeRemote {
    unreachable: AtomicBool,
    fail_writes: AtomicBool,
    dials: AtomicUsize,
    closes: AtomicUsize,
    dial_delay: Mutex<Option<Duration>>,
    received: Mutex<Vec<u8>>,
    live: Mutex<Vec<Arc<AtomicBool>>>,
}

/// Transport that counts dials and lets tests kill the peer
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    remote: Arc<FakeRemote>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_reachable(&self, reachable: bool) {
        self.remote.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Make writes fail while the liveness check still passes
    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.remote.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_dial_delay(&self, delay: Duration) {
        *self.remote.dial_delay.lock() = Some(delay);
    }

    /// Simulate the collector closing every open connection
    pub(crate) fn drop_connections(&self) {
        for peer_closed in self.remote.live.lock().drain(..) {
            peer_closed.store(true, Ordering::SeqCst);
        }
    }

    pub(crate) fn dials(&self) -> usize {
        self.remote.dials.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.remote.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn received(&self) -> String {
        String::from_utf8_lossy(&self.remote.received.lock()).into_owned()
    }
}

impl Transport for FakeTransport {
    fn dial(&self, _address: &str) -> io::Result<Box<dyn Connection>> {
        self.remote.dials.fetch_add(1, Ordering::SeqCst);
        let delay = *self.remote.dial_delay.lock();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if self.remote.unreachable.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "unreachable"));
        }

        let peer_closed = Arc::new(AtomicBool::new(false));
        self.remote.live.lock().push(Arc::clone(&peer_closed));
        Ok(Box::new(FakeConnection {
            remote: Arc::clone(&self.remote),
            peer_closed,
            closed: false,
        }))
    }
}

struct FakeConnection {
    remote: Arc<FakeRemote>,
    peer_closed: Arc<AtomicBool>,
    closed: bool,
}

impl Write for FakeConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed || self.peer_closed.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"));
        }
        if self.remote.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write refused"));
        }
        self.remote.received.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connection for FakeConnection {
    fn probe(&mut self) -> io::Result<()> {
        if self.peer_closed.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer closed"));
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            self.closed = true;
            self.remote.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
