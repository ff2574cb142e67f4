//! Helpers shared by the integration tests
#![allow(dead_code)]

use rust_remote_logger::{Connection, Transport};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Give the kernel time to deliver a FIN to the logger side
pub fn settle() {
    std::thread::sleep(Duration::from_millis(150));
}

/// Cloneable in-memory writer
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
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

pub fn bind_collector() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind collector");
    let addr = listener.local_addr().expect("collector address").to_string();
    (listener, addr)
}

pub fn accept_peer(listener: &TcpListener) -> TcpStream {
    let (peer, _) = listener.accept().expect("accept logger connection");
    peer.set_read_timeout(Some(READ_TIMEOUT)).expect("set read timeout");
    peer
}

pub fn read_line(peer: &TcpStream) -> String {
    let mut line = String::new();
    BufReader::new(peer).read_line(&mut line).expect("read record");
    line
}

#[derive(Default)]
struct FakeRemote {
    unreachable: AtomicBool,
    dials: AtomicUsize,
    dial_delay_ms: AtomicUsize,
    received: Mutex<Vec<u8>>,
    live: Mutex<Vec<Arc<AtomicBool>>>,
}

/// Transport counting dials, with a switch for reachability
#[derive(Clone, Default)]
pub struct FakeTransport {
    remote: Arc<FakeRemote>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.remote.unreachable.store(!reachable, Ordering::SeqCst);
    }

    pub fn set_dial_delay(&self, delay: Duration) {
        self.remote
            .dial_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    pub fn drop_connections(&self) {
        for peer_closed in self.remote.live.lock().drain(..) {
            peer_closed.store(true, Ordering::SeqCst);
        }
    }

    pub fn dials(&self) -> usize {
        self.remote.dials.load(Ordering::SeqCst)
    }

    pub fn received_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.remote.received.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Transport for FakeTransport {
    fn dial(&self, _address: &str) -> io::Result<Box<dyn Connection>> {
        self.remote.dials.fetch_add(1, Ordering::SeqCst);
        let delay = self.remote.dial_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay as u64));
        }
        if self.remote.unreachable.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "unreachable"));
        }

        let peer_closed = Arc::new(AtomicBool::new(false));
        self.remote.live.lock().push(Arc::clone(&peer_closed));
        Ok(Box::new(FakeConnection {
            remote: Arc::clone(&self.remote),
            peer_closed,
        }))
    }
}

struct FakeConnection {
    remote: Arc<FakeRemote>,
    peer_closed: Arc<AtomicBool>,
}

impl Write for FakeConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.peer_closed.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"));
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
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer closed"))
        } else {
            Ok(())
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.peer_closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
