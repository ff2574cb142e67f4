//! Stream transports used to reach a remote log collector
//!
//! A [`Transport`] dials an address and hands back a [`Connection`]. The
//! output sink only ever talks to these two traits, so tests can count dials
//! and simulate a vanished peer without opening sockets.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

const MAX_DRAIN_READS: usize = 64;

/// Connection-oriented transport able to dial a `host:port` address
pub trait Transport: Send + Sync {
    /// Make exactly one connection attempt
    fn dial(&self, address: &str) -> io::Result<Box<dyn Connection>>;
}

/// A live stream to the collector
pub trait Connection: Write + Send {
    /// Cheap liveness check that must not block
    ///
    /// `Ok(())` means no failure was observed. This is a heuristic: a
    /// connection that passes may still fail on the next write.
    fn probe(&mut self) -> io::Result<()>;

    /// Close the connection; calling it twice is harmless
    fn close(&mut self) -> io::Result<()>;
}

/// TCP transport
///
/// Without timeouts configured, dial and write block for as long as the
/// operating system allows.
///
/// # Example
///
/// ```no_run
/// use rust_remote_logger::sink::{TcpTransport, Transport};
/// use std::time::Duration;
///
/// let transport = TcpTransport::new().with_connect_timeout(Duration::from_secs(2));
/// let connection = transport.dial("127.0.0.1:5001");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each connection attempt
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound each write on an established connection
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    fn connect(&self, address: &str) -> io::Result<TcpStream> {
        let Some(timeout) = self.connect_timeout else {
            return TcpStream::connect(address);
        };

        let addrs: Vec<SocketAddr> = address.to_socket_addrs()?.collect();
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("could not resolve {}", address),
            )
        }))
    }
}

impl Transport for TcpTransport {
    fn dial(&self, address: &str) -> io::Result<Box<dyn Connection>> {
        let stream = self.connect(address)?;
        stream.set_write_timeout(self.write_timeout)?;
        // Low-latency logging
        stream.set_nodelay(true)?;
        Ok(Box::new(TcpConnection { stream }))
    }
}

/// Established TCP connection to the collector
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Write for TcpConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl TcpConnection {
    /// Read and discard whatever the collector sent, without blocking
    ///
    /// Unread bytes would otherwise hide the end of stream that marks a
    /// hang-up. Stops after a bounded number of reads so a chatty collector
    /// cannot stall the caller.
    fn drain_incoming(&mut self) -> io::Result<()> {
        let mut buf = [0u8; 512];
        for _ in 0..MAX_DRAIN_READS {
            match self.stream.read(&mut buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "collector closed the connection",
                    ))
                }
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

impl Connection for TcpConnection {
    /// Non-blocking read that drops collector data and looks for a hang-up
    ///
    /// A pending socket error (reset, broken pipe) or end of stream means
    /// the peer is gone. Nothing to read (`WouldBlock`) counts as healthy.
    fn probe(&mut self) -> io::Result<()> {
        if let Some(err) = self.stream.take_error()? {
            return Err(err);
        }

        self.stream.set_nonblocking(true)?;
        let drained = self.drain_incoming();
        self.stream.set_nonblocking(false)?;
        drained
    }

    fn close(&mut self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err),
            _ => Ok(()),
        }
    }
}
