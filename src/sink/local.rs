//! Local fallback stream

use std::fmt;
use std::io::{self, IsTerminal, Write};

/// Process-local destination used when no collector is configured or the
/// collector is unreachable
pub enum LocalStream {
    Stdout,
    Stderr,
    Writer(Box<dyn Write + Send>),
}

impl LocalStream {
    /// Wrap any writer, e.g. a file or an in-memory buffer
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        LocalStream::Writer(Box::new(writer))
    }

    /// Whether output lands on an interactive terminal
    pub fn is_terminal(&self) -> bool {
        match self {
            LocalStream::Stdout => io::stdout().is_terminal(),
            LocalStream::Stderr => io::stderr().is_terminal(),
            LocalStream::Writer(_) => false,
        }
    }
}

impl Default for LocalStream {
    fn default() -> Self {
        LocalStream::Stdout
    }
}

impl fmt::Debug for LocalStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalStream::Stdout => f.write_str("Stdout"),
            LocalStream::Stderr => f.write_str("Stderr"),
            LocalStream::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl Write for LocalStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LocalStream::Stdout => io::stdout().lock().write(buf),
            LocalStream::Stderr => io::stderr().lock().write(buf),
            LocalStream::Writer(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // Hold the std lock for the whole record
        match self {
            LocalStream::Stdout => io::stdout().lock().write_all(buf),
            LocalStream::Stderr => io::stderr().lock().write_all(buf),
            LocalStream::Writer(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LocalStream::Stdout => io::stdout().flush(),
            LocalStream::Stderr => io::stderr().flush(),
            LocalStream::Writer(w) => w.flush(),
        }
    }
}
