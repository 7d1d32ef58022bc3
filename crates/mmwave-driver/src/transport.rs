//! Byte source boundary.
//!
//! The driver never blocks on reads: a [`ByteSource`] reports "nothing
//! buffered" instead of waiting. Writes are complete once `flush` returns.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

/// Bytes read from the stream per `fill`.
const READ_CHUNK: usize = 256;
/// Received bytes held before reads pause until the driver catches up.
const INBOX_LIMIT: usize = 4096;

/// A non-blocking, bidirectional byte stream to the module.
pub trait ByteSource {
    /// Queue bytes for transmission.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Block until queued bytes have been handed to the transport.
    fn flush(&mut self) -> io::Result<()>;

    /// Number of received bytes that can be read without blocking.
    fn available(&mut self) -> io::Result<usize>;

    /// Read one byte, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Read as many buffered bytes as fit in `buf` without blocking.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.read_byte()? {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn available(&mut self) -> io::Result<usize> {
        (**self).available()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_available(buf)
    }
}

/// Adapts any `Read + Write` stream to [`ByteSource`].
///
/// The stream must be non-blocking or have a short read timeout; reads
/// that fail with `WouldBlock` or `TimedOut` count as "no data". Each
/// refill reads at most one chunk and the unread backlog is capped, so a
/// peer that never stops sending cannot stall a caller or grow memory.
/// Once the peer closes the stream and the backlog is drained, reads fail
/// with `UnexpectedEof`.
#[derive(Debug)]
pub struct IoSource<T> {
    stream: T,
    inbox: VecDeque<u8>,
    closed: bool,
}

impl<T: Read + Write> IoSource<T> {
    /// Wrap a stream.
    pub fn new(stream: T) -> Self {
        IoSource {
            stream,
            inbox: VecDeque::with_capacity(256),
            closed: false,
        }
    }

    /// Whether the peer closed the stream.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Borrow the wrapped stream.
    pub fn get_ref(&self) -> &T {
        &self.stream
    }

    /// Unwrap the stream, dropping any unread bytes.
    pub fn into_inner(self) -> T {
        self.stream
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.closed || self.inbox.len() >= INBOX_LIMIT {
            return Ok(());
        }
        let mut chunk = [0u8; READ_CHUNK];
        let room = READ_CHUNK.min(INBOX_LIMIT - self.inbox.len());
        loop {
            match self.stream.read(&mut chunk[..room]) {
                Ok(0) => {
                    debug!("byte source closed by peer");
                    self.closed = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.inbox.extend(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if is_no_data(&e) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn check_eof(&self) -> io::Result<()> {
        if self.closed && self.inbox.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "byte source closed by peer",
            ));
        }
        Ok(())
    }
}

impl IoSource<TcpStream> {
    /// Connect to a serial-over-TCP bridge.
    pub fn connect_tcp<A: ToSocketAddrs>(addr: A, connect_timeout: Duration) -> io::Result<Self> {
        let mut last_err = None;
        for addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    stream.set_nonblocking(true)?;
                    debug!("connected to {}", addr);
                    return Ok(IoSource::new(stream));
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
        }))
    }
}

impl<T: Read + Write> ByteSource for IoSource<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.stream.write(rest) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero)),
                Ok(n) => rest = &rest[n..],
                Err(e) if is_no_data(&e) => std::thread::yield_now(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            match self.stream.flush() {
                Err(e) if is_no_data(&e) => std::thread::yield_now(),
                other => return other,
            }
        }
    }

    fn available(&mut self) -> io::Result<usize> {
        self.fill()?;
        Ok(self.inbox.len())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.inbox.is_empty() {
            self.fill()?;
        }
        self.check_eof()?;
        Ok(self.inbox.pop_front())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.inbox.len() < buf.len() {
            self.fill()?;
        }
        self.check_eof()?;
        let n = buf.len().min(self.inbox.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
