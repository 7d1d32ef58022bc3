//! In-memory byte source for tests and simulations.

use std::collections::VecDeque;
use std::io;

use crate::transport::ByteSource;

/// Scripted [`ByteSource`] that records everything written to it.
///
/// Received bytes come from [`feed`](Self::feed), or from replies queued
/// with [`queue_reply`](Self::queue_reply), which are released one per
/// flushed write, the way the module answers a request.
#[derive(Debug, Default)]
pub struct MockSource {
    rx: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    pending_write: Vec<u8>,
    writes: Vec<Vec<u8>>,
    echo: bool,
    read_limit: Option<usize>,
}

impl MockSource {
    /// Create an empty source.
    pub fn new() -> Self {
        MockSource::default()
    }

    /// Make received bytes available immediately.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Release `bytes` after the next flushed write.
    pub fn queue_reply(&mut self, bytes: &[u8]) {
        self.replies.push_back(bytes.to_vec());
    }

    /// Echo every flushed write back, as the module does for accepted set requests.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Hand out at most `limit` bytes per `read_available` call.
    pub fn set_read_limit(&mut self, limit: usize) {
        self.read_limit = Some(limit);
    }

    /// Every flushed write, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// The most recent flushed write.
    pub fn last_write(&self) -> Option<&[u8]> {
        self.writes.last().map(Vec::as_slice)
    }

    /// Received bytes not yet read by the driver.
    pub fn unread(&self) -> usize {
        self.rx.len()
    }
}

impl ByteSource for MockSource {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.pending_write.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending_write.is_empty() {
            return Ok(());
        }
        let written = std::mem::take(&mut self.pending_write);
        if self.echo {
            self.rx.extend(&written);
        }
        if let Some(reply) = self.replies.pop_front() {
            self.rx.extend(reply);
        }
        self.writes.push(written);
        Ok(())
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.rx.pop_front())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = self.read_limit.unwrap_or(usize::MAX);
        let n = buf.len().min(self.rx.len()).min(limit);
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
