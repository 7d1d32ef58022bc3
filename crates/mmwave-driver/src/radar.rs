//! The radar driver: request/response engine and status tracking.

use std::task::Poll;
use std::time::Duration;

use mmwave_protocol::{
    Expectation, Frame, FrameScanner, HumanReport, Payload, QUERY_PAYLOAD,
};
use tracing::{debug, trace, warn};

use crate::config::DriverConfig;
use crate::deadline::{poll_until, Deadline};
use crate::error::{DriverError, DriverResult};
use crate::exchange::{ExchangeState, PendingExchange};
use crate::status::DeviceStatus;
use crate::transport::ByteSource;

/// Upper bound on source reads in one [`Radar::update_status`] call.
pub const MAX_CHUNKS_PER_UPDATE: usize = 16;

/// Driver for one mmWave presence module.
///
/// All calls are synchronous. `set_parameter` and `get_parameter` block
/// (polling) until the reply arrives or the response budget runs out;
/// `update_status` never waits. The `&mut self` receivers keep at most one
/// request in flight; share a driver between threads behind a `Mutex`.
pub struct Radar<S> {
    source: S,
    scanner: FrameScanner,
    status: DeviceStatus,
    config: DriverConfig,
    state: ExchangeState,
    read_buf: Vec<u8>,
}

impl<S: ByteSource> Radar<S> {
    /// Create a driver with the default configuration.
    pub fn new(source: S) -> Self {
        let config = DriverConfig::default();
        Radar {
            source,
            scanner: FrameScanner::new(),
            status: DeviceStatus::default(),
            read_buf: vec![0u8; config.read_chunk],
            config,
            state: ExchangeState::Idle,
        }
    }

    /// Create a driver with a custom configuration.
    pub fn with_config(source: S, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        Ok(Radar {
            source,
            scanner: FrameScanner::new(),
            status: DeviceStatus::default(),
            read_buf: vec![0u8; config.read_chunk],
            config,
            state: ExchangeState::Idle,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Outcome of the most recent request.
    pub fn exchange_state(&self) -> ExchangeState {
        self.state
    }

    /// Borrow the byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give back the byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    // ========================================================================
    // Request/Response
    // ========================================================================

    /// Set a parameter and wait for the module to echo it back.
    ///
    /// Fails with [`DriverError::Timeout`] if no matching echo arrives in
    /// time, which covers both a silent module and a rejected value.
    pub fn set_parameter(&mut self, control: u8, command: u8, payload: Payload) -> DriverResult<()> {
        let request = Frame::new(control, command, payload);
        self.exchange(request, Expectation::echo_of(control, command, payload))
            .map(|_| ())
    }

    /// Query a parameter and return the payload of the reply.
    pub fn get_parameter(&mut self, control: u8, command: u8) -> DriverResult<Payload> {
        let request = Frame::new(control, command, Payload::u8(QUERY_PAYLOAD));
        self.exchange(request, Expectation::reply_to(control, command))
    }

    fn exchange(&mut self, request: Frame, expectation: Expectation) -> DriverResult<Payload> {
        // Reports already buffered predate the request.
        self.drain_scanner();

        self.state = ExchangeState::Idle;
        trace!("request {:02X?}", request.as_bytes());
        if let Err(e) = self.transmit(&request) {
            warn!(
                "failed to send control 0x{:02X} command 0x{:02X}: {}",
                request.control(),
                request.command(),
                e
            );
            return Err(e);
        }
        self.state = ExchangeState::Sent;

        let mut pending = PendingExchange::new(expectation, self.config.response_timeout());
        let deadline = pending.deadline();
        let interval = self.config.poll_interval();
        self.state = ExchangeState::Awaiting;

        match poll_until(deadline, interval, || self.poll_reply(&mut pending)) {
            Ok(Some(payload)) => {
                self.state = ExchangeState::Matched;
                debug!(
                    "control 0x{:02X} command 0x{:02X} answered with [{}] after {:?} ({} unrelated frames)",
                    request.control(),
                    request.command(),
                    payload,
                    deadline.elapsed(),
                    pending.mismatched()
                );
                Ok(payload)
            }
            Ok(None) => {
                self.state = ExchangeState::TimedOut;
                warn!(
                    "no reply to control 0x{:02X} command 0x{:02X} within {:?} ({} unrelated frames)",
                    request.control(),
                    request.command(),
                    deadline.budget(),
                    pending.mismatched()
                );
                Err(DriverError::Timeout {
                    control: request.control(),
                    command: request.command(),
                    waited: deadline.elapsed(),
                })
            }
            Err(e) => {
                self.state = ExchangeState::Idle;
                Err(e)
            }
        }
    }

    fn transmit(&mut self, frame: &Frame) -> DriverResult<()> {
        self.source.write(frame.as_bytes())?;
        self.source.flush()?;
        Ok(())
    }

    fn poll_reply(&mut self, pending: &mut PendingExchange) -> DriverResult<Poll<Payload>> {
        loop {
            let n = self.fill()?;
            while let Some(candidate) = self.scanner.next_frame() {
                let frame = match candidate {
                    Ok(frame) => frame,
                    Err(e) => {
                        trace!("dropping candidate: {}", e);
                        continue;
                    }
                };
                match pending.offer(&frame) {
                    Ok(payload) => return Ok(Poll::Ready(payload)),
                    Err(e) => {
                        trace!("not the awaited reply: {}", e);
                        self.observe(&frame);
                    }
                }
            }
            if n < self.read_buf.len() || pending.deadline().expired() {
                return Ok(Poll::Pending);
            }
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Process the reports received so far. Never waits.
    ///
    /// Reads at most [`MAX_CHUNKS_PER_UPDATE`] chunks, so a source that
    /// never runs dry is worked through over several calls.
    ///
    /// Returns true if presence or motion changed.
    pub fn update_status(&mut self) -> DriverResult<bool> {
        let mut changed = false;
        for _ in 0..MAX_CHUNKS_PER_UPDATE {
            let n = self.fill()?;
            changed |= self.drain_scanner();
            if n < self.read_buf.len() {
                break;
            }
        }
        Ok(changed)
    }

    /// Poll for reports until presence or motion changes or `timeout` passes.
    ///
    /// Returns true on a change, false on timeout.
    pub fn wait_for_change(&mut self, timeout: Duration) -> DriverResult<bool> {
        let interval = self.config.poll_interval();
        let changed = poll_until(Deadline::after(timeout), interval, || {
            self.update_status()
                .map(|changed| if changed { Poll::Ready(()) } else { Poll::Pending })
        })?;
        Ok(changed.is_some())
    }

    /// Current presence and motion.
    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    /// Whether someone is present.
    pub fn is_present(&self) -> bool {
        self.status.is_present()
    }

    /// Whether someone is moving.
    pub fn is_moving(&self) -> bool {
        self.status.is_moving()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Move one chunk of received bytes into the scanner.
    fn fill(&mut self) -> DriverResult<usize> {
        let n = self.source.read_available(&mut self.read_buf)?;
        if n > 0 {
            self.scanner.push(&self.read_buf[..n]);
        }
        Ok(n)
    }

    /// Feed every complete buffered frame to the status model.
    fn drain_scanner(&mut self) -> bool {
        let mut changed = false;
        while let Some(candidate) = self.scanner.next_frame() {
            match candidate {
                Ok(frame) => changed |= self.observe(&frame),
                Err(e) => trace!("dropping candidate: {}", e),
            }
        }
        changed
    }

    fn observe(&mut self, frame: &Frame) -> bool {
        match HumanReport::from_frame(frame) {
            Some(report) => {
                trace!("report {:?}", report);
                self.status.apply(frame)
            }
            None => {
                trace!(
                    "unsolicited frame control 0x{:02X} command 0x{:02X}",
                    frame.control(),
                    frame.command()
                );
                false
            }
        }
    }
}
