//! Request/response correlation state.
//!
//! The module has no request identifiers: a reply is recognised purely by
//! its control, command and (for set requests) echoed payload. Only one
//! request may be outstanding at a time.

use std::time::Duration;

use mmwave_protocol::{Expectation, Frame, Payload, ProtocolError};

use crate::deadline::Deadline;

/// State of a single request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    /// No request in flight.
    #[default]
    Idle,
    /// Request written and flushed.
    Sent,
    /// Polling for the reply.
    Awaiting,
    /// A matching reply arrived.
    Matched,
    /// The budget ran out first.
    TimedOut,
}

/// Correlation context for the request currently in flight.
#[derive(Debug, Clone, Copy)]
pub struct PendingExchange {
    expectation: Expectation,
    deadline: Deadline,
    mismatched: usize,
}

impl PendingExchange {
    /// Start waiting for a reply matching `expectation`.
    pub fn new(expectation: Expectation, budget: Duration) -> Self {
        PendingExchange {
            expectation,
            deadline: Deadline::after(budget),
            mismatched: 0,
        }
    }

    /// Offer a received frame. Frames that do not match are counted and
    /// otherwise left to the caller.
    pub fn offer(&mut self, frame: &Frame) -> Result<Payload, ProtocolError> {
        let result = self.expectation.check(frame);
        if result.is_err() {
            self.mismatched += 1;
        }
        result
    }

    /// What the reply must look like.
    pub fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    /// When waiting stops.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Frames offered that did not match.
    pub fn mismatched(&self) -> usize {
        self.mismatched
    }
}
