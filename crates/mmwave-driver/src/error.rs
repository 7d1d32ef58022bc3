//! Error types for the driver.

use std::io;
use std::time::Duration;

use mmwave_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur while talking to the module.
///
/// None of these leave the driver unusable; a caller may simply retry the
/// whole operation.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No matching reply arrived within the response budget. The module is
    /// either unresponsive or rejected the value.
    #[error("timeout waiting for reply to control 0x{control:02X} command 0x{command:02X} after {waited:?}")]
    Timeout {
        /// Control byte of the request.
        control: u8,
        /// Command byte of the request.
        command: u8,
        /// Time spent waiting.
        waited: Duration,
    },

    /// A frame could not be built.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The byte source failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// A typed parameter value is out of range; nothing was sent.
    #[error("invalid value {value} for {param}: expected {min}..={max}")]
    InvalidValue {
        /// Parameter name.
        param: &'static str,
        /// Rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// The module answered with a value this driver cannot interpret.
    #[error("module reported unexpected value {value} for {param}")]
    UnexpectedValue {
        /// Parameter name.
        param: &'static str,
        /// Reported value.
        value: u32,
    },

    /// No parameter with this name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A valid time longer than the 32-bit millisecond field holds.
    #[error("{param} of {requested:?} is longer than the maximum {max:?}")]
    DurationTooLong {
        /// Parameter name.
        param: &'static str,
        /// Requested time.
        requested: Duration,
        /// Longest time the module accepts.
        max: Duration,
    },

    /// A time accessor was called with a parameter that is not a time.
    #[error("{0} is not a valid-time parameter")]
    NotATimeParameter(&'static str),

    /// Driver configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriverError {
    /// True if the request went unanswered.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }

    /// True if the peer closed the byte stream.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, DriverError::Transport(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
