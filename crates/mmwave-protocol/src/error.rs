//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when building, scanning or validating frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Candidate frame is structurally broken: bad delimiters, a length
    /// field that disagrees with the byte count, or a buffer overrun.
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// Payload is not 1, 2 or 4 bytes wide.
    #[error("invalid payload width: {0} bytes (expected 1, 2 or 4)")]
    InvalidPayloadWidth(usize),

    /// Checksum byte does not match the sum of header and payload.
    #[error("checksum mismatch: computed 0x{computed:02X}, frame carries 0x{received:02X}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes.
        computed: u8,
        /// Checksum byte found in the frame.
        received: u8,
    },

    /// Control byte differs from the one expected.
    #[error("control mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ControlMismatch {
        /// Expected control byte.
        expected: u8,
        /// Control byte found in the frame.
        actual: u8,
    },

    /// Command byte differs from the one expected.
    #[error("command mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    CommandMismatch {
        /// Expected command byte.
        expected: u8,
        /// Command byte found in the frame.
        actual: u8,
    },

    /// Payload differs from the value that was set.
    #[error("payload mismatch: expected {expected:02X?}, got {actual:02X?}")]
    PayloadMismatch {
        /// Payload that was sent.
        expected: Vec<u8>,
        /// Payload echoed back.
        actual: Vec<u8>,
    },
}

impl ProtocolError {
    /// True for failures that mean the bytes themselves are damaged, as
    /// opposed to a well-formed frame that simply answers something else.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ProtocolError::MalformedFrame(_)
                | ProtocolError::ChecksumMismatch { .. }
                | ProtocolError::InvalidPayloadWidth(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::ChecksumMismatch {
            computed: 0x65,
            received: 0x66,
        };
        assert!(err.to_string().contains("0x65"));
        assert!(err.to_string().contains("0x66"));

        let err = ProtocolError::InvalidPayloadWidth(3);
        assert!(err.to_string().contains("3 bytes"));
    }

    #[test]
    fn test_is_corruption() {
        assert!(ProtocolError::MalformedFrame("x").is_corruption());
        assert!(!ProtocolError::ControlMismatch {
            expected: 1,
            actual: 2
        }
        .is_corruption());
    }
}
