//! Frame payload value.
//!
//! The module only ever carries 1, 2 or 4 payload bytes. Multi-byte values
//! are big-endian on the wire.

use std::fmt;

use crate::constants::MAX_PAYLOAD_SIZE;
use crate::error::ProtocolError;

/// A 1, 2 or 4 byte frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload {
    bytes: [u8; MAX_PAYLOAD_SIZE],
    width: u8,
}

impl Payload {
    /// Single byte payload.
    pub const fn u8(value: u8) -> Self {
        Payload {
            bytes: [value, 0, 0, 0],
            width: 1,
        }
    }

    /// Two byte big-endian payload.
    pub const fn u16(value: u16) -> Self {
        let be = value.to_be_bytes();
        Payload {
            bytes: [be[0], be[1], 0, 0],
            width: 2,
        }
    }

    /// Four byte big-endian payload.
    pub const fn u32(value: u32) -> Self {
        Payload {
            bytes: value.to_be_bytes(),
            width: 4,
        }
    }

    /// Build from raw payload bytes. Fails unless the slice is 1, 2 or 4 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if !is_valid_width(bytes.len()) {
            return Err(ProtocolError::InvalidPayloadWidth(bytes.len()));
        }
        let mut buf = [0u8; MAX_PAYLOAD_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Payload {
            bytes: buf,
            width: bytes.len() as u8,
        })
    }

    /// Number of payload bytes.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// The payload bytes as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width()]
    }

    /// First payload byte. Single byte payloads carry their whole value here.
    pub fn first(&self) -> u8 {
        self.bytes[0]
    }

    /// The payload interpreted as a big-endian unsigned integer.
    pub fn value(&self) -> u32 {
        self.as_bytes()
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32)
    }
}

impl From<u8> for Payload {
    fn from(value: u8) -> Self {
        Payload::u8(value)
    }
}

impl From<u16> for Payload {
    fn from(value: u16) -> Self {
        Payload::u16(value)
    }
}

impl From<u32> for Payload {
    fn from(value: u32) -> Self {
        Payload::u32(value)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Whether `width` is a payload width the protocol allows.
pub fn is_valid_width(width: usize) -> bool {
    matches!(width, 1 | 2 | 4)
}
