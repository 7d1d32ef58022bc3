//! Fixed-capacity frame byte buffer.

use std::fmt;
use std::ops::Deref;

use heapless::Vec;

use crate::constants::WIRE_BUF_CAPACITY;
use crate::error::ProtocolError;

/// Raw bytes of a single candidate frame, bounded to [`WIRE_BUF_CAPACITY`].
///
/// Every write is capacity-checked; overrunning the buffer is reported as
/// [`ProtocolError::MalformedFrame`] and leaves the contents untouched.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WireBuf {
    bytes: Vec<u8, WIRE_BUF_CAPACITY>,
}

impl WireBuf {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        WireBuf { bytes: Vec::new() }
    }

    /// Copy `bytes` into a new buffer.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let mut wire = WireBuf::new();
        wire.extend_from_slice(bytes)?;
        Ok(wire)
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<(), ProtocolError> {
        self.bytes.push(byte).map_err(|_| overrun())
    }

    /// Append a run of bytes, all or nothing.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        self.bytes.extend_from_slice(bytes).map_err(|_| overrun())
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Maximum number of bytes the buffer holds.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Drop all contents.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

fn overrun() -> ProtocolError {
    ProtocolError::MalformedFrame("frame buffer overrun")
}

impl Deref for WireBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for WireBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WireBuf[")?;
        for (i, b) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut wire = WireBuf::new();
        assert_eq!(wire.capacity(), WIRE_BUF_CAPACITY);
        for i in 0..WIRE_BUF_CAPACITY {
            wire.push(i as u8).expect("within capacity");
        }
        assert_eq!(wire.len(), WIRE_BUF_CAPACITY);
        assert!(matches!(
            wire.push(0xFF),
            Err(ProtocolError::MalformedFrame(_))
        ));
        assert_eq!(wire.len(), WIRE_BUF_CAPACITY);
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut wire = WireBuf::from_slice(&[1, 2, 3]).unwrap();
        let too_much = [0u8; WIRE_BUF_CAPACITY];
        assert!(matches!(
            wire.extend_from_slice(&too_much),
            Err(ProtocolError::MalformedFrame(_))
        ));
        assert_eq!(wire.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_from_oversized_slice() {
        let too_much = [0u8; WIRE_BUF_CAPACITY + 1];
        assert!(WireBuf::from_slice(&too_much).is_err());
    }

    #[test]
    fn test_clear() {
        let mut wire = WireBuf::from_slice(&[1, 2, 3]).unwrap();
        wire.clear();
        assert!(wire.is_empty());
    }

    #[test]
    fn test_debug_hex() {
        let wire = WireBuf::from_slice(&[0x53, 0x59]).unwrap();
        assert_eq!(format!("{:?}", wire), "WireBuf[53 59]");
    }
}
