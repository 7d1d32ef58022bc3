//! Frame encoding and validation.
//!
//! Every message on the wire has the same shape:
//!
//! ```text
//! +------+------+---------+---------+-------+-------+-----------+----------+------+------+
//! | 0x53 | 0x59 | control | command | lenHi | lenLo | payload.. | checksum | 0x54 | 0x43 |
//! +------+------+---------+---------+-------+-------+-----------+----------+------+------+
//! ```
//!
//! The checksum is the low byte of the sum of every byte from the first
//! header byte through the last payload byte.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::payload::{is_valid_width, Payload};

/// Additive checksum: sum of `bytes` modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// One protocol message together with its wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    control: u8,
    command: u8,
    payload: Payload,
    wire: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl Frame {
    /// Build an outbound frame.
    pub fn new(control: u8, command: u8, payload: Payload) -> Self {
        let width = payload.as_bytes().len();
        let checksum_at = PAYLOAD_OFFSET + width;

        let mut wire = [0u8; MAX_FRAME_SIZE];
        wire[..PAYLOAD_OFFSET].copy_from_slice(&[HEAD1, HEAD2, control, command, 0x00, width as u8]);
        wire[PAYLOAD_OFFSET..checksum_at].copy_from_slice(payload.as_bytes());
        wire[checksum_at] = checksum(&wire[..checksum_at]);
        wire[checksum_at + 1] = END1;
        wire[checksum_at + 2] = END2;

        Frame {
            control,
            command,
            payload,
            wire,
            len: checksum_at + TRAILER_SIZE,
        }
    }

    /// Build an outbound frame from raw payload bytes.
    ///
    /// Fails with [`ProtocolError::InvalidPayloadWidth`] unless `payload`
    /// is 1, 2 or 4 bytes long.
    pub fn encode(control: u8, command: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        Ok(Frame::new(control, command, Payload::from_slice(payload)?))
    }

    /// Decode a received candidate frame, checking its structure and checksum.
    ///
    /// This does not look at control or command; use [`Expectation::check`]
    /// to match a frame against a pending request.
    pub fn from_wire(raw: &[u8]) -> Result<Self, ProtocolError> {
        if raw.len() < FRAME_OVERHEAD {
            return Err(ProtocolError::MalformedFrame("frame shorter than header and trailer"));
        }
        if raw.len() > WIRE_BUF_CAPACITY {
            return Err(ProtocolError::MalformedFrame("frame longer than buffer capacity"));
        }
        if raw[0] != HEAD1 || raw[1] != HEAD2 {
            return Err(ProtocolError::MalformedFrame("missing frame header"));
        }
        if raw[raw.len() - 2] != END1 || raw[raw.len() - 1] != END2 {
            return Err(ProtocolError::MalformedFrame("missing frame terminator"));
        }

        let checksum_at = raw.len() - TRAILER_SIZE;
        let computed = checksum(&raw[..checksum_at]);
        let received = raw[checksum_at];
        if computed != received {
            return Err(ProtocolError::ChecksumMismatch { computed, received });
        }

        let declared = u16::from_be_bytes([raw[LEN_OFFSET], raw[LEN_OFFSET + 1]]) as usize;
        let actual = checksum_at - PAYLOAD_OFFSET;
        if declared != actual {
            return Err(ProtocolError::MalformedFrame("length field disagrees with frame size"));
        }
        if !is_valid_width(actual) {
            return Err(ProtocolError::InvalidPayloadWidth(actual));
        }

        // A valid width bounds the frame to MAX_FRAME_SIZE.
        let mut wire = [0u8; MAX_FRAME_SIZE];
        wire[..raw.len()].copy_from_slice(raw);
        Ok(Frame {
            control: raw[CONTROL_OFFSET],
            command: raw[COMMAND_OFFSET],
            payload: Payload::from_slice(&raw[PAYLOAD_OFFSET..checksum_at])?,
            wire,
            len: raw.len(),
        })
    }

    /// Control byte.
    pub fn control(&self) -> u8 {
        self.control
    }

    /// Command byte.
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Payload.
    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// The complete frame as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.wire[..self.len]
    }

    /// Total wire length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a frame carries at least one payload byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// What a reply to a pending request must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    /// Control byte the reply must carry.
    pub control: u8,
    /// Command byte the reply must carry.
    pub command: u8,
    /// Payload the reply must echo, for set operations.
    pub payload: Option<Payload>,
}

impl Expectation {
    /// Expect any payload under `control`/`command` (a query reply).
    pub fn reply_to(control: u8, command: u8) -> Self {
        Expectation {
            control,
            command,
            payload: None,
        }
    }

    /// Expect `payload` echoed back under `control`/`command` (a set acknowledgement).
    pub fn echo_of(control: u8, command: u8, payload: Payload) -> Self {
        Expectation {
            control,
            command,
            payload: Some(payload),
        }
    }

    /// Match a decoded frame against this expectation, returning its payload.
    pub fn check(&self, frame: &Frame) -> Result<Payload, ProtocolError> {
        if frame.control() != self.control {
            return Err(ProtocolError::ControlMismatch {
                expected: self.control,
                actual: frame.control(),
            });
        }
        if frame.command() != self.command {
            return Err(ProtocolError::CommandMismatch {
                expected: self.command,
                actual: frame.command(),
            });
        }
        if let Some(expected) = self.payload {
            if expected.as_bytes() != frame.payload().as_bytes() {
                return Err(ProtocolError::PayloadMismatch {
                    expected: expected.as_bytes().to_vec(),
                    actual: frame.payload().as_bytes().to_vec(),
                });
            }
        }
        Ok(frame.payload())
    }

    /// Decode `raw` and match it in one step.
    pub fn validate(&self, raw: &[u8]) -> Result<Payload, ProtocolError> {
        self.check(&Frame::from_wire(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_LIVING_ROOM: [u8; 10] =
        [0x53, 0x59, 0x05, 0x07, 0x00, 0x01, 0x01, 0x65, 0x54, 0x43];

    #[test]
    fn test_encode_known_frame() {
        let frame = Frame::encode(WORKING_STATUS, SET_SCENARIO, &[LIVING_ROOM]).unwrap();
        assert_eq!(frame.as_bytes(), &SCENARIO_LIVING_ROOM);
        assert_eq!(frame.len(), 10);
    }

    #[test]
    fn test_encode_rejects_bad_width() {
        for width in [0usize, 3, 5] {
            let payload = vec![0u8; width];
            assert_eq!(
                Frame::encode(CUSTOM, SET_MOTION_RANGE, &payload),
                Err(ProtocolError::InvalidPayloadWidth(width))
            );
        }
    }

    #[test]
    fn test_encode_four_byte_payload() {
        let frame = Frame::new(CUSTOM, SET_ABSENCE_VALID_TIME, Payload::u32(30_000));
        let bytes = frame.as_bytes();
        assert_eq!(bytes.len(), MAX_FRAME_SIZE);
        assert_eq!(&bytes[4..6], &[0x00, 0x04]);
        assert_eq!(&bytes[6..10], &[0x00, 0x00, 0x75, 0x30]);
        assert_eq!(bytes[10], checksum(&bytes[..10]));
        assert_eq!(&bytes[11..], &[END1, END2]);
    }

    #[test]
    fn test_frame_length_per_width() {
        for (payload, len) in [
            (Payload::u8(7), 10),
            (Payload::u16(0x0102), 11),
            (Payload::u32(0x01020304), 13),
        ] {
            let built = Frame::new(HUMAN_STATUS, SET_TIME_OF_ABSENCE, payload);
            assert_eq!(built.len(), len);
            assert_eq!(&built.as_bytes()[len - 2..], &[END1, END2]);

            let decoded = Frame::from_wire(built.as_bytes()).unwrap();
            assert_eq!(decoded, built);
        }
    }

    #[test]
    fn test_round_trip_all_widths() {
        let payloads = [
            Payload::u8(0x00),
            Payload::u8(0xFA),
            Payload::u16(0x0102),
            Payload::u16(0xFFFF),
            Payload::u32(0xDEADBEEF),
            Payload::u32(1),
        ];
        for payload in payloads {
            let frame = Frame::new(CUSTOM, SET_PRESENCE_THRESHOLD, payload);
            let got = Expectation::reply_to(CUSTOM, SET_PRESENCE_THRESHOLD)
                .validate(frame.as_bytes())
                .unwrap();
            assert_eq!(got, payload);
            assert_eq!(got.value(), payload.value());
        }
    }

    #[test]
    fn test_validate_reports_control_and_command_mismatch() {
        let frame = Frame::new(WORKING_STATUS, GET_SCENARIO, Payload::u8(BEDROOM));

        let other_control = Expectation::reply_to(CUSTOM, GET_SCENARIO).validate(frame.as_bytes());
        assert_eq!(
            other_control,
            Err(ProtocolError::ControlMismatch {
                expected: CUSTOM,
                actual: WORKING_STATUS
            })
        );

        let other_command =
            Expectation::reply_to(WORKING_STATUS, GET_SENSITIVITY).validate(frame.as_bytes());
        assert_eq!(
            other_command,
            Err(ProtocolError::CommandMismatch {
                expected: GET_SENSITIVITY,
                actual: GET_SCENARIO
            })
        );
    }

    #[test]
    fn test_validate_payload_echo() {
        let frame = Frame::new(WORKING_STATUS, SET_SENSITIVITY, Payload::u8(2));
        let ok = Expectation::echo_of(WORKING_STATUS, SET_SENSITIVITY, Payload::u8(2));
        assert_eq!(ok.validate(frame.as_bytes()), Ok(Payload::u8(2)));

        let wrong = Expectation::echo_of(WORKING_STATUS, SET_SENSITIVITY, Payload::u8(3));
        assert!(matches!(
            wrong.validate(frame.as_bytes()),
            Err(ProtocolError::PayloadMismatch { .. })
        ));
    }

    #[test]
    fn test_single_byte_flip_is_checksum_mismatch() {
        let frame = Frame::new(CUSTOM, SET_MOTION_VALID_TIME, Payload::u32(0x01020304));
        let bytes = frame.as_bytes().to_vec();
        let checksum_at = bytes.len() - TRAILER_SIZE;
        for i in 2..checksum_at {
            let mut corrupted = bytes.clone();
            corrupted[i] ^= 0xFF;
            assert!(
                matches!(
                    Frame::from_wire(&corrupted),
                    Err(ProtocolError::ChecksumMismatch { .. })
                ),
                "flipping byte {} was not detected",
                i
            );
        }
    }

    #[test]
    fn test_from_wire_structure_errors() {
        assert!(matches!(
            Frame::from_wire(&SCENARIO_LIVING_ROOM[..8]),
            Err(ProtocolError::MalformedFrame(_))
        ));

        let mut bad_tail = SCENARIO_LIVING_ROOM;
        bad_tail[9] = 0x00;
        assert!(matches!(
            Frame::from_wire(&bad_tail),
            Err(ProtocolError::MalformedFrame(_))
        ));

        // Three payload bytes with a matching length field and checksum.
        let mut three = vec![HEAD1, HEAD2, CUSTOM, SET_MOTION_RANGE, 0x00, 0x03, 1, 2, 3];
        three.push(checksum(&three));
        three.extend_from_slice(&[END1, END2]);
        assert_eq!(
            Frame::from_wire(&three),
            Err(ProtocolError::InvalidPayloadWidth(3))
        );
    }
}
