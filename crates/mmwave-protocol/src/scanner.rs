//! Byte stream scanner.
//!
//! Received bytes are pushed in whatever chunks the transport delivers and
//! candidate frames are pulled out as they complete. Bytes before a frame
//! header are discarded. The end of a frame is located from its length
//! field and then checked for the `END1 END2` terminator, so payload or
//! checksum bytes equal to `END2` do not cut a frame short.
//!
//! Candidates are not checksum-checked here; see [`Frame::from_wire`].

use bytes::{Buf, BytesMut};
use log::trace;

use crate::constants::*;
use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::wire_buf::WireBuf;

/// Incremental frame scanner over a received byte stream.
#[derive(Debug, Default)]
pub struct FrameScanner {
    /// Received bytes not yet consumed.
    pending: BytesMut,
}

impl FrameScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        FrameScanner {
            pending: BytesMut::with_capacity(WIRE_BUF_CAPACITY * 2),
        }
    }

    /// Add received bytes.
    pub fn push(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    /// Try to extract the next candidate frame.
    ///
    /// Returns `None` when no complete candidate is buffered yet; the
    /// partial state is kept for the next call. A candidate that turns out
    /// to be broken is reported as `Some(Err(MalformedFrame))`; only its
    /// first header byte is dropped, so a good frame hiding behind a
    /// truncated one is still found on the next call.
    pub fn next_candidate(&mut self) -> Option<Result<WireBuf, ProtocolError>> {
        loop {
            match self.pending.iter().position(|&b| b == HEAD1) {
                Some(0) => {}
                Some(skip) => {
                    trace!("scanner: discarding {} bytes before header", skip);
                    self.pending.advance(skip);
                }
                None => {
                    if !self.pending.is_empty() {
                        trace!("scanner: discarding {} bytes without header", self.pending.len());
                        self.pending.clear();
                    }
                    return None;
                }
            }

            if self.pending.len() < 2 {
                return None;
            }
            if self.pending[1] != HEAD2 {
                // Drop HEAD1 only; the next byte may itself start a frame.
                self.pending.advance(1);
                continue;
            }

            if self.pending.len() < HEADER_SIZE {
                return None;
            }
            let declared =
                u16::from_be_bytes([self.pending[LEN_OFFSET], self.pending[LEN_OFFSET + 1]])
                    as usize;
            if declared > MAX_PAYLOAD_SIZE {
                self.pending.advance(1);
                return Some(Err(ProtocolError::MalformedFrame(
                    "declared payload longer than 4 bytes",
                )));
            }

            let total = FRAME_OVERHEAD + declared;
            if self.pending.len() < total {
                return None;
            }
            if self.pending[total - 2] != END1 || self.pending[total - 1] != END2 {
                self.pending.advance(1);
                return Some(Err(ProtocolError::MalformedFrame("missing frame terminator")));
            }

            let raw = self.pending.split_to(total);
            return Some(WireBuf::from_slice(&raw));
        }
    }

    /// Try to extract and decode the next frame.
    ///
    /// Like [`next_candidate`](Self::next_candidate), but the candidate is
    /// also checked with [`Frame::from_wire`].
    pub fn next_frame(&mut self) -> Option<Result<Frame, ProtocolError>> {
        self.next_candidate()
            .map(|candidate| candidate.and_then(|raw| Frame::from_wire(&raw)))
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.pending.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn presence_frame(present: bool) -> Frame {
        Frame::new(HUMAN_STATUS, PRESENCE, Payload::u8(present as u8))
    }

    fn drain(scanner: &mut FrameScanner) -> (Vec<WireBuf>, usize) {
        let mut frames = Vec::new();
        let mut errors = 0;
        while let Some(candidate) = scanner.next_candidate() {
            match candidate {
                Ok(raw) => frames.push(raw),
                Err(_) => errors += 1,
            }
        }
        (frames, errors)
    }

    #[test]
    fn test_single_frame() {
        let frame = presence_frame(true);
        let mut scanner = FrameScanner::new();
        scanner.push(frame.as_bytes());

        let raw = scanner.next_candidate().unwrap().unwrap();
        assert_eq!(raw.as_slice(), frame.as_bytes());
        assert!(scanner.next_candidate().is_none());
        assert_eq!(scanner.buffered_len(), 0);
    }

    #[test]
    fn test_partial_reads() {
        let frame = Frame::new(CUSTOM, GET_ABSENCE_VALID_TIME, Payload::u32(60_000));
        let mut scanner = FrameScanner::new();

        for (i, &byte) in frame.as_bytes().iter().enumerate() {
            scanner.push(&[byte]);
            let got = scanner.next_candidate();
            if i + 1 < frame.len() {
                assert!(got.is_none(), "frame emitted early at byte {}", i);
            } else {
                assert_eq!(got.unwrap().unwrap().as_slice(), frame.as_bytes());
            }
        }
    }

    #[test]
    fn test_stream_ending_at_head1() {
        let mut scanner = FrameScanner::new();
        scanner.push(&[0x00, 0x11, HEAD1]);
        assert!(scanner.next_candidate().is_none());
        assert_eq!(scanner.buffered_len(), 1);

        let frame = presence_frame(false);
        scanner.push(&frame.as_bytes()[1..]);
        assert_eq!(
            scanner.next_candidate().unwrap().unwrap().as_slice(),
            frame.as_bytes()
        );
    }

    #[test]
    fn test_garbage_truncated_then_good_frame() {
        let good = Frame::new(WORKING_STATUS, GET_SCENARIO, Payload::u8(BATHROOM));
        let truncated_frame = presence_frame(true);
        let truncated = &truncated_frame.as_bytes()[..7];

        let mut stream = vec![0x00, 0xFF, END2, HEAD2, 0x12];
        stream.extend_from_slice(truncated);
        stream.extend_from_slice(good.as_bytes());

        let mut scanner = FrameScanner::new();
        scanner.push(&stream);
        let (frames, _) = drain(&mut scanner);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_slice(), good.as_bytes());
    }

    #[test]
    fn test_repeated_head1_before_frame() {
        let good = presence_frame(true);
        let mut stream = vec![HEAD1, HEAD1];
        stream.extend_from_slice(good.as_bytes());

        let mut scanner = FrameScanner::new();
        scanner.push(&stream);
        let (frames, errors) = drain(&mut scanner);
        assert_eq!(frames.len(), 1);
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_end2_inside_payload_and_checksum() {
        let frame = Frame::new(CUSTOM, SET_MOTION_VALID_TIME, Payload::u32(0x4343_5443));
        let mut scanner = FrameScanner::new();
        scanner.push(frame.as_bytes());
        let raw = scanner.next_candidate().unwrap().unwrap();
        assert_eq!(raw.as_slice(), frame.as_bytes());
    }

    #[test]
    fn test_oversized_length_field() {
        let mut scanner = FrameScanner::new();
        scanner.push(&[HEAD1, HEAD2, HUMAN_STATUS, PRESENCE, 0x00, 0x40]);
        assert!(matches!(
            scanner.next_candidate(),
            Some(Err(ProtocolError::MalformedFrame(_)))
        ));
    }

    #[test]
    fn test_no_terminator_stays_bounded() {
        let mut scanner = FrameScanner::new();
        let fragment = [HEAD1, HEAD2, CUSTOM, SET_MOTION_RANGE, 0x00, 0x04, 1, 2, 3, 4, 5];
        for _ in 0..1000 {
            scanner.push(&fragment);
            let (frames, _) = drain(&mut scanner);
            assert!(frames.is_empty());
            assert!(scanner.buffered_len() < MAX_FRAME_SIZE);
        }
    }

    #[test]
    fn test_next_frame_checks_checksum() {
        let mut bytes = presence_frame(true).as_bytes().to_vec();
        bytes[7] = bytes[7].wrapping_add(1);

        let mut scanner = FrameScanner::new();
        scanner.push(&bytes);
        assert!(matches!(
            scanner.next_frame(),
            Some(Err(ProtocolError::ChecksumMismatch { .. }))
        ));
    }
}
