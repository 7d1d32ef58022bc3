//! Device status model.

use mmwave_protocol::{Frame, HumanReport, Motion};
use serde::Serialize;
use tracing::debug;

/// Last presence and motion state reported by the module.
///
/// Only `HUMAN_STATUS` presence and motion reports change it. Values never
/// expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeviceStatus {
    /// Someone is present.
    pub presence: bool,
    /// Current motion state.
    pub motion: Motion,
}

impl DeviceStatus {
    /// Fold a received frame into the status. Returns true if anything changed.
    pub fn apply(&mut self, frame: &Frame) -> bool {
        match HumanReport::from_frame(frame) {
            Some(HumanReport::Presence(present)) if present != self.presence => {
                debug!("presence: {} -> {}", self.presence, present);
                self.presence = present;
                true
            }
            Some(HumanReport::Motion(motion)) if motion != self.motion => {
                debug!("motion: {} -> {}", self.motion, motion);
                self.motion = motion;
                true
            }
            _ => false,
        }
    }

    /// Whether someone is present.
    pub fn is_present(&self) -> bool {
        self.presence
    }

    /// Whether someone is moving.
    pub fn is_moving(&self) -> bool {
        self.motion == Motion::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmwave_protocol::*;

    #[test]
    fn test_presence_change_then_repeat() {
        let mut status = DeviceStatus::default();
        let frame = Frame::new(HUMAN_STATUS, PRESENCE, Payload::u8(0x01));

        assert!(status.apply(&frame));
        assert!(status.is_present());
        assert!(!status.apply(&frame));
        assert!(status.is_present());
    }

    #[test]
    fn test_motion_states() {
        let mut status = DeviceStatus::default();
        assert!(!status.is_moving());

        assert!(status.apply(&Frame::new(HUMAN_STATUS, MOTION, Payload::u8(MOTION_MOVING))));
        assert!(status.is_moving());

        assert!(status.apply(&Frame::new(HUMAN_STATUS, MOTION, Payload::u8(MOTION_STILL))));
        assert!(!status.is_moving());
        assert_eq!(status.motion, Motion::Still);
    }

    #[test]
    fn test_other_frames_are_ignored() {
        let mut status = DeviceStatus::default();
        let frames = [
            Frame::new(HUMAN_STATUS, AMPLITUDE_DATA, Payload::u8(0x40)),
            Frame::new(HUMAN_STATUS, POSITION_EVENT, Payload::u8(0x01)),
            Frame::new(WORKING_STATUS, GET_SCENARIO, Payload::u8(0x01)),
            Frame::new(SYSTEM, PRESENCE, Payload::u8(0x01)),
        ];
        for frame in &frames {
            assert!(!status.apply(frame));
        }
        assert_eq!(status, DeviceStatus::default());
    }
}
