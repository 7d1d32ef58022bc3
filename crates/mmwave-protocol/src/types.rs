//! Typed values carried in frame payloads.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::*;
use crate::frame::Frame;

/// Factory presets bundling sensitivity and range defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Living room.
    LivingRoom,
    /// Area detection.
    AreaDetection,
    /// Bathroom.
    Bathroom,
    /// Bedroom.
    Bedroom,
}

impl Scenario {
    /// All scenarios in wire order.
    pub const ALL: [Scenario; 4] = [
        Scenario::LivingRoom,
        Scenario::AreaDetection,
        Scenario::Bathroom,
        Scenario::Bedroom,
    ];

    /// Name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::LivingRoom => "living-room",
            Scenario::AreaDetection => "area-detection",
            Scenario::Bathroom => "bathroom",
            Scenario::Bedroom => "bedroom",
        }
    }
}

impl From<Scenario> for u8 {
    fn from(scenario: Scenario) -> Self {
        match scenario {
            Scenario::LivingRoom => LIVING_ROOM,
            Scenario::AreaDetection => AREA_DETECTION,
            Scenario::Bathroom => BATHROOM,
            Scenario::Bedroom => BEDROOM,
        }
    }
}

impl TryFrom<u8> for Scenario {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            LIVING_ROOM => Ok(Scenario::LivingRoom),
            AREA_DETECTION => Ok(Scenario::AreaDetection),
            BATHROOM => Ok(Scenario::Bathroom),
            BEDROOM => Ok(Scenario::Bedroom),
            other => Err(other),
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == wanted)
            .ok_or_else(|| format!("unknown scenario '{}'", s))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Motion state reported under `HUMAN_STATUS`/`MOTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Nobody detected.
    #[default]
    None,
    /// Someone present and still.
    Still,
    /// Someone moving.
    Moving,
    /// A value this driver does not know.
    Unknown(u8),
}

impl From<u8> for Motion {
    fn from(value: u8) -> Self {
        match value {
            MOTION_NONE => Motion::None,
            MOTION_STILL => Motion::Still,
            MOTION_MOVING => Motion::Moving,
            other => Motion::Unknown(other),
        }
    }
}

impl From<Motion> for u8 {
    fn from(motion: Motion) -> Self {
        match motion {
            Motion::None => MOTION_NONE,
            Motion::Still => MOTION_STILL,
            Motion::Moving => MOTION_MOVING,
            Motion::Unknown(other) => other,
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motion::None => f.write_str("none"),
            Motion::Still => f.write_str("still"),
            Motion::Moving => f.write_str("moving"),
            Motion::Unknown(v) => write!(f, "unknown(0x{:02X})", v),
        }
    }
}

/// A spontaneous report decoded from a `HUMAN_STATUS` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanReport {
    /// Presence changed.
    Presence(bool),
    /// Motion state changed.
    Motion(Motion),
    /// Body movement amplitude.
    Amplitude(u8),
    /// Approach/leave position event (raw value).
    Position(u8),
    /// Any other `HUMAN_STATUS` command.
    Other {
        /// Command byte.
        command: u8,
        /// Raw payload value.
        value: u32,
    },
}

impl HumanReport {
    /// Decode a frame as a human status report. Returns `None` for other controls.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        if frame.control() != HUMAN_STATUS {
            return None;
        }
        let first = frame.payload().first();
        let report = match frame.command() {
            PRESENCE => HumanReport::Presence(first != 0),
            MOTION => HumanReport::Motion(Motion::from(first)),
            AMPLITUDE_DATA => HumanReport::Amplitude(first),
            POSITION_EVENT => HumanReport::Position(first),
            command => HumanReport::Other {
                command,
                value: frame.payload().value(),
            },
        };
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    #[test]
    fn test_scenario_conversions() {
        for scenario in Scenario::ALL {
            let byte: u8 = scenario.into();
            assert_eq!(Scenario::try_from(byte), Ok(scenario));
            assert_eq!(scenario.name().parse::<Scenario>(), Ok(scenario));
        }
        assert_eq!(Scenario::try_from(0x05), Err(0x05));
        assert_eq!("Living_Room".parse::<Scenario>(), Ok(Scenario::LivingRoom));
        assert!("kitchen".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_motion_from_byte() {
        assert_eq!(Motion::from(0x00), Motion::None);
        assert_eq!(Motion::from(0x01), Motion::Still);
        assert_eq!(Motion::from(0x02), Motion::Moving);
        assert_eq!(Motion::from(0x07), Motion::Unknown(0x07));
        assert_eq!(u8::from(Motion::Unknown(0x07)), 0x07);
    }

    #[test]
    fn test_human_report_decode() {
        let frame = Frame::new(HUMAN_STATUS, MOTION, Payload::u8(MOTION_MOVING));
        assert_eq!(
            HumanReport::from_frame(&frame),
            Some(HumanReport::Motion(Motion::Moving))
        );

        let frame = Frame::new(HUMAN_STATUS, PRESENCE, Payload::u8(1));
        assert_eq!(HumanReport::from_frame(&frame), Some(HumanReport::Presence(true)));

        let frame = Frame::new(WORKING_STATUS, GET_SCENARIO, Payload::u8(1));
        assert_eq!(HumanReport::from_frame(&frame), None);
    }
}
