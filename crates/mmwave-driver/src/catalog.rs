//! Parameter catalog.
//!
//! Every tunable setting is a row in one table: where it lives (control
//! byte), how to set and query it (command bytes), how wide its payload is
//! and which values the module accepts. The typed accessors on [`Radar`]
//! are thin layers over this table.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mmwave_protocol::*;

use crate::error::{DriverError, DriverResult};
use crate::radar::Radar;
use crate::transport::ByteSource;

/// Location and limits of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name used on the command line and in errors.
    pub name: &'static str,
    /// Control byte.
    pub control: u8,
    /// Set command byte.
    pub set: u8,
    /// Query command byte.
    pub get: u8,
    /// Payload width of a set request.
    pub width: usize,
    /// Smallest accepted value.
    pub min: u32,
    /// Largest accepted value.
    pub max: u32,
}

/// A tunable module setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Scenario preset (1-4).
    Scenario,
    /// Sensitivity (1-3).
    Sensitivity,
    /// Custom mode selection (1-4); setting it enters custom mode.
    CustomMode,
    /// Underlying data reporting switch (0/1).
    Underlying,
    /// Presence threshold (0-250).
    PresenceThreshold,
    /// Motion threshold (0-250).
    MotionThreshold,
    /// Presence range in half metres (0-10).
    PresenceRange,
    /// Motion range in half metres (0-10).
    MotionRange,
    /// Motion valid time in milliseconds.
    MotionValidTime,
    /// Stationary valid time in milliseconds.
    StationaryValidTime,
    /// Absence valid time in milliseconds.
    AbsenceValidTime,
    /// Enumerated time before absence is reported (0-8).
    TimeOfAbsence,
}

const fn byte_param(name: &'static str, control: u8, set: u8, get: u8, min: u32, max: u32) -> ParamSpec {
    ParamSpec { name, control, set, get, width: 1, min, max }
}

const fn time_param(name: &'static str, set: u8, get: u8) -> ParamSpec {
    ParamSpec { name, control: CUSTOM, set, get, width: 4, min: 0, max: u32::MAX }
}

const SCENARIO_SPEC: ParamSpec = byte_param("scenario", WORKING_STATUS, SET_SCENARIO, GET_SCENARIO, 1, 4);
const SENSITIVITY_SPEC: ParamSpec =
    byte_param("sensitivity", WORKING_STATUS, SET_SENSITIVITY, GET_SENSITIVITY, 1, 3);
const CUSTOM_MODE_SPEC: ParamSpec = byte_param("custom-mode", WORKING_STATUS, OPEN_CUSTOM, GET_CUSTOM, 1, 4);
const UNDERLYING_SPEC: ParamSpec = byte_param("underlying", CUSTOM, SET_UNDERLYING, GET_UNDERLYING, 0, 1);
const PRESENCE_THRESHOLD_SPEC: ParamSpec = byte_param(
    "presence-threshold",
    CUSTOM,
    SET_PRESENCE_THRESHOLD,
    GET_PRESENCE_THRESHOLD,
    0,
    250,
);
const MOTION_THRESHOLD_SPEC: ParamSpec = byte_param(
    "motion-threshold",
    CUSTOM,
    SET_MOTION_THRESHOLD,
    GET_MOTION_THRESHOLD,
    0,
    250,
);
const PRESENCE_RANGE_SPEC: ParamSpec =
    byte_param("presence-range", CUSTOM, SET_PRESENCE_RANGE, GET_PRESENCE_RANGE, 0, 10);
const MOTION_RANGE_SPEC: ParamSpec =
    byte_param("motion-range", CUSTOM, SET_MOTION_RANGE, GET_MOTION_RANGE, 0, 10);
const MOTION_VALID_TIME_SPEC: ParamSpec =
    time_param("motion-valid-time", SET_MOTION_VALID_TIME, GET_MOTION_VALID_TIME);
const STATIONARY_VALID_TIME_SPEC: ParamSpec = time_param(
    "stationary-valid-time",
    SET_STATIONARY_VALID_TIME,
    GET_STATIONARY_VALID_TIME,
);
const ABSENCE_VALID_TIME_SPEC: ParamSpec =
    time_param("absence-valid-time", SET_ABSENCE_VALID_TIME, GET_ABSENCE_VALID_TIME);
const TIME_OF_ABSENCE_SPEC: ParamSpec = byte_param(
    "time-of-absence",
    HUMAN_STATUS,
    SET_TIME_OF_ABSENCE,
    GET_TIME_OF_ABSENCE,
    0,
    8,
);

impl Parameter {
    /// Every parameter, in table order.
    pub const ALL: [Parameter; 12] = [
        Parameter::Scenario,
        Parameter::Sensitivity,
        Parameter::CustomMode,
        Parameter::Underlying,
        Parameter::PresenceThreshold,
        Parameter::MotionThreshold,
        Parameter::PresenceRange,
        Parameter::MotionRange,
        Parameter::MotionValidTime,
        Parameter::StationaryValidTime,
        Parameter::AbsenceValidTime,
        Parameter::TimeOfAbsence,
    ];

    /// The table row for this parameter.
    pub fn spec(&self) -> &'static ParamSpec {
        match self {
            Parameter::Scenario => &SCENARIO_SPEC,
            Parameter::Sensitivity => &SENSITIVITY_SPEC,
            Parameter::CustomMode => &CUSTOM_MODE_SPEC,
            Parameter::Underlying => &UNDERLYING_SPEC,
            Parameter::PresenceThreshold => &PRESENCE_THRESHOLD_SPEC,
            Parameter::MotionThreshold => &MOTION_THRESHOLD_SPEC,
            Parameter::PresenceRange => &PRESENCE_RANGE_SPEC,
            Parameter::MotionRange => &MOTION_RANGE_SPEC,
            Parameter::MotionValidTime => &MOTION_VALID_TIME_SPEC,
            Parameter::StationaryValidTime => &STATIONARY_VALID_TIME_SPEC,
            Parameter::AbsenceValidTime => &ABSENCE_VALID_TIME_SPEC,
            Parameter::TimeOfAbsence => &TIME_OF_ABSENCE_SPEC,
        }
    }

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Range-check `value` and build the set payload.
    pub fn payload(&self, value: u32) -> DriverResult<Payload> {
        let spec = self.spec();
        if value < spec.min || value > spec.max {
            return Err(DriverError::InvalidValue {
                param: spec.name,
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        Ok(match spec.width {
            1 => Payload::u8(value as u8),
            2 => Payload::u16(value as u16),
            _ => Payload::u32(value),
        })
    }
}

impl FromStr for Parameter {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Parameter::ALL
            .into_iter()
            .find(|param| param.name() == wanted)
            .ok_or_else(|| DriverError::UnknownParameter(s.to_string()))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Argument-less commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Restart the module. Settings are kept.
    Reset,
    /// Leave custom mode, saving its settings.
    ExitCustomMode,
}

impl Action {
    /// Control and command bytes of the action.
    pub fn address(&self) -> (u8, u8) {
        match self {
            Action::Reset => (SYSTEM, RESET),
            Action::ExitCustomMode => (WORKING_STATUS, EXIT_CUSTOM),
        }
    }
}

impl<S: ByteSource> Radar<S> {
    /// Set a parameter from the catalog.
    pub fn set(&mut self, param: Parameter, value: u32) -> DriverResult<()> {
        let payload = param.payload(value)?;
        let spec = param.spec();
        self.set_parameter(spec.control, spec.set, payload)
    }

    /// Query a parameter from the catalog.
    pub fn get(&mut self, param: Parameter) -> DriverResult<u32> {
        let spec = param.spec();
        self.get_parameter(spec.control, spec.get)
            .map(|payload| payload.value())
    }

    /// Run an argument-less command.
    pub fn perform(&mut self, action: Action) -> DriverResult<()> {
        let (control, command) = action.address();
        self.set_parameter(control, command, Payload::u8(QUERY_PAYLOAD))
    }

    /// Restart the module.
    pub fn reset(&mut self) -> DriverResult<()> {
        self.perform(Action::Reset)
    }

    /// Select a scenario preset.
    pub fn set_scenario(&mut self, scenario: Scenario) -> DriverResult<()> {
        self.set(Parameter::Scenario, u8::from(scenario) as u32)
    }

    /// Current scenario preset.
    pub fn scenario(&mut self) -> DriverResult<Scenario> {
        let value = self.get(Parameter::Scenario)?;
        u8::try_from(value)
            .ok()
            .and_then(|byte| Scenario::try_from(byte).ok())
            .ok_or(DriverError::UnexpectedValue {
                param: Parameter::Scenario.name(),
                value,
            })
    }

    /// Enter custom mode `mode` (1-4).
    pub fn open_custom_mode(&mut self, mode: u8) -> DriverResult<()> {
        self.set(Parameter::CustomMode, mode as u32)
    }

    /// Leave custom mode, saving its settings.
    pub fn exit_custom_mode(&mut self) -> DriverResult<()> {
        self.perform(Action::ExitCustomMode)
    }

    /// Turn underlying data reporting on or off.
    pub fn set_underlying(&mut self, enabled: bool) -> DriverResult<()> {
        self.set(Parameter::Underlying, enabled as u32)
    }

    /// Set one of the valid-time parameters.
    pub fn set_valid_time(&mut self, param: Parameter, time: Duration) -> DriverResult<()> {
        let ms = time_param_millis(param, time)?;
        self.set(param, ms)
    }

    /// Read one of the valid-time parameters.
    pub fn valid_time(&mut self, param: Parameter) -> DriverResult<Duration> {
        ensure_time_param(param)?;
        self.get(param).map(|ms| Duration::from_millis(ms as u64))
    }
}

fn ensure_time_param(param: Parameter) -> DriverResult<()> {
    if param.spec().width != 4 {
        return Err(DriverError::NotATimeParameter(param.name()));
    }
    Ok(())
}

/// Convert a valid time to the millisecond count sent on the wire.
fn time_param_millis(param: Parameter, time: Duration) -> DriverResult<u32> {
    ensure_time_param(param)?;
    u32::try_from(time.as_millis()).map_err(|_| DriverError::DurationTooLong {
        param: param.name(),
        requested: time,
        max: Duration::from_millis(u32::MAX as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_no_duplicate_addresses() {
        let mut seen = HashSet::new();
        for param in Parameter::ALL {
            let spec = param.spec();
            assert!(seen.insert((spec.control, spec.set)), "{} set collides", spec.name);
            assert!(seen.insert((spec.control, spec.get)), "{} get collides", spec.name);
        }
        for action in [Action::Reset, Action::ExitCustomMode] {
            assert!(seen.insert(action.address()), "{:?} collides", action);
        }
    }

    #[test]
    fn test_get_commands_have_query_bit() {
        for param in Parameter::ALL {
            let spec = param.spec();
            assert_eq!(spec.get, spec.set | GET_FLAG, "{}", spec.name);
        }
    }

    #[test]
    fn test_payload_range_checks() {
        assert_eq!(Parameter::Sensitivity.payload(2).unwrap(), Payload::u8(2));
        assert!(matches!(
            Parameter::Sensitivity.payload(4),
            Err(DriverError::InvalidValue { min: 1, max: 3, .. })
        ));
        assert!(Parameter::PresenceRange.payload(11).is_err());
        assert_eq!(
            Parameter::AbsenceValidTime.payload(60_000).unwrap(),
            Payload::u32(60_000)
        );
    }

    #[test]
    fn test_valid_time_conversion() {
        assert_eq!(
            time_param_millis(Parameter::MotionValidTime, Duration::from_secs(30)).unwrap(),
            30_000
        );
        assert_eq!(
            time_param_millis(Parameter::AbsenceValidTime, Duration::from_millis(u32::MAX as u64))
                .unwrap(),
            u32::MAX
        );
        assert!(matches!(
            time_param_millis(Parameter::AbsenceValidTime, Duration::from_secs(5_000_000)),
            Err(DriverError::DurationTooLong { .. })
        ));
        assert!(matches!(
            time_param_millis(Parameter::Sensitivity, Duration::from_secs(1)),
            Err(DriverError::NotATimeParameter("sensitivity"))
        ));
    }

    #[test]
    fn test_names_parse() {
        for param in Parameter::ALL {
            assert_eq!(param.name().parse::<Parameter>().unwrap(), param);
        }
        assert_eq!(
            "MOTION_RANGE".parse::<Parameter>().unwrap(),
            Parameter::MotionRange
        );
        assert!(matches!(
            "volume".parse::<Parameter>(),
            Err(DriverError::UnknownParameter(_))
        ));
    }
}
