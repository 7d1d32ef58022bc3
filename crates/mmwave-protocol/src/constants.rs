//! Protocol constants
//!
//! Frame delimiters, field offsets and the control/command byte catalog of
//! the mmWave presence module. The byte values are fixed by the module
//! firmware and must match exactly.

// ============================================================================
// Frame Layout
// ============================================================================

/// First frame header byte.
pub const HEAD1: u8 = 0x53;
/// Second frame header byte.
pub const HEAD2: u8 = 0x59;
/// First frame terminator byte.
pub const END1: u8 = 0x54;
/// Second frame terminator byte.
pub const END2: u8 = 0x43;

/// Offset of the control byte.
pub const CONTROL_OFFSET: usize = 2;
/// Offset of the command byte.
pub const COMMAND_OFFSET: usize = 3;
/// Offset of the high byte of the payload length.
pub const LEN_OFFSET: usize = 4;
/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = 6;

/// Bytes before the payload: head(2) + control + command + length(2).
pub const HEADER_SIZE: usize = 6;
/// Bytes after the payload: checksum + end(2).
pub const TRAILER_SIZE: usize = 3;
/// Framing overhead around the payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + TRAILER_SIZE;

/// Largest payload the module ever sends or accepts.
pub const MAX_PAYLOAD_SIZE: usize = 4;
/// Largest legal frame on the wire (13 bytes).
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;
/// Capacity of a candidate frame buffer. Anything longer is malformed.
pub const WIRE_BUF_CAPACITY: usize = 20;

/// Filler payload sent with queries and argument-less actions.
pub const QUERY_PAYLOAD: u8 = 0x0F;

// ============================================================================
// Control Bytes
// ============================================================================

/// System functions (heartbeat, reset, init).
pub const SYSTEM: u8 = 0x01;
/// Working status: scenario, sensitivity, custom mode selection.
pub const WORKING_STATUS: u8 = 0x05;
/// Custom mode settings and the underlying data switch.
pub const CUSTOM: u8 = 0x08;
/// Human status reports.
pub const HUMAN_STATUS: u8 = 0x80;

// ============================================================================
// SYSTEM Commands
// ============================================================================

/// Initialisation complete report.
pub const INIT_COMPLETE: u8 = 0x01;
/// Module reset.
pub const RESET: u8 = 0x02;

// ============================================================================
// WORKING_STATUS Commands
// ============================================================================

/// Set scenario preset.
pub const SET_SCENARIO: u8 = 0x07;
/// Query scenario preset.
pub const GET_SCENARIO: u8 = 0x87;
/// Set sensitivity (1-3).
pub const SET_SENSITIVITY: u8 = 0x08;
/// Query sensitivity.
pub const GET_SENSITIVITY: u8 = 0x88;
/// Enter a custom mode (1-4).
pub const OPEN_CUSTOM: u8 = 0x09;
/// Query the active custom mode.
pub const GET_CUSTOM: u8 = 0x89;
/// Leave custom mode, saving its settings.
pub const EXIT_CUSTOM: u8 = 0x0A;

// ============================================================================
// CUSTOM Commands
// ============================================================================

/// Underlying (raw) data reporting on/off.
pub const SET_UNDERLYING: u8 = 0x00;
/// Query underlying data reporting.
pub const GET_UNDERLYING: u8 = 0x80;
/// Presence threshold (0-250).
pub const SET_PRESENCE_THRESHOLD: u8 = 0x08;
/// Motion threshold (0-250).
pub const SET_MOTION_THRESHOLD: u8 = 0x09;
/// Presence detection range (0-10, half metres).
pub const SET_PRESENCE_RANGE: u8 = 0x0A;
/// Motion detection range (0-10, half metres).
pub const SET_MOTION_RANGE: u8 = 0x0B;
/// Time motion must persist before it is reported (ms, 4 bytes).
pub const SET_MOTION_VALID_TIME: u8 = 0x0C;
/// Time from motion to stationary report (ms, 4 bytes).
pub const SET_STATIONARY_VALID_TIME: u8 = 0x0D;
/// Time from stationary to absence report (ms, 4 bytes).
pub const SET_ABSENCE_VALID_TIME: u8 = 0x0E;

/// Bit that turns a set command into its query counterpart.
pub const GET_FLAG: u8 = 0x80;

/// Query presence threshold.
pub const GET_PRESENCE_THRESHOLD: u8 = SET_PRESENCE_THRESHOLD | GET_FLAG;
/// Query motion threshold.
pub const GET_MOTION_THRESHOLD: u8 = SET_MOTION_THRESHOLD | GET_FLAG;
/// Query presence range.
pub const GET_PRESENCE_RANGE: u8 = SET_PRESENCE_RANGE | GET_FLAG;
/// Query motion range.
pub const GET_MOTION_RANGE: u8 = SET_MOTION_RANGE | GET_FLAG;
/// Query motion valid time.
pub const GET_MOTION_VALID_TIME: u8 = SET_MOTION_VALID_TIME | GET_FLAG;
/// Query stationary valid time.
pub const GET_STATIONARY_VALID_TIME: u8 = SET_STATIONARY_VALID_TIME | GET_FLAG;
/// Query absence valid time.
pub const GET_ABSENCE_VALID_TIME: u8 = SET_ABSENCE_VALID_TIME | GET_FLAG;

// ============================================================================
// HUMAN_STATUS Commands
// ============================================================================

/// Presence report (0 absent, 1 present).
pub const PRESENCE: u8 = 0x01;
/// Motion report (0 none, 1 still, 2 moving).
pub const MOTION: u8 = 0x02;
/// Body movement amplitude report.
pub const AMPLITUDE_DATA: u8 = 0x03;
/// Set time before absence is reported (enumerated).
pub const SET_TIME_OF_ABSENCE: u8 = 0x0A;
/// Query time before absence is reported.
pub const GET_TIME_OF_ABSENCE: u8 = SET_TIME_OF_ABSENCE | GET_FLAG;
/// Approach / leave position report.
pub const POSITION_EVENT: u8 = 0x0B;

// ============================================================================
// Value Bytes
// ============================================================================

/// Motion payload: nobody there.
pub const MOTION_NONE: u8 = 0x00;
/// Motion payload: someone present and still.
pub const MOTION_STILL: u8 = 0x01;
/// Motion payload: someone moving.
pub const MOTION_MOVING: u8 = 0x02;

/// Scenario: living room.
pub const LIVING_ROOM: u8 = 0x01;
/// Scenario: area detection.
pub const AREA_DETECTION: u8 = 0x02;
/// Scenario: bathroom.
pub const BATHROOM: u8 = 0x03;
/// Scenario: bedroom.
pub const BEDROOM: u8 = 0x04;
