//! mmWave Presence Module UART Protocol
//!
//! This crate provides types and utilities for talking to 24GHz mmWave
//! human presence modules over their binary UART protocol. It does no I/O:
//! callers push received bytes into a [`FrameScanner`] and write the bytes
//! of encoded [`Frame`]s themselves.
//!
//! # Protocol Overview
//!
//! Every message is a frame:
//!
//! ```text
//! 0x53 0x59 <control> <command> <lenHi> <lenLo> <payload..> <checksum> 0x54 0x43
//! ```
//!
//! - **Control** selects a category (system, working status, custom settings,
//!   human status)
//! - **Command** selects an operation within it; queries are the set command
//!   with bit 7 set
//! - **Payload** is 1, 2 or 4 bytes, big-endian
//! - **Checksum** is the byte sum of everything before it, modulo 256
//!
//! The module answers a set request by echoing the frame, answers a query
//! with the same control/command and the current value, and pushes
//! `HUMAN_STATUS` reports at any time.
//!
//! # Example
//!
//! ```rust
//! use mmwave_protocol::{Expectation, Frame, FrameScanner, Payload, SET_SCENARIO, WORKING_STATUS};
//!
//! let request = Frame::new(WORKING_STATUS, SET_SCENARIO, Payload::u8(0x01));
//! assert_eq!(
//!     request.as_bytes(),
//!     &[0x53, 0x59, 0x05, 0x07, 0x00, 0x01, 0x01, 0x65, 0x54, 0x43]
//! );
//!
//! let mut scanner = FrameScanner::new();
//! scanner.push(request.as_bytes());
//! let raw = scanner.next_candidate().unwrap().unwrap();
//! let echoed = Expectation::echo_of(WORKING_STATUS, SET_SCENARIO, Payload::u8(0x01))
//!     .validate(&raw)
//!     .unwrap();
//! assert_eq!(echoed.value(), 1);
//! ```

mod constants;
mod error;
mod frame;
mod payload;
mod scanner;
mod types;
mod wire_buf;

pub use constants::*;
pub use error::*;
pub use frame::*;
pub use payload::*;
pub use scanner::*;
pub use types::*;
pub use wire_buf::*;
