//! mmWave Presence Module Driver
//!
//! Drives a 24GHz mmWave human presence module over any non-blocking byte
//! stream. The driver sends parameter get/set requests and correlates the
//! replies, and keeps a presence/motion status up to date from the reports
//! the module pushes on its own.
//!
//! # Architecture
//!
//! - [`ByteSource`]: the transport boundary; [`IoSource`] adapts any
//!   `Read + Write` stream (e.g. a TCP serial bridge), [`MockSource`] is an
//!   in-memory script for tests
//! - [`Radar`]: owns the source, a [`FrameScanner`](mmwave_protocol::FrameScanner)
//!   and the [`DeviceStatus`]; runs one request/response exchange at a time
//! - [`Parameter`]: the table of tunable settings built on
//!   [`Radar::set_parameter`] and [`Radar::get_parameter`]
//! - [`poll_until`]: the poll-with-deadline loop every wait goes through
//!
//! # Example
//!
//! ```rust,ignore
//! use mmwave_driver::{IoSource, Parameter, Radar, Scenario};
//! use std::time::Duration;
//!
//! let source = IoSource::connect_tcp("192.168.1.50:4000", Duration::from_secs(3))?;
//! let mut radar = Radar::new(source);
//!
//! radar.set_scenario(Scenario::Bedroom)?;
//! let sensitivity = radar.get(Parameter::Sensitivity)?;
//!
//! loop {
//!     if radar.update_status()? {
//!         println!("present={} moving={}", radar.is_present(), radar.is_moving());
//!     }
//! }
//! ```

mod catalog;
mod config;
mod deadline;
mod error;
mod exchange;
mod mock;
mod radar;
mod status;
mod transport;

pub use catalog::*;
pub use config::*;
pub use deadline::*;
pub use error::*;
pub use exchange::*;
pub use mock::*;
pub use radar::*;
pub use status::*;
pub use transport::*;

pub use mmwave_protocol::{Motion, Payload, Scenario};
