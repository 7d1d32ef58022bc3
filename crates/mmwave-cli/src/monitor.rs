//! `mmwave monitor`: print presence/motion changes until interrupted.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use mmwave_driver::{DeviceStatus, IoSource, Radar};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CliResult;

/// How long one wait lasts before the stop flag is checked again.
const WAIT_SLICE: Duration = Duration::from_millis(250);

#[derive(Debug, Serialize)]
pub struct StatusLine {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub status: DeviceStatus,
}

impl StatusLine {
    pub fn now(status: DeviceStatus) -> Self {
        StatusLine {
            timestamp: Utc::now(),
            status,
        }
    }

    pub fn render(&self, json: bool) -> CliResult<String> {
        if json {
            return Ok(serde_json::to_string(self)?);
        }
        Ok(format!(
            "{} present={} motion={}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            if self.status.presence { "yes" } else { "no" },
            self.status.motion
        ))
    }
}

/// Stream status lines until Ctrl-C, `limit` elapses, or the bridge closes.
pub fn run<T: Read + Write>(
    radar: &mut Radar<IoSource<T>>,
    json: bool,
    limit: Option<Duration>,
) -> CliResult<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    radar.update_status()?;
    println!("{}", StatusLine::now(radar.status()).render(json)?);

    let started = Instant::now();
    while running.load(Ordering::SeqCst) {
        if limit.is_some_and(|limit| started.elapsed() >= limit) {
            info!("monitor time limit reached");
            break;
        }
        match radar.wait_for_change(WAIT_SLICE) {
            Ok(true) => println!("{}", StatusLine::now(radar.status()).render(json)?),
            Ok(false) => {}
            Err(e) if e.is_disconnected() => {
                warn!("bridge closed the connection");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
