//! Driver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};

/// Default time to wait for a matching reply (milliseconds).
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 5_000;
/// Default sleep between empty polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2;
/// Default number of bytes pulled from the source per read.
pub const DEFAULT_READ_CHUNK: usize = 64;

/// Timing and buffering settings for a [`Radar`](crate::Radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// How long a get/set waits for its reply.
    pub response_timeout_ms: u64,
    /// Sleep between polls that found nothing.
    pub poll_interval_ms: u64,
    /// Bytes read from the source per read call.
    pub read_chunk: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

impl DriverConfig {
    /// Reply budget as a duration.
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Set the reply budget.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Check the settings make sense.
    pub fn validate(&self) -> DriverResult<()> {
        if self.read_chunk == 0 {
            return Err(DriverError::InvalidConfig("read_chunk must be at least 1".into()));
        }
        if self.poll_interval_ms > self.response_timeout_ms {
            return Err(DriverError::InvalidConfig(format!(
                "poll_interval_ms ({}) exceeds response_timeout_ms ({})",
                self.poll_interval_ms, self.response_timeout_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.response_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config: DriverConfig = serde_yaml::from_str("response_timeout_ms: 250\n").unwrap();
        assert_eq!(config.response_timeout_ms, 250);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.read_chunk, DEFAULT_READ_CHUNK);
    }

    #[test]
    fn test_yaml_rejects_unknown_fields() {
        let result: Result<DriverConfig, _> = serde_yaml::from_str("timeout: 250\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let config = DriverConfig {
            read_chunk: 0,
            ..DriverConfig::default()
        };
        assert!(matches!(config.validate(), Err(DriverError::InvalidConfig(_))));

        let config = DriverConfig::default()
            .with_response_timeout(Duration::from_millis(10))
            .with_poll_interval(Duration::from_millis(20));
        assert!(config.validate().is_err());
    }
}
