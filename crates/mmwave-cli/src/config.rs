//! YAML configuration for the `mmwave` tool.
//!
//! ```yaml
//! address: 192.168.1.50:4000
//! connect_timeout_ms: 3000
//! driver:
//!   response_timeout_ms: 2000
//!   poll_interval_ms: 2
//! ```
//!
//! Every key is optional. `--address` on the command line wins over the file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use mmwave_driver::DriverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Serial bridge `host:port`.
    pub address: Option<String>,
    pub connect_timeout_ms: u64,
    pub driver: DriverConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            address: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            driver: DriverConfig::default(),
        }
    }
}

impl CliConfig {
    /// Read a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(CliConfig::default());
        };
        let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> CliResult<Self> {
        let config: CliConfig = serde_yaml::from_str(text)?;
        config.driver.validate()?;
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Bridge address, preferring the command-line override.
    pub fn resolve_address(&self, cli: Option<&str>) -> CliResult<String> {
        cli.map(str::to_string)
            .or_else(|| self.address.clone())
            .ok_or(CliError::MissingAddress)
    }
}
