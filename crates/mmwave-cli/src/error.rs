//! Error type for the command-line tool.

use std::io;
use std::path::PathBuf;

use mmwave_driver::DriverError;
use thiserror::Error;

/// Errors reported by `mmwave`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid YAML for [`CliConfig`](crate::config::CliConfig).
    #[error("invalid config: {0}")]
    ParseConfig(#[from] serde_yaml::Error),

    /// Neither `--address` nor the config file names a bridge.
    #[error("no bridge address given (use --address or set `address` in the config)")]
    MissingAddress,

    /// TCP connection to the bridge failed.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    /// A command-line value could not be parsed.
    #[error("invalid value '{value}' for {param}: {reason}")]
    InvalidArgument {
        param: String,
        value: String,
        reason: String,
    },

    /// Talking to the module failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type CliResult<T> = Result<T, CliError>;
