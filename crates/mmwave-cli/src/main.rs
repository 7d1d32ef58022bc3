//! `mmwave`: talk to a 24GHz mmWave presence module through a
//! serial-over-TCP bridge.
//!
//! ```text
//! mmwave --address 192.168.1.50:4000 monitor --json
//! mmwave -c bench.yaml get all
//! mmwave -c bench.yaml set scenario bedroom
//! mmwave -c bench.yaml set absence-valid-time 30s
//! ```

mod config;
mod error;
mod monitor;
mod value;

use std::net::TcpStream;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use mmwave_driver::{IoSource, Parameter, Radar};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::value::{format_value, parse_value};

/// Configure and monitor a 24GHz mmWave presence module.
#[derive(Parser, Debug)]
#[command(name = "mmwave", version)]
struct Cli {
    /// Serial bridge address (host:port); overrides the config file.
    #[arg(short, long)]
    address: Option<String>,

    /// YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print presence and motion changes until Ctrl-C.
    Monitor {
        /// One JSON object per line.
        #[arg(long)]
        json: bool,
        /// Stop after this many seconds (0 = unlimited).
        #[arg(long, default_value = "0")]
        seconds: u64,
    },
    /// Read a parameter, or `all`.
    Get { param: String },
    /// Write a parameter.
    Set { param: String, value: String },
    /// Leave custom mode, saving its settings.
    ExitCustom,
    /// Restart the module.
    Reset,
    /// List parameter names and accepted ranges.
    Params,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let open = || connect(&config, cli.address.as_deref());

    match cli.cmd {
        Cmd::Monitor { json, seconds } => {
            let limit = (seconds > 0).then(|| Duration::from_secs(seconds));
            monitor::run(&mut open()?, json, limit)?;
        }
        Cmd::Get { param } if param.eq_ignore_ascii_case("all") => {
            let mut radar = open()?;
            for param in Parameter::ALL {
                match radar.get(param) {
                    Ok(value) => println!("{:<22} {}", param, format_value(param, value)),
                    Err(e) => println!("{:<22} <{}>", param, e),
                }
            }
        }
        Cmd::Get { param } => {
            let param: Parameter = param.parse()?;
            let value = open()?.get(param)?;
            println!("{}", format_value(param, value));
        }
        Cmd::Set { param, value } => {
            let param: Parameter = param.parse()?;
            let value = parse_value(param, &value)?;
            open()?.set(param, value)?;
            println!("{} = {}", param, format_value(param, value));
        }
        Cmd::ExitCustom => {
            open()?.exit_custom_mode()?;
            println!("custom mode closed");
        }
        Cmd::Reset => {
            open()?.reset()?;
            println!("reset sent");
        }
        Cmd::Params => print_params(),
    }
    Ok(())
}

fn connect(config: &CliConfig, address: Option<&str>) -> CliResult<Radar<IoSource<TcpStream>>> {
    let address = config.resolve_address(address)?;
    debug!("connecting to {}", address);
    let source = IoSource::connect_tcp(address.as_str(), config.connect_timeout())
        .map_err(|source| CliError::Connect {
            address: address.clone(),
            source,
        })?;
    Ok(Radar::with_config(source, config.driver.clone())?)
}

fn print_params() {
    for param in Parameter::ALL {
        let spec = param.spec();
        let range = if spec.width == 4 {
            "milliseconds".to_string()
        } else {
            format!("{}..={}", spec.min, spec.max)
        };
        println!(
            "{:<22} control 0x{:02X} set 0x{:02X} get 0x{:02X}  {}",
            spec.name, spec.control, spec.set, spec.get, range
        );
    }
}
