//! Parsing and printing parameter values.

use std::time::Duration;

use mmwave_driver::{Parameter, Scenario};

use crate::error::{CliError, CliResult};

/// Parse a command-line value for `param`.
///
/// Scenarios accept their names, the underlying switch accepts `on`/`off`,
/// valid times accept an `ms` or `s` suffix (bare numbers are milliseconds).
pub fn parse_value(param: Parameter, text: &str) -> CliResult<u32> {
    let text = text.trim();
    let invalid = |reason: &str| CliError::InvalidArgument {
        param: param.name().to_string(),
        value: text.to_string(),
        reason: reason.to_string(),
    };

    match param {
        Parameter::Scenario => {
            if let Ok(scenario) = text.parse::<Scenario>() {
                return Ok(u8::from(scenario) as u32);
            }
        }
        Parameter::Underlying => match text.to_lowercase().as_str() {
            "on" | "true" => return Ok(1),
            "off" | "false" => return Ok(0),
            _ => {}
        },
        _ if param.spec().width == 4 => {
            let (digits, scale) = if let Some(s) = text.strip_suffix("ms") {
                (s, 1)
            } else if let Some(s) = text.strip_suffix('s') {
                (s, 1_000)
            } else {
                (text, 1)
            };
            let n: u32 = digits
                .trim()
                .parse()
                .map_err(|_| invalid("expected a duration such as 1500, 1500ms or 30s"))?;
            return n
                .checked_mul(scale)
                .ok_or_else(|| invalid("duration too long"));
        }
        _ => {}
    }

    text.parse().map_err(|_| invalid("expected a number"))
}

/// Human-readable rendering of a value read back from the module.
pub fn format_value(param: Parameter, value: u32) -> String {
    match param {
        Parameter::Scenario => match u8::try_from(value).ok().and_then(|b| Scenario::try_from(b).ok()) {
            Some(scenario) => format!("{} ({})", value, scenario),
            None => format!("{} (unknown)", value),
        },
        Parameter::Underlying => (if value != 0 { "on" } else { "off" }).to_string(),
        _ if param.spec().width == 4 => format!("{:?}", Duration::from_millis(value as u64)),
        _ => value.to_string(),
    }
}
