// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use clap::Parser;
use pigpiod_client::{Address, Pi};
use std::time::Duration;

// common helper functions

#[cfg(feature = "cdev")]
fn chip_path_from_id(id: &str) -> std::path::PathBuf {
    if id.chars().all(char::is_numeric) {
        // from number
        return format!("/dev/gpiochip{id}").into();
    }
    if !id.chars().any(|x| x == '/') {
        // from name
        let mut p: std::path::PathBuf = "/dev".into();
        p.push(id);
        return p;
    }
    // from raw path
    id.into()
}

#[cfg(feature = "cdev")]
pub fn chip_lookup_from_id(id: &str) -> Result<std::path::PathBuf> {
    gpiocdev::chip::is_chip(chip_path_from_id(id))
        .with_context(|| format!("cannot find GPIO chip character device '{id}'"))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms', 'us' or 'ns'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
    #[error("'{0}' is too large")]
    Overflow(String),
}

/// Parse a duration, taken as microseconds unless units are provided.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let t = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let t = num
                .parse::<u64>()
                .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
            t.checked_mul(match units {
                "ns" => 1,
                "us" => 1000,
                "ms" => 1000000,
                "s" => 1000000000,
                _ => return Err(ParseDurationError::Units(s.into())),
            })
        }
        None => s
            .parse::<u64>()
            .map_err(|e| ParseDurationError::ParseDigits(s.into(), e))?
            .checked_mul(1000),
    }
    .ok_or_else(|| ParseDurationError::Overflow(s.into()))?;
    Ok(Duration::from_nanos(t))
}

// common command line parser options

#[derive(Debug, Parser)]
/// Options to locate the pigpio daemon.
pub struct DaemonOpts {
    /// The host running pigpiod
    #[arg(long, value_name = "host", env = pigpiod_client::ENV_ADDR, default_value = pigpiod_client::DEFAULT_HOST)]
    pub host: String,

    /// The port pigpiod is listening on
    #[arg(long, value_name = "port", env = pigpiod_client::ENV_PORT, default_value_t = pigpiod_client::DEFAULT_PORT)]
    pub port: u16,

    /// The maximum time to wait to establish the connection
    ///
    /// The period is taken as microseconds unless otherwise specified.
    #[arg(long, value_name = "period", value_parser = parse_duration)]
    pub connect_timeout: Option<Duration>,
}

impl DaemonOpts {
    pub fn address(&self) -> Address {
        Address::new(&self.host, self.port)
    }

    pub fn connect(&self) -> Result<Pi> {
        let addr = self.address();
        Pi::connect_timeout(&addr, self.connect_timeout)
            .with_context(|| format!("unable to reach pigpiod on {}.", addr.host))
    }
}

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    #[arg(from_global)]
    pub verbose: bool,

    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,
}

pub fn emit_error(opts: &EmitOpts, e: &anyhow::Error) {
    let e_str = format_error(opts, e);
    tracing::debug!("{:#}", e);
    #[cfg(feature = "json")]
    if opts.json {
        println!("{{\"error\":\"{e_str}\"}}");
        return;
    }
    eprintln!("{e_str}");
}

pub fn format_error(opts: &EmitOpts, e: &anyhow::Error) -> String {
    if opts.verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

/// Install the tracing subscriber, writing to stderr.
pub fn init_tracing(filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(filter)
        .with_context(|| format!("invalid trace filter '{filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        #[test]
        fn duration() {
            use super::{parse_duration, ParseDurationError};
            use std::time::Duration;

            assert_eq!(
                parse_duration("0").expect("duration should be valid"),
                Duration::ZERO
            );
            assert_eq!(
                parse_duration("50").expect("duration should be valid"),
                Duration::from_micros(50)
            );
            assert_eq!(
                parse_duration("2ms").expect("duration should be valid"),
                Duration::from_millis(2)
            );
            assert_eq!(
                parse_duration("3us").expect("duration should be valid"),
                Duration::from_micros(3)
            );
            assert_eq!(
                parse_duration("4s").expect("duration should be valid"),
                Duration::new(4, 0)
            );
            assert_eq!(
                parse_duration("500ns").expect("duration should be valid"),
                Duration::from_nanos(500)
            );
            assert_eq!(
                parse_duration("5m").expect_err("duration should be invalid"),
                ParseDurationError::Units("5m".to_string())
            );
            assert_eq!(
                parse_duration("bad").expect_err("duration should be invalid"),
                ParseDurationError::NoDigits("bad".to_string())
            );
            assert_eq!(
                parse_duration("18446744073s").expect("duration should be valid"),
                Duration::from_nanos(18446744073000000000)
            );
            assert_eq!(
                parse_duration("18446744074s").expect_err("duration should be invalid"),
                ParseDurationError::Overflow("18446744074s".to_string())
            );
            assert_eq!(
                parse_duration("18446744073709552").expect_err("duration should be invalid"),
                ParseDurationError::Overflow("18446744073709552".to_string())
            );
        }
    }

    #[cfg(feature = "cdev")]
    #[test]
    fn chip_path() {
        use std::path::PathBuf;

        assert_eq!(chip_path_from_id("0"), PathBuf::from("/dev/gpiochip0"));
        assert_eq!(
            chip_path_from_id("gpiochip4"),
            PathBuf::from("/dev/gpiochip4")
        );
        assert_eq!(
            chip_path_from_id("/dev/gpiochip1"),
            PathBuf::from("/dev/gpiochip1")
        );
    }

    #[test]
    fn daemon_address() {
        let opts = DaemonOpts {
            host: "pi4".into(),
            port: 9999,
            connect_timeout: None,
        };
        assert_eq!(opts.address(), Address::new("pi4", 9999));
    }
}
