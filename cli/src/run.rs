// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, DaemonOpts, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use daemonize::Daemonize;
use embedded_hal::digital::OutputPin;
use pigpiod_client::Gpio;
use segbang::{DaemonPin, ShiftOut, StdDelay, Timing, PATTERN};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("r"))]
pub struct Opts {
    /// The GPIO driving the shift register clock
    #[arg(short, long, value_name = "gpio", default_value_t = 9)]
    clock: Gpio,

    /// The GPIO driving the shift register serial data input
    #[arg(short, long, value_name = "gpio", default_value_t = 10)]
    data: Gpio,

    /// The GPIO driving the shift register latch
    ///
    /// If specified the latch is pulsed after every 8 bits.
    #[arg(short, long, value_name = "gpio")]
    latch: Option<Gpio>,

    /// The time the clock is held high, and then low, for each bit
    ///
    /// The period is taken as microseconds unless otherwise specified.
    #[arg(short, long, value_name = "period", default_value = "50us", value_parser = common::parse_duration)]
    period: Duration,

    /// Exit after shifting this many bytes
    ///
    /// By default the shifting continues until the process is killed.
    #[arg(short, long, value_name = "count")]
    frames: Option<u64>,

    /// Drive the lines using the GPIO character device rather than pigpiod
    ///
    /// The GPIO numbers are then taken as offsets on the chip.
    ///
    /// The chip may be identified by number, name, or path.
    /// e.g. the following all select the same chip:
    ///     --chip 0
    ///     --chip gpiochip0
    ///     --chip /dev/gpiochip0
    #[cfg(feature = "cdev")]
    #[arg(long, value_name = "chip", verbatim_doc_comment)]
    chip: Option<String>,

    #[command(flatten)]
    daemon_opts: DaemonOpts,

    /// Configure the lines then detach from the controlling terminal
    #[arg(short = 'z', long)]
    daemonize: bool,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    match do_cmd(opts) {
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
        Ok(()) => true,
    }
}

fn do_cmd(opts: &Opts) -> Result<()> {
    #[cfg(feature = "cdev")]
    if let Some(chip) = &opts.chip {
        return shift(opts, cdev::request_lines(chip, opts)?);
    }
    let pi = Arc::new(opts.daemon_opts.connect()?);
    let pin = |gpio| {
        DaemonPin::new(pi.clone(), gpio)
            .with_context(|| format!("unable to configure GPIO{gpio} as an output."))
    };
    let lines = Lines {
        clock: pin(opts.clock)?,
        data: pin(opts.data)?,
        latch: opts.latch.map(pin).transpose()?,
    };
    shift(opts, lines)
}

// The configured output lines.
struct Lines<P> {
    clock: P,
    data: P,
    latch: Option<P>,
}

fn shift<P>(opts: &Opts, lines: Lines<P>) -> Result<()>
where
    P: OutputPin,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let mut shifter =
        ShiftOut::new(lines.clock, lines.data, StdDelay).with_timing(Timing::new(opts.period));
    if let Some(latch) = lines.latch {
        shifter = shifter.with_latch(latch);
    }
    if opts.daemonize {
        Daemonize::new().start()?;
    }
    tracing::info!(
        clock = opts.clock,
        data = opts.data,
        latch = ?opts.latch,
        "shifting {:#04x} with half period {:?}",
        PATTERN,
        opts.period
    );
    match opts.frames {
        Some(count) => shifter.run_frames(count).context("shifting failed.")?,
        None => {
            let never = shifter.run().context("shifting failed.")?;
            match never {}
        }
    }
    Ok(())
}

#[cfg(feature = "cdev")]
mod cdev {
    use super::{Lines, Opts};
    use crate::common;
    use anyhow::{Context, Result};
    use gpiocdev::line::{Bias, Value};
    use gpiocdev::Request;
    use gpiocdev_embedded_hal::OutputPin;
    use std::path::Path;

    pub(super) fn request_lines(chip: &str, opts: &Opts) -> Result<Lines<OutputPin>> {
        let path = common::chip_lookup_from_id(chip)?;
        Ok(Lines {
            clock: request_line(&path, opts.clock)?,
            data: request_line(&path, opts.data)?,
            latch: opts
                .latch
                .map(|offset| request_line(&path, offset))
                .transpose()?,
        })
    }

    fn request_line(chip: &Path, offset: u32) -> Result<OutputPin> {
        let req = Request::builder()
            .on_chip(chip)
            .with_consumer("segbang")
            .with_line(offset)
            .as_output(Value::Inactive)
            .with_bias(Bias::Disabled)
            .request()
            .with_context(|| {
                format!(
                    "unable to request line {} on {}.",
                    offset,
                    chip.display()
                )
            })?;
        tracing::debug!("requested line {} on {}", offset, chip.display());
        Ok(OutputPin::try_from(req)?)
    }
}
