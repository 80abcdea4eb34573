// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{emit_error, DaemonOpts, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use pigpiod_client::Pi;
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(aliases(["i"]))]
pub struct Opts {
    #[command(flatten)]
    daemon_opts: DaemonOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    match DaemonInfo::read(opts) {
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
        Ok(info) => {
            info.emit(&opts.emit);
            true
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Eq, PartialEq)]
struct DaemonInfo {
    address: String,
    version: u32,
    hardware_revision: u32,
    tick: u32,
    bank1: u32,
}

impl DaemonInfo {
    fn read(opts: &Opts) -> Result<DaemonInfo> {
        let pi = opts.daemon_opts.connect()?;
        DaemonInfo::from_pi(&pi)
    }

    fn from_pi(pi: &Pi) -> Result<DaemonInfo> {
        Ok(DaemonInfo {
            address: pi.address().to_string(),
            version: pi.version().context("unable to read daemon version.")?,
            hardware_revision: pi
                .hardware_revision()
                .context("unable to read hardware revision.")?,
            tick: pi.tick().context("unable to read tick.")?,
            bank1: pi.read_bank1().context("unable to read bank 1 levels.")?,
        })
    }

    fn emit(&self, opts: &EmitOpts) {
        #[cfg(feature = "json")]
        if opts.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => emit_error(opts, &e.into()),
            }
            return;
        }
        self.print(opts.verbose);
    }

    fn print(&self, verbose: bool) {
        println!("pigpiod {} at {}", self.version, self.address);
        println!("\thardware revision:\t{:#010x}", self.hardware_revision);
        println!("\ttick:\t\t\t{}us", self.tick);
        let high: Vec<String> = high_gpios(self.bank1)
            .map(|gpio| format!("GPIO{gpio}"))
            .collect();
        if high.is_empty() {
            println!("\thigh lines:\t\tnone");
        } else {
            println!("\thigh lines:\t\t{}", high.join(" "));
        }
        if verbose {
            println!("\tbank 1:\t\t\t{:#034b}", self.bank1);
        }
    }
}

// The GPIOs set in a bank 1 level bitmap.
fn high_gpios(bank1: u32) -> impl Iterator<Item = u32> {
    (0..32).filter(move |gpio| bank1 & (1 << gpio) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigpiod_client::Address;

    #[test]
    fn high_gpios_from_bitmap() {
        assert_eq!(high_gpios(0).count(), 0);
        assert_eq!(
            high_gpios((1 << 9) | (1 << 10) | (1 << 31)).collect::<Vec<_>>(),
            vec![9, 10, 31]
        );
    }

    #[test]
    fn from_sim() {
        let s = pigsim::Sim::new().unwrap();
        s.set_hardware_revision(0xa02082);
        s.set_level(10, pigsim::Level::High);
        let pi = Pi::connect(&Address::new("127.0.0.1", s.port())).unwrap();

        let info = DaemonInfo::from_pi(&pi).unwrap();
        assert_eq!(info.address, format!("127.0.0.1:{}", s.port()));
        assert_eq!(info.version, 79);
        assert_eq!(info.hardware_revision, 0xa02082);
        assert_eq!(info.bank1, 1 << 10);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json() {
        let info = DaemonInfo {
            address: "localhost:8888".into(),
            version: 79,
            hardware_revision: 0xa02082,
            tick: 1234,
            bank1: 0,
        };
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            "{\"address\":\"localhost:8888\",\"version\":79,\
             \"hardware_revision\":10494082,\"tick\":1234,\"bank1\":0}"
        );
    }
}
