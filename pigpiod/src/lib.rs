// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A thin but safe Rust layer around the pigpio daemon socket interface.
//!
//! The daemon, `pigpiod`, owns the GPIO hardware and accepts commands from
//! any number of clients over TCP, by default on port 8888.
//!
//! ```no_run
//! # fn example() -> Result<(), pigpiod_client::Error> {
//! use pigpiod_client::{Level, Mode, Pi, Pull};
//!
//! let pi = Pi::from_env()?;
//! pi.set_mode(17, Mode::Output)?;
//! pi.set_pull(17, Pull::Off)?;
//! pi.write(17, Level::High)?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod common;
mod pi;
pub mod wire;

pub use common::{Error, ErrorCode, Gpio, Level, Mode, Pull, Result, GPIO_MAX};
pub use pi::{Address, Pi, DEFAULT_HOST, DEFAULT_PORT, ENV_ADDR, ENV_PORT};
