// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library to bit-bang a byte into a shift register, such as one driving
//! a 7-segment display, over a clock and a data line.
//!
//! The [`ShiftOut`] driver works with any [`embedded_hal::digital::OutputPin`]
//! and [`embedded_hal::delay::DelayNs`].
//! [`DaemonPin`] provides output pins driven through the pigpio daemon.
//!
//! # Example Usage
//!
//! Shifting the pattern out of GPIO9 (clock) and GPIO10 (data) forever:
//!
//! ```no_run
//! # fn example() -> Result<(), segbang::Error> {
//! use segbang::{DaemonPin, ShiftOut, StdDelay, Timing};
//! use std::sync::Arc;
//!
//! let pi = Arc::new(pigpiod_client::Pi::from_env()?);
//! let mut shifter = ShiftOut::new(
//!     DaemonPin::new(pi.clone(), 9)?,
//!     DaemonPin::new(pi, 10)?,
//!     StdDelay,
//! )
//! .with_timing(Timing::from_micros(50));
//! shifter.run()?;
//! # Ok(())
//! # }
//! ```

pub mod bits;
mod daemon;
mod shifter;
mod timing;

pub use bits::{BitIndex, FRAME_BITS, PATTERN};
pub use daemon::DaemonPin;
pub use shifter::ShiftOut;
pub use timing::{StdDelay, Timing, DEFAULT_HALF_PERIOD};

/// Errors returned by [`segbang`](crate) types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error returned from an underlying pigpiod call.
    #[error("pigpiod returned: {0}")]
    Daemon(#[source] pigpiod_client::Error),
}

impl From<pigpiod_client::Error> for Error {
    fn from(err: pigpiod_client::Error) -> Self {
        Self::Daemon(err)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
