// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

/// A Broadcom GPIO number.
///
/// The daemon accepts 0..=53, though only 0..=31 (bank 1) are generally
/// exposed on the header.
pub type Gpio = u32;

/// The highest GPIO number accepted by the daemon.
pub const GPIO_MAX: Gpio = 53;

/// The physical level of a line.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Level {
    /// The line is low.
    #[default]
    Low,

    /// The line is high.
    High,
}

impl Level {
    /// The opposite level.
    #[inline]
    pub fn not(&self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(b: bool) -> Self {
        if b {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(l: Level) -> Self {
        l == Level::High
    }
}

impl From<Level> for u32 {
    fn from(l: Level) -> Self {
        match l {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "0"),
            Level::High => write!(f, "1"),
        }
    }
}

/// The function selected for a GPIO.
///
/// The discriminants are the daemon's mode codes, which are not in
/// alternate function order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Mode {
    Input = 0,
    Output = 1,
    Alt0 = 4,
    Alt1 = 5,
    Alt2 = 6,
    Alt3 = 7,
    Alt4 = 3,
    Alt5 = 2,
}

impl TryFrom<u32> for Mode {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Ok(match code {
            0 => Mode::Input,
            1 => Mode::Output,
            2 => Mode::Alt5,
            3 => Mode::Alt4,
            4 => Mode::Alt0,
            5 => Mode::Alt1,
            6 => Mode::Alt2,
            7 => Mode::Alt3,
            _ => return Err(Error::InvalidMode(code)),
        })
    }
}

/// The pull resistor applied to a GPIO.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Pull {
    /// No pull resistor.
    #[default]
    Off = 0,

    /// Pulled to ground.
    Down = 1,

    /// Pulled to 3V3.
    Up = 2,
}

/// An error code returned by the daemon in place of a result.
///
/// Always negative.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const INIT_FAILED: ErrorCode = ErrorCode(-1);
    pub const BAD_USER_GPIO: ErrorCode = ErrorCode(-2);
    pub const BAD_GPIO: ErrorCode = ErrorCode(-3);
    pub const BAD_MODE: ErrorCode = ErrorCode(-4);
    pub const BAD_LEVEL: ErrorCode = ErrorCode(-5);
    pub const BAD_PUD: ErrorCode = ErrorCode(-6);
    pub const NOT_PERMITTED: ErrorCode = ErrorCode(-41);
    pub const SOME_PERMITTED: ErrorCode = ErrorCode(-42);

    /// The daemon's description of the error, if known.
    pub fn description(&self) -> Option<&'static str> {
        Some(match *self {
            ErrorCode::INIT_FAILED => "gpioInitialise failed",
            ErrorCode::BAD_USER_GPIO => "GPIO not 0-31",
            ErrorCode::BAD_GPIO => "GPIO not 0-53",
            ErrorCode::BAD_MODE => "mode not 0-7",
            ErrorCode::BAD_LEVEL => "level not 0-1",
            ErrorCode::BAD_PUD => "pud not 0-2",
            ErrorCode::NOT_PERMITTED => "GPIO operation not permitted",
            ErrorCode::SOME_PERMITTED => "one or more GPIO not permitted",
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(d) => write!(f, "{} ({})", d, self.0),
            None => write!(f, "unknown error ({})", self.0),
        }
    }
}

/// The result returned by [`pigpiod_client`] functions.
///
/// [`pigpiod_client`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`pigpiod_client`] functions.
///
/// [`pigpiod_client`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to connect to the daemon.
    #[error("unable to connect to pigpiod at {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// An error returned from the underlying socket.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The daemon returned an error code for a command.
    #[error("{cmd} failed: {code}")]
    Daemon { cmd: &'static str, code: ErrorCode },

    /// The daemon response did not echo the command sent.
    ///
    /// Each is the `cmd, p1, p2` triple.
    #[error("response {got:?} does not match command {sent:?}")]
    Protocol {
        sent: (u32, u32, u32),
        got: (u32, u32, u32),
    },

    /// The daemon returned a mode code we are unaware of.
    #[error("daemon returned invalid mode {0}")]
    InvalidMode(u32),
}
