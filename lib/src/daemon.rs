// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
use embedded_hal::digital::PinState;
use pigpiod_client::{Gpio, Level, Mode, Pi, Pull};
use std::sync::Arc;

/// Provides [`embedded_hal::digital`] traits for a GPIO driven through the
/// pigpio daemon.
///
/// Pins on the same daemon share the connection.
///
/// The daemon does not grant exclusive access, so other clients may alter
/// the line while the pin is held.  Every level set is therefore written to
/// the daemon, even if it matches the level last written.
#[derive(Debug)]
pub struct DaemonPin {
    pi: Arc<Pi>,
    gpio: Gpio,
    // last level written, if known
    level: Option<Level>,
}

impl DaemonPin {
    /// Configure `gpio` as an output with the pull disabled.
    ///
    /// The level of the line is left unchanged.
    pub fn new(pi: Arc<Pi>, gpio: Gpio) -> Result<Self, Error> {
        pi.set_mode(gpio, Mode::Output)?;
        pi.set_pull(gpio, Pull::Off)?;
        tracing::debug!("GPIO{} configured as output", gpio);
        Ok(DaemonPin {
            pi,
            gpio,
            level: None,
        })
    }

    /// Configure `gpio` as an output with the pull disabled, and set its
    /// initial level.
    pub fn with_state(pi: Arc<Pi>, gpio: Gpio, state: PinState) -> Result<Self, Error> {
        use embedded_hal::digital::OutputPin;

        let mut pin = DaemonPin::new(pi, gpio)?;
        pin.set_state(state)?;
        Ok(pin)
    }

    /// The GPIO number of the pin.
    pub fn gpio(&self) -> Gpio {
        self.gpio
    }

    fn write(&mut self, level: Level) -> Result<(), Error> {
        self.pi.write(self.gpio, level)?;
        self.level = Some(level);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for DaemonPin {
    /// Errors returned by [`DaemonPin`].
    type Error = Error;
}

impl embedded_hal::digital::InputPin for DaemonPin {
    // Reads the physical level, which may differ from the level last written
    // if another client has driven the line.

    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pi.read(self.gpio)? == Level::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pi.read(self.gpio)? == Level::Low)
    }
}

impl embedded_hal::digital::OutputPin for DaemonPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(Level::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(Level::High)
    }
}

impl embedded_hal::digital::StatefulOutputPin for DaemonPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == Some(Level::High))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == Some(Level::Low))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.write(self.level.unwrap_or_default().not())
    }
}
