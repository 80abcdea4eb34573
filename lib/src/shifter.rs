// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::bits::{self, BitIndex, PATTERN};
use crate::timing::Timing;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use std::convert::Infallible;

/// Shifts [`PATTERN`] out over a clock and data line, one bit per clock
/// pulse, least significant bit first.
///
/// For each bit the data line is set, then the clock is driven high for a
/// half period and low for a half period.
///
/// If a latch line is provided it is pulsed after the last bit of each
/// frame, so a 74HC595 style storage register presents the complete byte.
///
/// ```no_run
/// # fn example() -> Result<(), segbang::Error> {
/// use segbang::{DaemonPin, ShiftOut, StdDelay};
/// use std::sync::Arc;
///
/// let pi = Arc::new(pigpiod_client::Pi::from_env()?);
/// let clock = DaemonPin::new(pi.clone(), 9)?;
/// let data = DaemonPin::new(pi, 10)?;
/// let mut shifter = ShiftOut::new(clock, data, StdDelay);
/// shifter.run()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ShiftOut<P, D> {
    clock: P,
    data: P,
    latch: Option<P>,
    delay: D,
    timing: Timing,
    index: BitIndex,
}

impl<P, D> ShiftOut<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(clock: P, data: P, delay: D) -> Self {
        ShiftOut {
            clock,
            data,
            latch: None,
            delay,
            timing: Timing::default(),
            index: BitIndex::default(),
        }
    }

    /// Set the time the clock is held at each level.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Pulse the `latch` line after each frame.
    pub fn with_latch(mut self, latch: P) -> Self {
        self.latch = Some(latch);
        self
    }

    /// Start counting from `index` rather than 0.
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = BitIndex::new(index);
        self
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// The index of the next bit to be shifted out.
    pub fn index(&self) -> u32 {
        self.index.get()
    }

    /// Shift out the next bit, returning the value written to the data line.
    pub fn step(&mut self) -> Result<bool, P::Error> {
        let bit = bits::bit(PATTERN, self.index.get());
        self.data.set_state(PinState::from(bit))?;
        self.clock.set_high()?;
        self.timing.wait(&mut self.delay);
        self.clock.set_low()?;
        self.timing.wait(&mut self.delay);
        self.index.advance();
        if self.index.is_frame_start() {
            if let Some(latch) = self.latch.as_mut() {
                latch.set_high()?;
                self.timing.wait(&mut self.delay);
                latch.set_low()?;
                self.timing.wait(&mut self.delay);
            }
        }
        Ok(bit)
    }

    /// Shift out bits up to the end of the current frame.
    ///
    /// Shifts a full 8 bits if the index is at the start of a frame.
    pub fn shift_frame(&mut self) -> Result<(), P::Error> {
        loop {
            self.step()?;
            if self.index.is_frame_start() {
                return Ok(());
            }
        }
    }

    /// Shift out `count` frames.
    pub fn run_frames(&mut self, count: u64) -> Result<(), P::Error> {
        for _ in 0..count {
            self.shift_frame()?;
        }
        Ok(())
    }

    /// Shift out frames forever.
    ///
    /// Only returns if driving a line fails.
    pub fn run(&mut self) -> Result<Infallible, P::Error> {
        tracing::debug!(
            "shifting {:#010b} with half period {:?}",
            PATTERN,
            self.timing.half_period
        );
        loop {
            self.shift_frame()?;
        }
    }

    /// Return the clock, data and latch lines and the delay.
    pub fn release(self) -> (P, P, Option<P>, D) {
        (self.clock, self.data, self.latch, self.delay)
    }
}
