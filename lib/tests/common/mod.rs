// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    Clock,
    Data,
    Latch,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Set(Line, bool),
    Delay(u32),
}

/// A shared log of the pin and delay operations performed by a driver.
#[derive(Clone, Debug, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn pin(&self, line: Line) -> RecordingPin {
        RecordingPin {
            line,
            log: self.clone(),
            fail_after: None,
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay(self.clone())
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// The levels set on a line, in order.
    pub fn levels(&self, line: Line) -> Vec<bool> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Set(l, v) if *l == line => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Delay(ns) => Some(*ns),
                _ => None,
            })
            .collect()
    }

    fn push(&self, e: Event) {
        self.0.borrow_mut().push(e)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PinError;

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug)]
pub struct RecordingPin {
    line: Line,
    log: Log,
    // number of sets to allow before failing
    fail_after: Option<usize>,
}

impl RecordingPin {
    pub fn failing_after(mut self, sets: usize) -> Self {
        self.fail_after = Some(sets);
        self
    }

    fn set(&mut self, value: bool) -> Result<(), PinError> {
        match self.fail_after.as_mut() {
            Some(0) => return Err(PinError),
            Some(n) => *n -= 1,
            None => (),
        }
        self.log.push(Event::Set(self.line, value));
        Ok(())
    }
}

impl ErrorType for RecordingPin {
    type Error = PinError;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

#[derive(Debug)]
pub struct RecordingDelay(Log);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(Event::Delay(ns));
    }
}
