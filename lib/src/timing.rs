// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use embedded_hal::delay::DelayNs;
use std::thread;
use std::time::Duration;

/// The default time the clock is held at each level.
pub const DEFAULT_HALF_PERIOD: Duration = Duration::from_micros(50);

/// The fixed timing of the clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    /// The time the clock is held high, and then low, for each bit.
    pub half_period: Duration,
}

impl Timing {
    pub fn new(half_period: Duration) -> Timing {
        Timing { half_period }
    }

    pub fn from_micros(us: u64) -> Timing {
        Timing::new(Duration::from_micros(us))
    }

    /// The nominal time to shift out one bit.
    ///
    /// The actual time is longer by the time taken to drive the lines.
    pub fn bit_period(&self) -> Duration {
        self.half_period * 2
    }

    /// Wait for one half period using `delay`.
    ///
    /// Periods too long for a single `delay_ns` are split into several.
    pub(crate) fn wait<D: DelayNs>(&self, delay: &mut D) {
        let mut ns = self.half_period.as_nanos();
        loop {
            let chunk = u32::try_from(ns).unwrap_or(u32::MAX);
            delay.delay_ns(chunk);
            ns -= u128::from(chunk);
            if ns == 0 {
                return;
            }
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::new(DEFAULT_HALF_PERIOD)
    }
}

/// A [`DelayNs`] that sleeps the current thread.
///
/// Sleeps are at least as long as requested, and on a loaded system may be
/// considerably longer.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<u32>);

    impl DelayNs for Recorder {
        fn delay_ns(&mut self, ns: u32) {
            self.0.push(ns);
        }
    }

    #[test]
    fn default() {
        let t = Timing::default();
        assert_eq!(t.half_period, Duration::from_micros(50));
        assert_eq!(t.bit_period(), Duration::from_micros(100));
    }

    #[test]
    fn wait() {
        let mut d = Recorder::default();
        Timing::from_micros(50).wait(&mut d);
        assert_eq!(d.0, vec![50_000]);
    }

    #[test]
    fn wait_long() {
        let mut d = Recorder::default();
        Timing::new(Duration::new(10, 7)).wait(&mut d);
        assert_eq!(d.0, vec![u32::MAX, u32::MAX, 1_410_065_417]);
        let total: u128 = d.0.iter().map(|ns| u128::from(*ns)).sum();
        assert_eq!(total, Duration::new(10, 7).as_nanos());
    }

    #[test]
    fn wait_zero() {
        let mut d = Recorder::default();
        Timing::new(Duration::ZERO).wait(&mut d);
        assert_eq!(d.0, vec![0]);
    }

    #[test]
    fn std_delay_sleeps() {
        let start = std::time::Instant::now();
        StdDelay.delay_us(200);
        assert!(start.elapsed() >= Duration::from_micros(200));
    }
}
