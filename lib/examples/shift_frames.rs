// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of shifting a few frames out through pigpiod.

use segbang::{DaemonPin, ShiftOut, StdDelay, Timing};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pi = Arc::new(pigpiod_client::Pi::from_env()?);
    let mut shifter = ShiftOut::new(
        DaemonPin::new(pi.clone(), 9)?,
        DaemonPin::new(pi, 10)?,
        StdDelay,
    )
    .with_timing(Timing::from_micros(50));

    shifter.run_frames(4)?;
    println!("shifted 4 frames, next bit {}", shifter.index());

    Ok(())
}
