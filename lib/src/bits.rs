// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The byte shifted out to the display.
///
/// `0b0011_0101`
pub const PATTERN: u8 = 53;

/// The number of bits in a frame.
pub const FRAME_BITS: u32 = 8;

/// The bit of `value` selected by `index`, taken modulo the frame size.
///
/// Bit 0 is the least significant, so frames are shifted out LSB first.
#[inline]
pub fn bit(value: u8, index: u32) -> bool {
    value & (1u8 << (index % FRAME_BITS)) != 0
}

/// The bits of a frame of `value`, in the order they are shifted out.
pub fn frame(value: u8) -> impl Iterator<Item = bool> {
    (0..FRAME_BITS).map(move |i| bit(value, i))
}

/// An unbounded bit counter.
///
/// The counter wraps after `u32::MAX`.  2^32 is a multiple of the frame size
/// so the sequence of selected bits is unbroken by the wrap.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BitIndex(u32);

impl BitIndex {
    pub fn new(start: u32) -> BitIndex {
        BitIndex(start)
    }

    /// The current index.
    #[inline]
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Return the current index and move on to the next.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        let i = self.0;
        self.0 = self.0.wrapping_add(1);
        i
    }

    /// Is the index at the first bit of a frame?
    #[inline]
    pub fn is_frame_start(&self) -> bool {
        self.0 % FRAME_BITS == 0
    }
}
