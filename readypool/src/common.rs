// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Common internal types and utilities for readypool.

use std::fmt;

/// Index of a slot in the pool.
pub type SlotId = u8;

#[inline]
#[cold]
fn cold() {}

#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Fixed-width bit set holding one bit per slot.
///
/// The width bounds the pool capacity: a pool over `u8` holds at most 8 slots,
/// over `u64` at most 64.
pub trait Bitmask: Copy + Eq + fmt::Debug + fmt::Binary + Send + Sync + 'static {
    const BITS: u32;
    const EMPTY: Self;

    /// Mask with the lowest `n` bits set. `n` must not exceed `BITS`.
    fn low_bits(n: usize) -> Self;

    fn contains(self, idx: SlotId) -> bool;

    fn with(self, idx: SlotId) -> Self;

    fn without(self, idx: SlotId) -> Self;

    fn intersects(self, other: Self) -> bool;

    /// Index of the lowest set bit.
    fn lowest(self) -> Option<SlotId>;

    fn count(self) -> usize;

    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

macro_rules! impl_bitmask {
    ($($ty:ty),*) => {
        $(
            impl Bitmask for $ty {
                const BITS: u32 = <$ty>::BITS;
                const EMPTY: Self = 0;

                #[inline(always)]
                fn low_bits(n: usize) -> Self {
                    if n >= Self::BITS as usize {
                        <$ty>::MAX
                    } else {
                        (1 << n) - 1
                    }
                }

                #[inline(always)]
                fn contains(self, idx: SlotId) -> bool {
                    self & (1 << idx) != 0
                }

                #[inline(always)]
                fn with(self, idx: SlotId) -> Self {
                    self | (1 << idx)
                }

                #[inline(always)]
                fn without(self, idx: SlotId) -> Self {
                    self & !(1 << idx)
                }

                #[inline(always)]
                fn intersects(self, other: Self) -> bool {
                    self & other != 0
                }

                #[inline(always)]
                fn lowest(self) -> Option<SlotId> {
                    if self == 0 {
                        None
                    } else {
                        Some(self.trailing_zeros() as SlotId)
                    }
                }

                #[inline(always)]
                fn count(self) -> usize {
                    self.count_ones() as usize
                }
            }
        )*
    };
}

impl_bitmask!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, 0b0000_0000)]
    #[case(1, 0b0000_0001)]
    #[case(3, 0b0000_0111)]
    #[case(8, 0b1111_1111)]
    fn test_low_bits_u8(#[case] n: usize, #[case] expected: u8) {
        assert_eq!(u8::low_bits(n), expected);
    }

    #[test]
    fn test_low_bits_full_width() {
        assert_eq!(u64::low_bits(64), u64::MAX);
        assert_eq!(u32::low_bits(32), u32::MAX);
        assert_eq!(u16::low_bits(9), 0x1ff);
    }

    #[test]
    fn test_set_clear_and_lowest() {
        let mask = u8::EMPTY.with(5).with(2);
        assert!(mask.contains(2));
        assert!(mask.contains(5));
        assert!(!mask.contains(0));
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.lowest(), Some(2));

        let mask = mask.without(2);
        assert_eq!(mask.lowest(), Some(5));
        assert!(mask.without(5).is_empty());
        assert_eq!(u8::EMPTY.lowest(), None);
    }

    #[test]
    fn test_high_bit_of_wide_mask() {
        let mask = u64::EMPTY.with(63);
        assert!(mask.contains(63));
        assert_eq!(mask.lowest(), Some(63));
        assert!(mask.intersects(u64::low_bits(64)));
        assert!(!mask.intersects(u64::low_bits(63)));
    }
}
