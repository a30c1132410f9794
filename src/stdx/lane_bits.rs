//! Iterator over the set lanes of a packed lane mask.
//!
//! Lane masks put lane 0 in bit 0, so ascending bit order is ascending
//! haystack order within a chunk. Iteration clears the lowest set bit each
//! step (`x & (x - 1)`), which is the trailing-zero extraction the
//! vectorized engines rely on for match ordering.

/// Set-lane iterator over a `u32` lane mask, lowest lane first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneBits(u32);

impl LaneBits {
    #[inline(always)]
    pub const fn new(mask: u32) -> Self {
        Self(mask)
    }

    /// Mask with the low `lanes` bits set. `lanes` may be 32.
    #[inline(always)]
    pub const fn low(lanes: usize) -> u32 {
        if lanes >= 32 {
            u32::MAX
        } else {
            (1u32 << lanes) - 1
        }
    }
}

impl Iterator for LaneBits {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let lane = self.0.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.0 &= self.0.wrapping_sub(1);
        Some(lane)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for LaneBits {}
