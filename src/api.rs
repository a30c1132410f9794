use crate::lanes::{LaneKernel, NativeU16, NativeU8};
use std::fmt;
use std::hash::Hash;

// --------------------------
// Public API types
// --------------------------

/// Hard cap on needle slots in a [`NeedleSet`](crate::NeedleSet).
///
/// Sized so a full set of broadcast needles fits the register file of the
/// widest kernel we ship. Raising it only costs stack space in the engines;
/// needle indices are reported as `u32`.
pub const NEEDLES_MAX: usize = 32;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// Fixed-width code unit a haystack is made of.
///
/// Implemented for `u8` (bytes, UTF-8 code units) and `u16` (UTF-16 code
/// units). Each unit names the lane kernel used by the vectorized engines on
/// the current target.
pub trait CodeUnit:
    Copy + Eq + Ord + Hash + Default + fmt::Debug + Send + Sync + 'static + sealed::Sealed
{
    /// Lane kernel for this unit on the compile target.
    type Kernel: LaneKernel<Unit = Self>;

    /// Width of the unit in bits.
    const BITS: u32;

    /// Widens the unit for reporting and serialization.
    fn to_u32(self) -> u32;

    /// Narrows `value`, returning `None` if it does not fit the unit.
    fn from_u32(value: u32) -> Option<Self>;

    /// Encodes a needle slot index as a unit so it can ride in a lane.
    ///
    /// Slot indices are always `< NEEDLES_MAX`, which fits either width.
    fn from_slot(slot: usize) -> Self;

    /// Reads a slot index back out of a lane.
    fn to_slot(self) -> usize;
}

impl CodeUnit for u8 {
    type Kernel = NativeU8;
    const BITS: u32 = 8;

    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(value: u32) -> Option<Self> {
        u8::try_from(value).ok()
    }

    #[inline(always)]
    fn from_slot(slot: usize) -> Self {
        debug_assert!(slot < NEEDLES_MAX);
        slot as u8
    }

    #[inline(always)]
    fn to_slot(self) -> usize {
        self as usize
    }
}

impl CodeUnit for u16 {
    type Kernel = NativeU16;
    const BITS: u32 = 16;

    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(value: u32) -> Option<Self> {
        u16::try_from(value).ok()
    }

    #[inline(always)]
    fn from_slot(slot: usize) -> Self {
        debug_assert!(slot < NEEDLES_MAX);
        slot as u16
    }

    #[inline(always)]
    fn to_slot(self) -> usize {
        self as usize
    }
}

/// One needle hit: where it is and which needle slot matched.
///
/// `needle` is the first slot in the [`NeedleSet`](crate::NeedleSet) holding
/// the matched unit, so duplicates in the caller's needle list resolve to the
/// lowest index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(C)]
pub struct Match {
    /// Absolute offset into the haystack (not relative to `start`).
    pub position: usize,
    /// Needle slot index.
    pub needle: u32,
}

impl Match {
    #[inline(always)]
    pub const fn new(position: usize, needle: u32) -> Self {
        Self { position, needle }
    }
}

/// Result of a `locate_all` call.
///
/// The matches themselves live in the caller's output vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of matches written to the output vector.
    pub match_count: usize,
    /// `match_count != 0`.
    pub any_match: bool,
}

impl ScanSummary {
    #[inline]
    pub(crate) const fn from_count(match_count: usize) -> Self {
        Self {
            match_count,
            any_match: match_count != 0,
        }
    }
}
