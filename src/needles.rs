//! Bounded, ordered needle sets.
//!
//! # Invariants
//! - At most [`NEEDLES_MAX`] slots.
//! - A needle's index is its slot position and never changes.
//! - When the caller supplies the same unit twice, the unit's needle index is
//!   its *first* slot. `unique()` carries exactly one `(unit, first slot)`
//!   entry per distinct unit, in slot order, which is what the vectorized
//!   engines broadcast; the scalar engine walks the raw slots and stops at the
//!   first hit, so both report the same index.

use crate::api::{CodeUnit, NEEDLES_MAX};
use crate::error::ScanError;
use crate::stdx::FixedVec;

/// A distinct needle unit and the first slot that holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniqueNeedle<T> {
    pub unit: T,
    pub slot: u32,
}

/// Ordered set of up to [`NEEDLES_MAX`] search units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeedleSet<T: CodeUnit> {
    slots: FixedVec<T, NEEDLES_MAX>,
    unique: FixedVec<UniqueNeedle<T>, NEEDLES_MAX>,
}

impl<T: CodeUnit> NeedleSet<T> {
    /// Builds a set from needle units in priority order.
    ///
    /// # Errors
    /// [`ScanError::TooManyNeedles`] if `units.len() > NEEDLES_MAX`.
    pub fn new(units: &[T]) -> Result<Self, ScanError> {
        if units.len() > NEEDLES_MAX {
            return Err(ScanError::too_many_needles(units.len()));
        }
        let mut set = Self::empty();
        for &unit in units {
            set.push_slot(unit);
        }
        Ok(set)
    }

    /// A set with no needles. Every scan over it yields no matches.
    pub fn empty() -> Self {
        Self {
            slots: FixedVec::new(),
            unique: FixedVec::new(),
        }
    }

    fn push_slot(&mut self, unit: T) {
        let slot = self.slots.len() as u32;
        self.slots.push(unit);
        if !self.unique.iter().any(|n| n.unit == unit) {
            self.unique.push(UniqueNeedle { unit, slot });
        }
    }

    /// Number of slots, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Needle units in slot order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.slots.as_slice()
    }

    /// Unit held by `slot`.
    #[inline]
    pub fn unit(&self, slot: u32) -> Option<T> {
        self.slots.get(slot as usize).copied()
    }

    /// First slot holding `unit`.
    pub fn slot_of(&self, unit: T) -> Option<u32> {
        self.unique.iter().find(|n| n.unit == unit).map(|n| n.slot)
    }

    /// Distinct units with their first slot, in slot order.
    #[inline]
    pub fn unique(&self) -> &[UniqueNeedle<T>] {
        self.unique.as_slice()
    }
}

impl NeedleSet<u16> {
    /// Builds a set from the UTF-16 encoding of `needles`.
    ///
    /// Characters outside the BMP contribute both surrogates as separate
    /// needles.
    ///
    /// # Errors
    /// [`ScanError::TooManyNeedles`] if the encoding exceeds `NEEDLES_MAX`
    /// units.
    pub fn from_utf16(needles: &str) -> Result<Self, ScanError> {
        let count = needles.encode_utf16().count();
        if count > NEEDLES_MAX {
            return Err(ScanError::too_many_needles(count));
        }
        let mut set = Self::empty();
        for unit in needles.encode_utf16() {
            set.push_slot(unit);
        }
        Ok(set)
    }
}

impl<T: CodeUnit> Default for NeedleSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}
