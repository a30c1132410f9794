//! Replayable reproduction case for equivalence failures.
//!
//! Units are widened to `u32` so one schema covers both code unit widths;
//! `unit_bits` records which width the case was captured with.

use serde::{Deserialize, Serialize};

use crate::api::CodeUnit;

/// Current [`ReproCase`] schema version.
pub const REPRO_SCHEMA_VERSION: u32 = 1;

/// A single failing scan request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproCase {
    pub schema_version: u32,
    /// Code unit width in bits (8 or 16).
    pub unit_bits: u32,
    pub haystack: Vec<u32>,
    /// Needle units in slot order.
    pub needles: Vec<u32>,
    pub start: usize,
    pub count: usize,
}

impl ReproCase {
    pub fn new<T: CodeUnit>(haystack: &[T], needles: &[T], start: usize, count: usize) -> Self {
        Self {
            schema_version: REPRO_SCHEMA_VERSION,
            unit_bits: T::BITS,
            haystack: haystack.iter().map(|u| u.to_u32()).collect(),
            needles: needles.iter().map(|u| u.to_u32()).collect(),
            start,
            count,
        }
    }

    /// Haystack as `T` units, or `None` if the case was captured with
    /// another width or holds a unit that does not fit.
    pub fn haystack_units<T: CodeUnit>(&self) -> Option<Vec<T>> {
        self.decode(&self.haystack)
    }

    /// Needles as `T` units; see [`haystack_units`](Self::haystack_units).
    pub fn needle_units<T: CodeUnit>(&self) -> Option<Vec<T>> {
        self.decode(&self.needles)
    }

    fn decode<T: CodeUnit>(&self, units: &[u32]) -> Option<Vec<T>> {
        if self.unit_bits != T::BITS {
            return None;
        }
        units.iter().map(|&u| T::from_u32(u)).collect()
    }

    /// Whether `start`/`count` address a window inside the haystack.
    pub fn is_in_range(&self) -> bool {
        self.start <= self.haystack.len() && self.count <= self.haystack.len() - self.start
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
