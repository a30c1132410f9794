//! Reference engine: one unit at a time, needle slots in order.

use super::{EngineKind, ScanEngine};
use crate::api::{CodeUnit, Match};
use crate::needles::NeedleSet;

/// Per-unit loop over the needle slots. O(window × needles).
///
/// Walks the raw slots and stops at the first equal one, so a unit listed
/// twice reports its lowest slot without consulting the deduplicated view.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarEngine;

impl<T: CodeUnit> ScanEngine<T> for ScalarEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Scalar
    }

    fn scan_all(&self, window: &[T], base: usize, needles: &NeedleSet<T>, out: &mut Vec<Match>) {
        let slots = needles.as_slice();
        for (offset, &unit) in window.iter().enumerate() {
            if let Some(slot) = slots.iter().position(|&needle| needle == unit) {
                out.push(Match::new(base + offset, slot as u32));
            }
        }
    }

    fn scan_first(&self, window: &[T], needles: &NeedleSet<T>) -> Option<usize> {
        let slots = needles.as_slice();
        window.iter().position(|unit| slots.contains(unit))
    }
}
