//! Chunked engine resolving needles one at a time.
//!
//! Each chunk is compared against every distinct needle in slot order. A
//! needle only claims lanes no earlier needle claimed, and the claimed slot
//! is written to a per-lane scratch array. The tail is copied into a padded
//! chunk and lanes past the window are masked off.

use super::{EngineKind, ScanEngine};
use crate::api::{CodeUnit, Match, NEEDLES_MAX};
use crate::lanes::{LaneKernel, MAX_LANES};
use crate::needles::{NeedleSet, UniqueNeedle};
use crate::stdx::{FixedVec, LaneBits};

/// One-needle-at-a-time lane engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaneBasicEngine;

impl<T: CodeUnit> ScanEngine<T> for LaneBasicEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::LaneBasic
    }

    fn scan_all(&self, window: &[T], base: usize, needles: &NeedleSet<T>, out: &mut Vec<Match>) {
        scan_all_basic::<T::Kernel>(window, base, needles, out);
    }

    fn scan_first(&self, window: &[T], needles: &NeedleSet<T>) -> Option<usize> {
        scan_first_basic::<T::Kernel>(window, needles)
    }
}

fn broadcast<K: LaneKernel>(unique: &[UniqueNeedle<K::Unit>]) -> FixedVec<K::Vector, NEEDLES_MAX> {
    let mut splats = FixedVec::new();
    for needle in unique {
        splats.push(K::splat(needle.unit));
    }
    splats
}

/// Claims lanes of `v` for needles in slot order and returns the claimed
/// lane mask. Lanes outside `valid` are never claimed.
#[inline(always)]
fn resolve_chunk<K: LaneKernel>(
    v: K::Vector,
    splats: &[K::Vector],
    unique: &[UniqueNeedle<K::Unit>],
    valid: u32,
    lane_slot: &mut [u32; MAX_LANES],
) -> u32 {
    let mut matched = 0u32;
    for (&splat, needle) in splats.iter().zip(unique) {
        let fresh = K::lane_mask(K::eq(v, splat)) & valid & !matched;
        for lane in LaneBits::new(fresh) {
            lane_slot[lane] = needle.slot;
        }
        matched |= fresh;
    }
    matched
}

#[inline(always)]
fn any_mask<K: LaneKernel>(v: K::Vector, splats: &[K::Vector], valid: u32) -> u32 {
    let mut mask = 0u32;
    for &splat in splats {
        mask |= K::lane_mask(K::eq(v, splat));
    }
    mask & valid
}

pub(crate) fn scan_all_basic<K>(
    window: &[K::Unit],
    base: usize,
    needles: &NeedleSet<K::Unit>,
    out: &mut Vec<Match>,
) where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    let unique = needles.unique();
    if unique.is_empty() || window.is_empty() {
        return;
    }
    let splats = broadcast::<K>(unique);
    let mut lane_slot = [0u32; MAX_LANES];
    let full = LaneBits::low(K::LANES);

    let mut offset = 0usize;
    while offset + K::LANES <= window.len() {
        // SAFETY: `offset + LANES <= window.len()`.
        let v = unsafe { K::load(&window[offset..]) };
        let matched = resolve_chunk::<K>(v, &splats, unique, full, &mut lane_slot);
        for lane in LaneBits::new(matched) {
            out.push(Match::new(base + offset + lane, lane_slot[lane]));
        }
        offset += K::LANES;
    }

    let rest = &window[offset..];
    if !rest.is_empty() {
        let v = K::load_partial(rest, K::Unit::default());
        let valid = LaneBits::low(rest.len());
        let matched = resolve_chunk::<K>(v, &splats, unique, valid, &mut lane_slot);
        for lane in LaneBits::new(matched) {
            out.push(Match::new(base + offset + lane, lane_slot[lane]));
        }
    }
}

pub(crate) fn scan_first_basic<K>(window: &[K::Unit], needles: &NeedleSet<K::Unit>) -> Option<usize>
where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    let unique = needles.unique();
    if unique.is_empty() || window.is_empty() {
        return None;
    }
    let splats = broadcast::<K>(unique);
    let full = LaneBits::low(K::LANES);

    let mut offset = 0usize;
    while offset + K::LANES <= window.len() {
        // SAFETY: `offset + LANES <= window.len()`.
        let v = unsafe { K::load(&window[offset..]) };
        let mask = any_mask::<K>(v, &splats, full);
        if mask != 0 {
            return Some(offset + mask.trailing_zeros() as usize);
        }
        offset += K::LANES;
    }

    let rest = &window[offset..];
    if rest.is_empty() {
        return None;
    }
    let v = K::load_partial(rest, K::Unit::default());
    let mask = any_mask::<K>(v, &splats, LaneBits::low(rest.len()));
    (mask != 0).then(|| offset + mask.trailing_zeros() as usize)
}
