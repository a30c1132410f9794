//! Chunked engine with the needle resolution fused into registers.
//!
//! Per chunk the engine builds two vectors:
//! - `any`: OR of every needle compare.
//! - `index`: OR of `compare AND splat(slot)`.
//!
//! Needles are distinct units, so at most one compare is set per lane and
//! `index` holds that lane's slot exactly. One `lane_mask(any)` decides if
//! the chunk has work at all; `index` is only stored when it does.
//!
//! The main loop handles two chunks per iteration and tests the OR of both
//! `any` vectors once. A short tail re-loads the last full chunk ending at
//! the window end and masks off the lanes already scanned; windows shorter
//! than one chunk fall back to a padded copy.

use super::{EngineKind, ScanEngine};
use crate::api::{CodeUnit, Match, NEEDLES_MAX};
use crate::lanes::{LaneKernel, MAX_LANES};
use crate::needles::NeedleSet;
use crate::stdx::{FixedVec, LaneBits};

/// Fused-mask lane engine. The default engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaneFusedEngine;

impl<T: CodeUnit> ScanEngine<T> for LaneFusedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::LaneFused
    }

    fn scan_all(&self, window: &[T], base: usize, needles: &NeedleSet<T>, out: &mut Vec<Match>) {
        scan_all_fused::<T::Kernel>(window, base, needles, out);
    }

    fn scan_first(&self, window: &[T], needles: &NeedleSet<T>) -> Option<usize> {
        scan_first_fused::<T::Kernel>(window, needles)
    }
}

/// Broadcast needle units and their slot indices.
struct Splats<K: LaneKernel> {
    units: FixedVec<K::Vector, NEEDLES_MAX>,
    slots: FixedVec<K::Vector, NEEDLES_MAX>,
}

impl<K> Splats<K>
where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    fn new(needles: &NeedleSet<K::Unit>) -> Self {
        let mut units = FixedVec::new();
        let mut slots = FixedVec::new();
        for needle in needles.unique() {
            units.push(K::splat(needle.unit));
            slots.push(K::splat(K::Unit::from_slot(needle.slot as usize)));
        }
        Self { units, slots }
    }

    #[inline(always)]
    fn any(&self, v: K::Vector) -> K::Vector {
        let mut any = K::zero();
        for &unit in self.units.iter() {
            any = K::or(any, K::eq(v, unit));
        }
        any
    }

    #[inline(always)]
    fn any_and_index(&self, v: K::Vector) -> (K::Vector, K::Vector) {
        let mut any = K::zero();
        let mut index = K::zero();
        for (&unit, &slot) in self.units.iter().zip(self.slots.iter()) {
            let hit = K::eq(v, unit);
            any = K::or(any, hit);
            index = K::or(index, K::and(hit, slot));
        }
        (any, index)
    }
}

/// Pushes the lanes of `mask`, reading each lane's slot from `index`.
#[inline(always)]
fn emit<K>(mask: u32, index: K::Vector, position: usize, out: &mut Vec<Match>)
where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    let mut slots = [K::Unit::default(); MAX_LANES];
    K::store(index, &mut slots);
    for lane in LaneBits::new(mask) {
        out.push(Match::new(position + lane, slots[lane].to_slot() as u32));
    }
}

pub(crate) fn scan_all_fused<K>(
    window: &[K::Unit],
    base: usize,
    needles: &NeedleSet<K::Unit>,
    out: &mut Vec<Match>,
) where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    if needles.is_empty() || window.is_empty() {
        return;
    }
    let splats = Splats::<K>::new(needles);
    let lanes = K::LANES;
    let len = window.len();

    let mut offset = 0usize;
    while offset + 2 * lanes <= len {
        // SAFETY: `offset + 2 * LANES <= len`.
        let (a, b) = unsafe { (K::load(&window[offset..]), K::load(&window[offset + lanes..])) };
        let (any_a, index_a) = splats.any_and_index(a);
        let (any_b, index_b) = splats.any_and_index(b);
        if K::lane_mask(K::or(any_a, any_b)) != 0 {
            emit::<K>(K::lane_mask(any_a), index_a, base + offset, out);
            emit::<K>(K::lane_mask(any_b), index_b, base + offset + lanes, out);
        }
        offset += 2 * lanes;
    }

    if offset + lanes <= len {
        // SAFETY: `offset + LANES <= len`.
        let v = unsafe { K::load(&window[offset..]) };
        let (any, index) = splats.any_and_index(v);
        let mask = K::lane_mask(any);
        if mask != 0 {
            emit::<K>(mask, index, base + offset, out);
        }
        offset += lanes;
    }

    if offset == len {
        return;
    }
    if len >= lanes {
        let tail = len - lanes;
        // SAFETY: `tail + LANES == len`.
        let v = unsafe { K::load(&window[tail..]) };
        let (any, index) = splats.any_and_index(v);
        let fresh = LaneBits::low(lanes) & !LaneBits::low(offset - tail);
        let mask = K::lane_mask(any) & fresh;
        if mask != 0 {
            emit::<K>(mask, index, base + tail, out);
        }
    } else {
        let v = K::load_partial(window, K::Unit::default());
        let (any, index) = splats.any_and_index(v);
        let mask = K::lane_mask(any) & LaneBits::low(len);
        if mask != 0 {
            emit::<K>(mask, index, base, out);
        }
    }
}

pub(crate) fn scan_first_fused<K>(window: &[K::Unit], needles: &NeedleSet<K::Unit>) -> Option<usize>
where
    K: LaneKernel,
    K::Unit: CodeUnit,
{
    if needles.is_empty() || window.is_empty() {
        return None;
    }
    let splats = Splats::<K>::new(needles);
    let lanes = K::LANES;
    let len = window.len();

    let mut offset = 0usize;
    while offset + 2 * lanes <= len {
        // SAFETY: `offset + 2 * LANES <= len`.
        let (a, b) = unsafe { (K::load(&window[offset..]), K::load(&window[offset + lanes..])) };
        let any_a = splats.any(a);
        let any_b = splats.any(b);
        if K::lane_mask(K::or(any_a, any_b)) != 0 {
            let mask_a = K::lane_mask(any_a);
            if mask_a != 0 {
                return Some(offset + mask_a.trailing_zeros() as usize);
            }
            return Some(offset + lanes + K::lane_mask(any_b).trailing_zeros() as usize);
        }
        offset += 2 * lanes;
    }

    if offset + lanes <= len {
        // SAFETY: `offset + LANES <= len`.
        let v = unsafe { K::load(&window[offset..]) };
        let mask = K::lane_mask(splats.any(v));
        if mask != 0 {
            return Some(offset + mask.trailing_zeros() as usize);
        }
        offset += lanes;
    }

    if offset == len {
        return None;
    }
    let (position, mask) = if len >= lanes {
        let tail = len - lanes;
        // SAFETY: `tail + LANES == len`.
        let v = unsafe { K::load(&window[tail..]) };
        let fresh = LaneBits::low(lanes) & !LaneBits::low(offset - tail);
        (tail, K::lane_mask(splats.any(v)) & fresh)
    } else {
        let v = K::load_partial(window, K::Unit::default());
        (0, K::lane_mask(splats.any(v)) & LaneBits::low(len))
    };
    (mask != 0).then(|| position + mask.trailing_zeros() as usize)
}
