//! NEON lane kernels (aarch64).
//!
//! NEON has no movemask; lane masks are built by ANDing the compare result
//! with per-lane bit weights and summing horizontally.

use core::arch::aarch64::*;

use super::{LaneKernel, MAX_LANES};

/// 16 byte lanes in a `uint8x16_t`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeonU8;

/// 8 UTF-16 unit lanes in a `uint16x8_t`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeonU16;

const U8_WEIGHTS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];
const U16_WEIGHTS: [u16; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

impl LaneKernel for NeonU8 {
    type Unit = u8;
    type Vector = uint8x16_t;

    const LANES: usize = 16;
    const NAME: &'static str = "neon-u8x16";

    #[inline(always)]
    fn splat(unit: u8) -> uint8x16_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vdupq_n_u8(unit) }
    }

    #[inline(always)]
    fn zero() -> uint8x16_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vdupq_n_u8(0) }
    }

    #[inline(always)]
    unsafe fn load(units: &[u8]) -> uint8x16_t {
        debug_assert!(units.len() >= Self::LANES);
        // SAFETY: caller guarantees 16 readable bytes.
        unsafe { vld1q_u8(units.as_ptr()) }
    }

    #[inline(always)]
    fn eq(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vceqq_u8(a, b) }
    }

    #[inline(always)]
    fn or(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vorrq_u8(a, b) }
    }

    #[inline(always)]
    fn and(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vandq_u8(a, b) }
    }

    #[inline(always)]
    fn lane_mask(v: uint8x16_t) -> u32 {
        // SAFETY: NEON intrinsics are available on all aarch64 targets;
        // `U8_WEIGHTS` holds 16 bytes.
        unsafe {
            let weights = vld1q_u8(U8_WEIGHTS.as_ptr());
            let bits = vandq_u8(v, weights);
            let lo = vaddv_u8(vget_low_u8(bits)) as u32;
            let hi = vaddv_u8(vget_high_u8(bits)) as u32;
            lo | (hi << 8)
        }
    }

    #[inline(always)]
    fn store(v: uint8x16_t, out: &mut [u8; MAX_LANES]) {
        // SAFETY: `out` holds MAX_LANES >= 16 bytes.
        unsafe { vst1q_u8(out.as_mut_ptr(), v) }
    }
}

impl LaneKernel for NeonU16 {
    type Unit = u16;
    type Vector = uint16x8_t;

    const LANES: usize = 8;
    const NAME: &'static str = "neon-u16x8";

    #[inline(always)]
    fn splat(unit: u16) -> uint16x8_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vdupq_n_u16(unit) }
    }

    #[inline(always)]
    fn zero() -> uint16x8_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vdupq_n_u16(0) }
    }

    #[inline(always)]
    unsafe fn load(units: &[u16]) -> uint16x8_t {
        debug_assert!(units.len() >= Self::LANES);
        // SAFETY: caller guarantees 8 readable units.
        unsafe { vld1q_u16(units.as_ptr()) }
    }

    #[inline(always)]
    fn eq(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vceqq_u16(a, b) }
    }

    #[inline(always)]
    fn or(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vorrq_u16(a, b) }
    }

    #[inline(always)]
    fn and(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
        // SAFETY: NEON intrinsics are available on all aarch64 targets.
        unsafe { vandq_u16(a, b) }
    }

    #[inline(always)]
    fn lane_mask(v: uint16x8_t) -> u32 {
        // SAFETY: NEON intrinsics are available on all aarch64 targets;
        // `U16_WEIGHTS` holds 8 units.
        unsafe {
            let weights = vld1q_u16(U16_WEIGHTS.as_ptr());
            vaddvq_u16(vandq_u16(v, weights)) as u32
        }
    }

    #[inline(always)]
    fn store(v: uint16x8_t, out: &mut [u16; MAX_LANES]) {
        // SAFETY: `out` holds MAX_LANES >= 8 units.
        unsafe { vst1q_u16(out.as_mut_ptr(), v) }
    }
}
