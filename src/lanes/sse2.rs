//! SSE2 lane kernels (x86_64).
//!
//! SSE2 is part of the x86_64 baseline, so these kernels need no runtime
//! feature detection.

use core::arch::x86_64::*;

use super::{LaneKernel, MAX_LANES};

/// 16 byte lanes in an `__m128i`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sse2U8;

/// 8 UTF-16 unit lanes in an `__m128i`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sse2U16;

impl LaneKernel for Sse2U8 {
    type Unit = u8;
    type Vector = __m128i;

    const LANES: usize = 16;
    const NAME: &'static str = "sse2-u8x16";

    #[inline(always)]
    fn splat(unit: u8) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_set1_epi8(unit as i8) }
    }

    #[inline(always)]
    fn zero() -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_setzero_si128() }
    }

    #[inline(always)]
    unsafe fn load(units: &[u8]) -> __m128i {
        debug_assert!(units.len() >= Self::LANES);
        // SAFETY: caller guarantees 16 readable bytes; unaligned load.
        unsafe { _mm_loadu_si128(units.as_ptr() as *const __m128i) }
    }

    #[inline(always)]
    fn eq(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_cmpeq_epi8(a, b) }
    }

    #[inline(always)]
    fn or(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn and(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn lane_mask(v: __m128i) -> u32 {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_movemask_epi8(v) as u32 & 0xFFFF }
    }

    #[inline(always)]
    fn store(v: __m128i, out: &mut [u8; MAX_LANES]) {
        // SAFETY: `out` holds MAX_LANES >= 16 bytes; unaligned store.
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) }
    }
}

impl LaneKernel for Sse2U16 {
    type Unit = u16;
    type Vector = __m128i;

    const LANES: usize = 8;
    const NAME: &'static str = "sse2-u16x8";

    #[inline(always)]
    fn splat(unit: u16) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_set1_epi16(unit as i16) }
    }

    #[inline(always)]
    fn zero() -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_setzero_si128() }
    }

    #[inline(always)]
    unsafe fn load(units: &[u16]) -> __m128i {
        debug_assert!(units.len() >= Self::LANES);
        // SAFETY: caller guarantees 8 readable units; unaligned load.
        unsafe { _mm_loadu_si128(units.as_ptr() as *const __m128i) }
    }

    #[inline(always)]
    fn eq(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_cmpeq_epi16(a, b) }
    }

    #[inline(always)]
    fn or(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn and(a: __m128i, b: __m128i) -> __m128i {
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn lane_mask(v: __m128i) -> u32 {
        // Compare lanes are 0x0000 or 0xFFFF; a signed pack maps them to
        // 0x00 / 0xFF bytes, giving one movemask bit per 16-bit lane.
        // SAFETY: SSE2 is baseline on x86_64.
        unsafe {
            let packed = _mm_packs_epi16(v, _mm_setzero_si128());
            _mm_movemask_epi8(packed) as u32 & 0xFF
        }
    }

    #[inline(always)]
    fn store(v: __m128i, out: &mut [u16; MAX_LANES]) {
        // SAFETY: `out` holds MAX_LANES >= 8 units; unaligned store.
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) }
    }
}
