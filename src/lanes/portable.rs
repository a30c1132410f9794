//! Portable array-backed lane kernels.
//!
//! Same lane counts as the 128-bit native kernels so chunking (and therefore
//! tail handling) behaves identically on every target.

use super::{LaneKernel, MAX_LANES};

/// 16 byte lanes in a plain array.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableU8;

/// 8 UTF-16 unit lanes in a plain array.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableU16;

macro_rules! portable_kernel {
    ($kernel:ty, $unit:ty, $lanes:expr, $name:expr) => {
        impl LaneKernel for $kernel {
            type Unit = $unit;
            type Vector = [$unit; $lanes];

            const LANES: usize = $lanes;
            const NAME: &'static str = $name;

            #[inline(always)]
            fn splat(unit: $unit) -> Self::Vector {
                [unit; $lanes]
            }

            #[inline(always)]
            fn zero() -> Self::Vector {
                [0; $lanes]
            }

            #[inline(always)]
            unsafe fn load(units: &[$unit]) -> Self::Vector {
                debug_assert!(units.len() >= $lanes);
                let mut v = [0; $lanes];
                v.copy_from_slice(&units[..$lanes]);
                v
            }

            #[inline(always)]
            fn eq(a: Self::Vector, b: Self::Vector) -> Self::Vector {
                let mut out = [0; $lanes];
                for i in 0..$lanes {
                    out[i] = if a[i] == b[i] { <$unit>::MAX } else { 0 };
                }
                out
            }

            #[inline(always)]
            fn or(a: Self::Vector, b: Self::Vector) -> Self::Vector {
                let mut out = a;
                for i in 0..$lanes {
                    out[i] |= b[i];
                }
                out
            }

            #[inline(always)]
            fn and(a: Self::Vector, b: Self::Vector) -> Self::Vector {
                let mut out = a;
                for i in 0..$lanes {
                    out[i] &= b[i];
                }
                out
            }

            #[inline(always)]
            fn lane_mask(v: Self::Vector) -> u32 {
                let mut bits = 0u32;
                for (i, lane) in v.iter().enumerate() {
                    if *lane != 0 {
                        bits |= 1u32 << i;
                    }
                }
                bits
            }

            #[inline(always)]
            fn store(v: Self::Vector, out: &mut [$unit; MAX_LANES]) {
                out[..$lanes].copy_from_slice(&v);
            }
        }
    };
}

portable_kernel!(PortableU8, u8, 16, "portable-u8x16");
portable_kernel!(PortableU16, u16, 8, "portable-u16x8");
