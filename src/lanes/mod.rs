//! Lane kernels: the register-level primitives the vectorized engines use.
//!
//! A kernel models one vector register of `LANES` code units. Engines only
//! need broadcast, load, lane-wise equality, bitwise OR/AND, a packed lane
//! mask, and a store back to a scratch array; everything else (chunking,
//! tail masking, needle bookkeeping) lives in the engines so every backend
//! shares it.
//!
//! # Backends
//! - x86_64: SSE2 (baseline on the architecture, no runtime detection).
//! - aarch64: NEON (baseline on the architecture).
//! - anything else: portable array lanes.
//!
//! The portable kernels are always compiled so tests can use them as a
//! differential oracle for the native ones.
//!
//! # Lane masks
//! `lane_mask` returns one bit per lane with lane 0 in bit 0. It is only
//! defined for vectors produced by `eq` (or OR/AND combinations of them),
//! where every lane is all-zeros or all-ones.

pub mod portable;

#[cfg(target_arch = "aarch64")]
pub mod neon;
#[cfg(target_arch = "x86_64")]
pub mod sse2;

/// Upper bound on `LaneKernel::LANES` for every kernel.
///
/// Keeps lane masks in a `u32` and lets scratch arrays be sized statically.
pub const MAX_LANES: usize = 32;

/// Register-level primitives over `LANES` units of `Unit`.
pub trait LaneKernel: Copy + Send + Sync + 'static {
    /// Code unit held in each lane.
    type Unit: Copy;
    /// Register type.
    type Vector: Copy;

    /// Units per register. Never exceeds [`MAX_LANES`].
    const LANES: usize;
    /// Short backend name for reports.
    const NAME: &'static str;

    /// Broadcasts `unit` into every lane.
    fn splat(unit: Self::Unit) -> Self::Vector;

    /// All lanes zero.
    fn zero() -> Self::Vector;

    /// Loads the first `LANES` units of `units`.
    ///
    /// # Safety
    /// `units.len() >= Self::LANES`.
    unsafe fn load(units: &[Self::Unit]) -> Self::Vector;

    /// Lane-wise equality: all-ones where equal, zero elsewhere.
    fn eq(a: Self::Vector, b: Self::Vector) -> Self::Vector;

    /// Bitwise OR.
    fn or(a: Self::Vector, b: Self::Vector) -> Self::Vector;

    /// Bitwise AND.
    fn and(a: Self::Vector, b: Self::Vector) -> Self::Vector;

    /// One bit per all-ones lane of a compare result, lane 0 in bit 0.
    fn lane_mask(v: Self::Vector) -> u32;

    /// Writes all lanes to the front of `out`.
    fn store(v: Self::Vector, out: &mut [Self::Unit; MAX_LANES]);

    /// Loads up to `LANES` units, filling the remaining lanes with `fill`.
    ///
    /// Never reads past `units`. The caller must mask off the filled lanes;
    /// `fill` may equal a needle.
    ///
    /// # Panics
    /// Panics if `units.len() > MAX_LANES`.
    #[inline]
    fn load_partial(units: &[Self::Unit], fill: Self::Unit) -> Self::Vector {
        let mut tmp = [fill; MAX_LANES];
        tmp[..units.len()].copy_from_slice(units);
        // SAFETY: `tmp` holds MAX_LANES >= LANES units.
        unsafe { Self::load(&tmp) }
    }
}

/// Native byte kernel for the compile target.
#[cfg(target_arch = "x86_64")]
pub type NativeU8 = sse2::Sse2U8;
/// Native UTF-16 unit kernel for the compile target.
#[cfg(target_arch = "x86_64")]
pub type NativeU16 = sse2::Sse2U16;

/// Native byte kernel for the compile target.
#[cfg(target_arch = "aarch64")]
pub type NativeU8 = neon::NeonU8;
/// Native UTF-16 unit kernel for the compile target.
#[cfg(target_arch = "aarch64")]
pub type NativeU16 = neon::NeonU16;

/// Native byte kernel for the compile target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type NativeU8 = portable::PortableU8;
/// Native UTF-16 unit kernel for the compile target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type NativeU16 = portable::PortableU16;
