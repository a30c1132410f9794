//! Fixed-capacity, inline vector for small, bounded collections.
//!
//! # Invariants
//! - `len <= N` at all times.
//! - Elements in `0..len` are initialized and valid.
//! - Elements in `len..N` are uninitialized and must never be read or dropped.
//!
//! # Design Notes
//! - Uses `MaybeUninit` to avoid `T: Default` and to skip zeroing.
//! - Callers check capacity up front; `push` panics on overflow.

use std::fmt;
use std::mem::MaybeUninit;
use std::ops::Deref;

/// Fixed-capacity vector backed by an inline array.
///
/// Capacity is always `N`; this type never reallocates. Elements are stored
/// contiguously and in insertion order.
pub struct FixedVec<T, const N: usize> {
    // Number of initialized elements in `buf`.
    len: usize,
    // Inline storage; only `0..len` is initialized.
    buf: [MaybeUninit<T>; N],
}

fn uninit_array<T, const N: usize>() -> [MaybeUninit<T>; N] {
    // SAFETY: An uninitialized `MaybeUninit<T>` is always valid, and the array
    // only contains `MaybeUninit` values.
    unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() }
}

impl<T, const N: usize> FixedVec<T, N> {
    /// Creates an empty `FixedVec`. O(1), no element initialization.
    pub fn new() -> Self {
        Self {
            len: 0,
            buf: uninit_array(),
        }
    }

    /// Appends `value`.
    ///
    /// # Panics
    /// Panics if the vector is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(self.len < N, "FixedVec capacity exceeded");
        self.buf[self.len].write(value);
        self.len += 1;
    }

    /// Returns a shared slice of the initialized prefix.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `0..len` is initialized and contiguous.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr().cast::<T>(), self.len) }
    }

    /// Drops all initialized elements, leaving capacity unchanged.
    pub fn clear(&mut self) {
        // needs_drop is a const fn, so this branch folds away for Copy units.
        if std::mem::needs_drop::<T>() {
            // SAFETY: only the first `len` elements are initialized.
            unsafe {
                for i in 0..self.len {
                    std::ptr::drop_in_place(self.buf[i].as_mut_ptr());
                }
            }
        }
        self.len = 0;
    }
}

impl<T, const N: usize> Default for FixedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for FixedVec<T, N> {
    fn clone(&self) -> Self {
        let mut out = Self::new();
        for item in self.as_slice() {
            out.push(item.clone());
        }
        out
    }
}

impl<T: PartialEq, const N: usize> PartialEq for FixedVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for FixedVec<T, N> {}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, const N: usize> Deref for FixedVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> Drop for FixedVec<T, N> {
    fn drop(&mut self) {
        self.clear();
    }
}
