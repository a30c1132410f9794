//! Scan engines and the contract they share.
//!
//! An engine only knows how to scan an already-validated window. The
//! provided methods on [`ScanEngine`] do request validation and output
//! management, so every engine reports the same errors in the same order and
//! treats the output vector the same way.
//!
//! # Engines
//! - [`ScalarEngine`]: per-unit loop over needle slots. The reference.
//! - [`LaneBasicEngine`]: chunked compares, one needle at a time, with a
//!   per-lane "already matched" guard and padded tail copies.
//! - [`LaneFusedEngine`]: chunked compares with the any-needle mask and the
//!   per-lane needle index accumulated in registers, two chunks per loop
//!   iteration, overlapping tail reload.
//!
//! Engines are zero-sized and stateless; pick one at call time through
//! [`EngineKind::engine`].

use std::fmt;
use std::str::FromStr;

use crate::api::{CodeUnit, Match, ScanSummary};
use crate::error::ScanError;
use crate::needles::NeedleSet;
use crate::request::validate;

mod lane_basic;
mod lane_fused;
mod scalar;

pub use lane_basic::LaneBasicEngine;
pub use lane_fused::LaneFusedEngine;
pub use scalar::ScalarEngine;

pub(crate) use lane_basic::{scan_all_basic, scan_first_basic};
pub(crate) use lane_fused::{scan_all_fused, scan_first_fused};


/// A multi-needle scan strategy.
///
/// Implementors provide the unchecked window scans; callers use
/// [`locate_all`](ScanEngine::locate_all) and
/// [`locate_first`](ScanEngine::locate_first).
pub trait ScanEngine<T: CodeUnit>: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> EngineKind;

    /// Short name for reports.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Appends every match in `window` to `out`, in ascending position
    /// order, reporting positions as `base + offset`.
    ///
    /// `out` already has room for `window.len()` more matches.
    fn scan_all(&self, window: &[T], base: usize, needles: &NeedleSet<T>, out: &mut Vec<Match>);

    /// Offset of the first unit in `window` equal to any needle.
    fn scan_first(&self, window: &[T], needles: &NeedleSet<T>) -> Option<usize>;

    /// Finds every needle occurrence in `haystack[start..start + count]`.
    ///
    /// `out` is cleared and then holds the matches in ascending position
    /// order. If its capacity is below `haystack.len()` it is grown once to
    /// at least that; the scan itself never reallocates.
    ///
    /// # Errors
    /// See [`validate`]. On error `out` is left untouched.
    fn locate_all(
        &self,
        haystack: &[T],
        needles: &NeedleSet<T>,
        start: usize,
        count: usize,
        out: &mut Vec<Match>,
    ) -> Result<ScanSummary, ScanError> {
        let window = validate(haystack.len(), needles.len(), start, count)?;
        out.clear();
        if window.is_empty() || needles.is_empty() {
            return Ok(ScanSummary::from_count(0));
        }
        if out.capacity() < haystack.len() {
            out.reserve(haystack.len());
        }
        self.scan_all(&haystack[window], start, needles, out);
        Ok(ScanSummary::from_count(out.len()))
    }

    /// Position of the first needle occurrence in
    /// `haystack[start..start + count]`.
    ///
    /// # Errors
    /// Same checks, in the same order, as
    /// [`locate_all`](ScanEngine::locate_all).
    fn locate_first(
        &self,
        haystack: &[T],
        needles: &NeedleSet<T>,
        start: usize,
        count: usize,
    ) -> Result<Option<usize>, ScanError> {
        let window = validate(haystack.len(), needles.len(), start, count)?;
        if window.is_empty() || needles.is_empty() {
            return Ok(None);
        }
        Ok(self
            .scan_first(&haystack[window], needles)
            .map(|offset| start + offset))
    }
}

/// Engine selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EngineKind {
    Scalar,
    LaneBasic,
    #[default]
    LaneFused,
}

impl EngineKind {
    /// Every engine, reference first.
    pub const ALL: [EngineKind; 3] = [
        EngineKind::Scalar,
        EngineKind::LaneBasic,
        EngineKind::LaneFused,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EngineKind::Scalar => "scalar",
            EngineKind::LaneBasic => "lane-basic",
            EngineKind::LaneFused => "lane-fused",
        }
    }

    /// The engine instance for code unit `T`.
    pub fn engine<T: CodeUnit>(self) -> &'static dyn ScanEngine<T> {
        match self {
            EngineKind::Scalar => &ScalarEngine,
            EngineKind::LaneBasic => &LaneBasicEngine,
            EngineKind::LaneFused => &LaneFusedEngine,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an engine name does not parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEngine(pub String);

impl fmt::Display for UnknownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown engine {:?} (expected scalar, lane-basic or lane-fused)",
            self.0
        )
    }
}

impl std::error::Error for UnknownEngine {}

impl FromStr for EngineKind {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

/// [`ScanEngine::locate_all`] on the default engine.
pub fn locate_all<T: CodeUnit>(
    haystack: &[T],
    needles: &NeedleSet<T>,
    start: usize,
    count: usize,
    out: &mut Vec<Match>,
) -> Result<ScanSummary, ScanError> {
    EngineKind::default()
        .engine::<T>()
        .locate_all(haystack, needles, start, count, out)
}

/// [`ScanEngine::locate_first`] on the default engine.
pub fn locate_first<T: CodeUnit>(
    haystack: &[T],
    needles: &NeedleSet<T>,
    start: usize,
    count: usize,
) -> Result<Option<usize>, ScanError> {
    EngineKind::default()
        .engine::<T>()
        .locate_first(haystack, needles, start, count)
}

/// [`locate_all`] with needles given as raw units.
///
/// # Errors
/// [`ScanError::TooManyNeedles`] if `needles` has more than
/// [`NEEDLES_MAX`](crate::NEEDLES_MAX) units, then the range checks.
pub fn locate_all_units<T: CodeUnit>(
    haystack: &[T],
    needles: &[T],
    start: usize,
    count: usize,
    out: &mut Vec<Match>,
) -> Result<ScanSummary, ScanError> {
    let set = NeedleSet::new(needles)?;
    locate_all(haystack, &set, start, count, out)
}

/// [`locate_first`] with needles given as raw units.
///
/// # Errors
/// Same as [`locate_all_units`].
pub fn locate_first_units<T: CodeUnit>(
    haystack: &[T],
    needles: &[T],
    start: usize,
    count: usize,
) -> Result<Option<usize>, ScanError> {
    let set = NeedleSet::new(needles)?;
    locate_first(haystack, &set, start, count)
}
