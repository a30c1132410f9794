//! Error types for scan requests.
//!
//! Scans fail only on caller mistakes: a needle set that is too large, or a
//! `start`/`count` pair that does not fit the haystack. Both are detected
//! before any engine code runs, so a failed call never writes partial output.
//! The enum is `#[non_exhaustive]`; consumers should include a fallback arm.

use std::fmt;

/// Broad classification of a [`ScanError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// The needle set cannot be handled (shrink it and retry).
    Configuration,
    /// `start`/`count` violate the request invariant.
    Range,
}

/// Errors from `locate_all` / `locate_first` and needle-set construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanError {
    /// More needles than [`NEEDLES_MAX`](crate::NEEDLES_MAX).
    TooManyNeedles { count: usize, max: usize },
    /// `start` lies past the end of the haystack.
    StartOutOfRange { start: usize, len: usize },
    /// `start + count` lies past the end of the haystack.
    CountOutOfRange {
        start: usize,
        count: usize,
        len: usize,
    },
}

impl ScanError {
    /// Creates a `TooManyNeedles` error against the crate-wide cap.
    #[inline]
    pub const fn too_many_needles(count: usize) -> Self {
        Self::TooManyNeedles {
            count,
            max: crate::NEEDLES_MAX,
        }
    }

    /// Returns whether this is a configuration or a range failure.
    pub const fn kind(&self) -> ScanErrorKind {
        match self {
            Self::TooManyNeedles { .. } => ScanErrorKind::Configuration,
            Self::StartOutOfRange { .. } | Self::CountOutOfRange { .. } => ScanErrorKind::Range,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyNeedles { count, max } => {
                write!(f, "too many needles: {count} (max: {max})")
            }
            Self::StartOutOfRange { start, len } => {
                write!(f, "start {start} out of range for haystack of length {len}")
            }
            Self::CountOutOfRange { start, count, len } => write!(
                f,
                "count {count} from start {start} exceeds haystack length {len}"
            ),
        }
    }
}

impl std::error::Error for ScanError {}
