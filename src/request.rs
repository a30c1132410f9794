//! Scan request validation.
//!
//! Every engine funnels through `validate` before touching the haystack, so
//! the error set (and its order: needles first, then range) is identical for
//! `locate_all` and `locate_first` on every engine.

use std::ops::Range;

use crate::api::NEEDLES_MAX;
use crate::error::ScanError;

/// Checks a scan request and returns the window it covers.
///
/// Accepts `start == len` only together with `count == 0`.
///
/// # Errors
/// - [`ScanError::TooManyNeedles`] if `needle_count > NEEDLES_MAX`.
/// - [`ScanError::StartOutOfRange`] if `start > len`.
/// - [`ScanError::CountOutOfRange`] if `count > len - start`.
#[inline]
pub fn validate(
    len: usize,
    needle_count: usize,
    start: usize,
    count: usize,
) -> Result<Range<usize>, ScanError> {
    if needle_count > NEEDLES_MAX {
        return Err(ScanError::too_many_needles(needle_count));
    }
    if start > len {
        return Err(ScanError::StartOutOfRange { start, len });
    }
    if count > len - start {
        return Err(ScanError::CountOutOfRange { start, count, len });
    }
    Ok(start..start + count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_and_empty_windows() {
        assert_eq!(validate(5, 2, 0, 5), Ok(0..5));
        assert_eq!(validate(0, 2, 0, 0), Ok(0..0));
        assert_eq!(validate(5, 2, 5, 0), Ok(5..5));
        assert_eq!(validate(5, 2, 4, 1), Ok(4..5));
    }

    #[test]
    fn rejects_start_past_end() {
        assert_eq!(
            validate(5, 2, 6, 0),
            Err(ScanError::StartOutOfRange { start: 6, len: 5 })
        );
    }

    #[test]
    fn rejects_count_past_end_without_overflow() {
        assert_eq!(
            validate(5, 2, 3, 3),
            Err(ScanError::CountOutOfRange {
                start: 3,
                count: 3,
                len: 5
            })
        );
        assert_eq!(
            validate(5, 2, 1, usize::MAX),
            Err(ScanError::CountOutOfRange {
                start: 1,
                count: usize::MAX,
                len: 5
            })
        );
    }

    #[test]
    fn needle_cap_is_checked_before_range() {
        assert_eq!(
            validate(5, NEEDLES_MAX + 1, 99, 99),
            Err(ScanError::too_many_needles(NEEDLES_MAX + 1))
        );
    }
}
