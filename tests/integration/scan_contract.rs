//! Public scan contract, exercised through the crate's top-level API.

use needle_scan::{
    locate_all, locate_all_units, locate_first, locate_first_units, CodeUnit, EngineKind, Match,
    NeedleSet, ScanError, ScanErrorKind, ScanSummary,
};

fn all_engines<T: CodeUnit>(
    hay: &[T],
    needles: &NeedleSet<T>,
    start: usize,
    count: usize,
) -> Vec<Result<Vec<Match>, ScanError>> {
    EngineKind::ALL
        .iter()
        .map(|kind| {
            let mut out = Vec::new();
            kind.engine::<T>()
                .locate_all(hay, needles, start, count, &mut out)
                .map(|_| out)
        })
        .collect()
}

#[test]
fn brackets_in_short_text() {
    let needles = NeedleSet::new(b"[]").unwrap();
    for result in all_engines(b"a[b]c", &needles, 0, 5) {
        let matches = result.unwrap();
        assert_eq!(matches, vec![Match::new(1, 0), Match::new(3, 1)]);
        let chars: Vec<char> = matches
            .iter()
            .map(|m| needles.unit(m.needle).unwrap() as char)
            .collect();
        assert_eq!(chars, vec!['[', ']']);
    }
}

#[test]
fn empty_buffer_has_no_matches() {
    let mut out = Vec::new();
    let summary = locate_all_units::<u8>(&[], b"[]", 0, 0, &mut out).unwrap();
    assert_eq!(summary, ScanSummary { match_count: 0, any_match: false });
    assert!(out.is_empty());
}

#[test]
fn thirty_three_needles_is_a_configuration_error() {
    let needles: Vec<u8> = (b'A'..).take(33).collect();
    let mut out = vec![Match::new(1, 1)];
    let err = locate_all_units(b"ABC", &needles, 0, 3, &mut out).unwrap_err();
    assert_eq!(err, ScanError::TooManyNeedles { count: 33, max: 32 });
    assert_eq!(err.kind(), ScanErrorKind::Configuration);
    assert_eq!(out, vec![Match::new(1, 1)]);
    assert_eq!(
        locate_first_units(b"ABC", &needles, 0, 3).unwrap_err(),
        err
    );
}

#[test]
fn boundary_windows() {
    let hay = b"x[y]";
    let needles = NeedleSet::new(b"[]").unwrap();
    let mut out = Vec::new();

    // count == 0 anywhere in range.
    for start in 0..=hay.len() {
        let summary = locate_all(hay, &needles, start, 0, &mut out).unwrap();
        assert!(!summary.any_match);
        assert_eq!(locate_first(hay, &needles, start, 0), Ok(None));
    }

    // start = len - 1, count = 1 scans exactly the last unit.
    locate_all(hay, &needles, 3, 1, &mut out).unwrap();
    assert_eq!(out, vec![Match::new(3, 1)]);

    // Positions stay absolute when the window starts mid-buffer.
    locate_all(hay, &needles, 2, 2, &mut out).unwrap();
    assert_eq!(out, vec![Match::new(3, 1)]);
}

#[test]
fn out_of_range_requests_are_range_errors() {
    let needles = NeedleSet::new(b"[").unwrap();
    for (start, count, expected) in [
        (5, 0, ScanError::StartOutOfRange { start: 5, len: 4 }),
        (0, 5, ScanError::CountOutOfRange { start: 0, count: 5, len: 4 }),
        (4, 1, ScanError::CountOutOfRange { start: 4, count: 1, len: 4 }),
        (2, usize::MAX, ScanError::CountOutOfRange { start: 2, count: usize::MAX, len: 4 }),
    ] {
        for result in all_engines(b"[[[[", &needles, start, count) {
            assert_eq!(result, Err(expected.clone()));
        }
        assert_eq!(expected.kind(), ScanErrorKind::Range);
        assert_eq!(locate_first(b"[[[[", &needles, start, count), Err(expected));
    }
}

#[test]
fn duplicate_needles_report_first_slot() {
    let needles = NeedleSet::new(b"][]").unwrap();
    for result in all_engines(b"]]x[", &needles, 0, 4) {
        assert_eq!(
            result.unwrap(),
            vec![Match::new(0, 0), Match::new(1, 0), Match::new(3, 1)]
        );
    }
}

#[test]
fn utf16_text_with_surrogates() {
    // "a😀[b]" in UTF-16: the emoji is a surrogate pair.
    let hay: Vec<u16> = "a\u{1F600}[b]".encode_utf16().collect();
    let needles = NeedleSet::from_utf16("[]\u{1F600}").unwrap();
    assert_eq!(needles.len(), 4);
    for result in all_engines(&hay, &needles, 0, hay.len()) {
        let positions: Vec<usize> = result.unwrap().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 5]);
    }
}

#[test]
fn long_buffers_cross_many_chunks() {
    let mut hay = vec![b'.'; 1000];
    for i in (0..1000).step_by(41) {
        hay[i] = b'{';
    }
    hay[999] = b'}';
    let needles = NeedleSet::new(b"{}").unwrap();
    let expected: Vec<Match> = (0..1000)
        .step_by(41)
        .map(|i| Match::new(i, 0))
        .chain(std::iter::once(Match::new(999, 1)))
        .collect();
    for start in [0, 1, 15, 16, 17, 500] {
        let want: Vec<Match> = expected.iter().copied().filter(|m| m.position >= start).collect();
        for result in all_engines(&hay, &needles, start, 1000 - start) {
            assert_eq!(result.unwrap(), want, "start {start}");
        }
    }
}
