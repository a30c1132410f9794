//! Cross-engine agreement on arbitrary haystacks, needle sets and windows.
//!
//! Every engine must match a naive oracle, positions must be strictly
//! increasing, and `locate_first` must equal the head of `locate_all`.

use proptest::prelude::*;

use needle_scan::{CodeUnit, EngineKind, Match, NeedleSet, ScanError, NEEDLES_MAX};

fn oracle<T: CodeUnit>(hay: &[T], needles: &[T], start: usize, count: usize) -> Vec<(usize, T)> {
    hay[start..start + count]
        .iter()
        .enumerate()
        .filter(|(_, u)| needles.contains(u))
        .map(|(i, &u)| (start + i, u))
        .collect()
}

/// Haystack plus a window inside it.
fn request<T: Clone + std::fmt::Debug + 'static>(
    unit: impl Strategy<Value = T> + 'static,
    max_len: usize,
) -> impl Strategy<Value = (Vec<T>, usize, usize)> {
    prop::collection::vec(unit, 0..max_len).prop_flat_map(|hay| {
        let len = hay.len();
        (Just(hay), 0..=len).prop_flat_map(move |(hay, start)| {
            (Just(hay), Just(start), 0..=len - start)
        })
    })
}

fn check_engines<T: CodeUnit>(
    hay: &[T],
    needles: &[T],
    start: usize,
    count: usize,
) -> Result<(), TestCaseError> {
    let set = NeedleSet::new(needles).unwrap();
    let expected = oracle(hay, needles, start, count);

    for kind in EngineKind::ALL {
        let engine = kind.engine::<T>();
        let mut out: Vec<Match> = Vec::new();
        let summary = engine.locate_all(hay, &set, start, count, &mut out).unwrap();

        prop_assert_eq!(summary.match_count, out.len());
        prop_assert_eq!(summary.any_match, !out.is_empty());
        prop_assert!(out.windows(2).all(|w| w[0].position < w[1].position));

        let got: Vec<(usize, T)> = out
            .iter()
            .map(|m| (m.position, set.unit(m.needle).unwrap()))
            .collect();
        prop_assert_eq!(&got, &expected, "engine {}", kind);

        // Reported slot is the first slot holding the unit.
        for m in &out {
            prop_assert_eq!(Some(m.needle), set.slot_of(hay[m.position]));
        }

        let first = engine.locate_first(hay, &set, start, count).unwrap();
        prop_assert_eq!(first, out.first().map(|m| m.position), "engine {}", kind);
    }
    Ok(())
}

fn byte_unit() -> impl Strategy<Value = u8> {
    prop_oneof![
        4 => prop::sample::select(b"abcxyz0123".to_vec()),
        1 => prop::sample::select(b"[](){}".to_vec()),
        1 => any::<u8>(),
    ]
}

fn wide_unit() -> impl Strategy<Value = u16> {
    prop_oneof![
        4 => prop::sample::select(vec![0x61u16, 0x62, 0x6100, 0x3000]),
        1 => prop::sample::select(vec![0x5Bu16, 0x5D, 0x5B5D, 0xFFFF]),
        1 => any::<u16>(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn bytes_agree_with_oracle(
        (hay, start, count) in request(byte_unit(), 300),
        needles in prop::collection::vec(byte_unit(), 0..=NEEDLES_MAX),
    ) {
        check_engines(&hay, &needles, start, count)?;
    }

    #[test]
    fn utf16_agree_with_oracle(
        (hay, start, count) in request(wide_unit(), 200),
        needles in prop::collection::vec(wide_unit(), 0..=NEEDLES_MAX),
    ) {
        check_engines(&hay, &needles, start, count)?;
    }

    #[test]
    fn windows_around_chunk_edges(
        len in 0usize..140,
        hit_mask in any::<u64>(),
        start in 0usize..70,
        delta in -1i64..=1,
        chunks in 0usize..4,
    ) {
        // Counts W-1, W, W+1 (and multiples) for the 16-lane byte kernels.
        let hay: Vec<u8> = (0..len)
            .map(|i| if hit_mask >> (i % 64) & 1 == 1 { b']' } else { b'.' })
            .collect();
        let start = start.min(len);
        let count = (chunks * 16) as i64 + delta;
        let count = (count.max(0) as usize).min(len - start);
        check_engines(&hay, b"]", start, count)?;
    }

    #[test]
    fn first_match_agrees_with_memchr(
        (hay, start, count) in request(byte_unit(), 300),
        needles in prop::collection::vec(byte_unit(), 1..=3),
    ) {
        let window = &hay[start..start + count];
        let expected = match needles.as_slice() {
            [a] => memchr::memchr(*a, window),
            [a, b] => memchr::memchr2(*a, *b, window),
            [a, b, c] => memchr::memchr3(*a, *b, *c, window),
            _ => unreachable!(),
        }
        .map(|offset| start + offset);

        let set = NeedleSet::new(&needles).unwrap();
        for kind in EngineKind::ALL {
            let first = kind.engine::<u8>().locate_first(&hay, &set, start, count).unwrap();
            prop_assert_eq!(first, expected, "engine {}", kind);
        }
    }

    #[test]
    fn errors_are_identical_across_engines(
        len in 0usize..40,
        start in 0usize..60,
        count in 0usize..60,
    ) {
        let hay = vec![b'['; len];
        let set = NeedleSet::new(b"[").unwrap();
        let expected = needle_scan::validate(len, 1, start, count);
        for kind in EngineKind::ALL {
            let engine = kind.engine::<u8>();
            let sentinel = vec![Match::new(7, 7)];
            let mut out = sentinel.clone();
            let all = engine.locate_all(&hay, &set, start, count, &mut out);
            let first = engine.locate_first(&hay, &set, start, count);
            match &expected {
                Ok(_) => {
                    prop_assert!(all.is_ok());
                    prop_assert!(first.is_ok());
                }
                Err(err) => {
                    prop_assert_eq!(all.as_ref().err(), Some(err));
                    prop_assert_eq!(first.err(), Some(err.clone()));
                    prop_assert_eq!(&out, &sentinel);
                }
            }
        }
    }

    #[test]
    fn oversized_needle_lists_are_rejected(extra in 1usize..20) {
        let needles: Vec<u16> = (0..(NEEDLES_MAX + extra) as u16).collect();
        prop_assert_eq!(
            NeedleSet::new(&needles),
            Err(ScanError::TooManyNeedles { count: NEEDLES_MAX + extra, max: NEEDLES_MAX })
        );
    }
}
