//! Equivalence verifier end to end: a clean corpus passes, and a
//! deliberately broken engine is caught, minimized and replayable.

use needle_scan::verify::{
    self, CorpusConfig, Differential, Mismatch, MinimizerCfg, ReproCase, VerifyConfig,
    VerifyError,
};
use needle_scan::{CodeUnit, EngineKind, Match, NeedleSet, ScanEngine, ScalarEngine};

fn small_corpus() -> CorpusConfig {
    CorpusConfig {
        buffers: 40,
        max_len: 130,
        ..CorpusConfig::default()
    }
}

#[test]
fn generated_corpus_passes_for_bytes_and_utf16() {
    let cfg = VerifyConfig {
        corpus: small_corpus(),
        ..VerifyConfig::default()
    };
    let stats = verify::verify_corpus::<u8>(&cfg).unwrap();
    assert_eq!(stats.buffers, 40);
    assert!(stats.requests > 40);
    assert!(stats.matches > 0);

    let stats = verify::verify_corpus::<u16>(&cfg).unwrap();
    assert_eq!(stats.buffers, 40);
}

#[test]
fn any_engine_can_be_the_reference() {
    let cfg = VerifyConfig {
        corpus: small_corpus(),
        reference: EngineKind::LaneFused,
        candidates: vec![EngineKind::Scalar, EngineKind::LaneBasic],
        boundary_shapes: false,
        ..VerifyConfig::default()
    };
    assert!(verify::verify_corpus::<u8>(&cfg).is_ok());
}

/// Scalar scan that loses any match sitting in the last lane of a 16-unit
/// chunk, the classic tail-mask bug.
struct DropsLastLane;

impl<T: CodeUnit> ScanEngine<T> for DropsLastLane {
    fn kind(&self) -> EngineKind {
        EngineKind::LaneBasic
    }

    fn name(&self) -> &'static str {
        "drops-last-lane"
    }

    fn scan_all(&self, window: &[T], base: usize, needles: &NeedleSet<T>, out: &mut Vec<Match>) {
        let mut tmp = Vec::new();
        <ScalarEngine as ScanEngine<T>>::scan_all(&ScalarEngine, window, base, needles, &mut tmp);
        out.extend(tmp.into_iter().filter(|m| (m.position - base) % 16 != 15));
    }

    fn scan_first(&self, window: &[T], needles: &NeedleSet<T>) -> Option<usize> {
        <ScalarEngine as ScanEngine<T>>::scan_first(&ScalarEngine, window, needles)
    }
}

#[test]
fn broken_engine_is_caught_and_minimized() {
    let broken = DropsLastLane;
    let diff = Differential::<u8>::new(&ScalarEngine, vec![&broken as &dyn ScanEngine<u8>]);
    let corpus = verify::generate::<u8>(&small_corpus());

    let err = diff.verify_corpus(&corpus).unwrap_err();
    let VerifyError::Violation(violation) = err else {
        panic!("expected a violation, got {err:?}");
    };
    assert_eq!(violation.reference, "scalar");
    assert_eq!(violation.candidate, "drops-last-lane");

    // The failure needs a needle at window offset 15, so the minimized
    // window is exactly 16 units and only that needle survives.
    let repro = &violation.repro;
    assert_eq!(repro.count, 16);
    assert_eq!(repro.haystack.len(), 16);
    assert_eq!(repro.start, 0);
    assert_eq!(repro.needles.len(), 1);
    assert_eq!(repro.haystack[15], repro.needles[0]);
    assert!(
        matches!(violation.mismatch, Mismatch::MatchCount { expected, actual } if expected == actual + 1),
        "{:?}",
        violation.mismatch
    );
    assert!(violation.original.count >= repro.count);

    // The saved case replays to the same mismatch.
    let replayed = ReproCase::from_json(&repro.to_json().unwrap()).unwrap();
    assert_eq!(diff.replay(&replayed, &broken), Some(violation.mismatch.clone()));
    assert!(violation.to_string().contains("drops-last-lane disagrees with scalar"));
}

/// Correct `locate_all`, but `locate_first` never finds anything.
struct FirstAlwaysMisses;

impl ScanEngine<u8> for FirstAlwaysMisses {
    fn kind(&self) -> EngineKind {
        EngineKind::LaneFused
    }

    fn name(&self) -> &'static str {
        "first-always-misses"
    }

    fn scan_all(&self, window: &[u8], base: usize, needles: &NeedleSet<u8>, out: &mut Vec<Match>) {
        ScanEngine::<u8>::scan_all(&ScalarEngine, window, base, needles, out);
    }

    fn scan_first(&self, _window: &[u8], _needles: &NeedleSet<u8>) -> Option<usize> {
        None
    }
}

#[test]
fn broken_reference_first_is_caught() {
    let broken = FirstAlwaysMisses;
    let diff = Differential::<u8>::new(&broken, vec![EngineKind::LaneFused.engine()]);
    let corpus = verify::generate::<u8>(&CorpusConfig {
        buffers: 20,
        ..small_corpus()
    });

    let Err(VerifyError::Violation(violation)) = diff.verify_corpus(&corpus) else {
        panic!("a reference whose locate_first misses must not verify");
    };
    assert_eq!(violation.reference, "first-always-misses");
    assert_eq!(violation.candidate, "first-always-misses");
    assert!(matches!(
        violation.mismatch,
        Mismatch::First {
            expected: Some(_),
            actual: None
        }
    ));

    // One needle unit in a one-unit window is enough to show it.
    let repro = &violation.repro;
    assert_eq!((repro.start, repro.count), (0, 1));
    assert_eq!(repro.haystack.len(), 1);
    assert_eq!(diff.replay(repro, &broken), Some(violation.mismatch.clone()));
}

#[test]
fn minimizer_budget_is_respected() {
    let broken = DropsLastLane;
    let diff = Differential::<u16>::new(&ScalarEngine, vec![&broken as &dyn ScanEngine<u16>])
        .with_boundary_shapes(false)
        .with_minimizer(MinimizerCfg { max_iterations: 0 });
    let corpus = verify::generate::<u16>(&small_corpus());

    let Err(VerifyError::Violation(violation)) = diff.verify_corpus(&corpus) else {
        panic!("expected a violation");
    };
    assert_eq!(violation.repro, violation.original);
    assert_eq!(violation.repro.unit_bits, 16);
}

#[test]
fn clean_replay_reports_nothing() {
    let diff = Differential::<u8>::new(&ScalarEngine, vec![EngineKind::LaneFused.engine()]);
    let case = ReproCase::new(b"0123456789abcde]", b"]", 0, 16);
    assert_eq!(diff.replay(&case, EngineKind::LaneFused.engine()), None);
    // A case captured with the other width does not decode.
    let wide = ReproCase::new(&[0x5Du16], &[0x5Du16], 0, 1);
    assert_eq!(diff.replay(&wide, EngineKind::LaneFused.engine()), None);
}
