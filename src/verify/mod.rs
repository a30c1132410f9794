//! Cross-engine equivalence verification.
//!
//! Every candidate engine is run against a reference engine over a generated
//! corpus and a sweep of request shapes per buffer. The first disagreement is
//! shrunk by the minimizer and reported as an [`EquivalenceViolation`].
//!
//! Engines agree when they report the same positions and the same matched
//! *character* per position; needle slot numbers are not compared directly.
//! `locate_first` must equal the first `locate_all` position on the same
//! engine and on the reference.
//!
//! [`cross_check`] is the generic piece: run one reference and N candidates
//! through the same operation and compare each candidate to the reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::{CodeUnit, Match};
use crate::engine::{EngineKind, ScanEngine};
use crate::error::ScanError;
use crate::lanes::LaneKernel;
use crate::needles::NeedleSet;

pub mod artifact;
pub mod corpus;
pub mod minimize;

pub use artifact::{ReproCase, REPRO_SCHEMA_VERSION};
pub use corpus::{generate, units_of, Corpus, CorpusConfig, CorpusRng};
pub use minimize::{minimize_case, MinimizerCfg};

/// A candidate whose output differed from the reference.
#[derive(Debug)]
pub struct Divergence<'a, I, D> {
    pub candidate: &'a I,
    pub diff: D,
}

/// Runs `reference` and each of `candidates` through `run` and compares
/// every candidate output to the reference output with `compare`.
///
/// `compare(reference, candidate)` returns `Some(diff)` on disagreement.
/// Returns the reference output when all candidates agree, otherwise the
/// first disagreeing candidate in order.
pub fn cross_check<'a, I, O, D>(
    reference: &I,
    candidates: &'a [I],
    mut run: impl FnMut(&I) -> O,
    mut compare: impl FnMut(&O, &O) -> Option<D>,
) -> Result<O, Divergence<'a, I, D>> {
    let expected = run(reference);
    for candidate in candidates {
        let actual = run(candidate);
        if let Some(diff) = compare(&expected, &actual) {
            return Err(Divergence { candidate, diff });
        }
    }
    Ok(expected)
}

/// Everything one engine reports for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub all: Result<Vec<Match>, ScanError>,
    pub first: Result<Option<usize>, ScanError>,
}

impl Observation {
    pub fn capture<T: CodeUnit>(
        engine: &dyn ScanEngine<T>,
        haystack: &[T],
        needles: &NeedleSet<T>,
        start: usize,
        count: usize,
    ) -> Self {
        let mut out = Vec::new();
        let all = engine
            .locate_all(haystack, needles, start, count, &mut out)
            .map(|_| out);
        let first = engine.locate_first(haystack, needles, start, count);
        Self { all, first }
    }
}

/// First difference between a candidate and the reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mismatch {
    /// One side errored, or both errored differently.
    Outcome { expected: String, actual: String },
    MatchCount { expected: usize, actual: usize },
    Position {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// Same position, different matched unit.
    Character {
        position: usize,
        expected: Option<u32>,
        actual: Option<u32>,
    },
    /// `locate_first` disagrees with the first `locate_all` position.
    First {
        expected: Option<usize>,
        actual: Option<usize>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Outcome { expected, actual } => {
                write!(f, "outcome differs: expected {expected}, got {actual}")
            }
            Mismatch::MatchCount { expected, actual } => {
                write!(f, "match count differs: expected {expected}, got {actual}")
            }
            Mismatch::Position {
                index,
                expected,
                actual,
            } => write!(
                f,
                "match #{index} position differs: expected {expected}, got {actual}"
            ),
            Mismatch::Character {
                position,
                expected,
                actual,
            } => write!(
                f,
                "matched unit at {position} differs: expected {expected:?}, got {actual:?}"
            ),
            Mismatch::First { expected, actual } => {
                write!(f, "first match differs: expected {expected:?}, got {actual:?}")
            }
        }
    }
}

fn describe<V: fmt::Debug>(result: &Result<V, ScanError>) -> String {
    match result {
        Ok(value) => format!("Ok({value:?})"),
        Err(err) => format!("Err({err})"),
    }
}

/// Compares a candidate observation to the reference one.
pub fn compare_observations<T: CodeUnit>(
    needles: &NeedleSet<T>,
    expected: &Observation,
    actual: &Observation,
) -> Option<Mismatch> {
    let (want, got) = match (&expected.all, &actual.all) {
        (Ok(want), Ok(got)) => (want, got),
        (Err(a), Err(b)) if a == b => {
            return (expected.first != actual.first).then(|| Mismatch::Outcome {
                expected: describe(&expected.first),
                actual: describe(&actual.first),
            });
        }
        _ => {
            return Some(Mismatch::Outcome {
                expected: describe(&expected.all),
                actual: describe(&actual.all),
            })
        }
    };

    if want.len() != got.len() {
        return Some(Mismatch::MatchCount {
            expected: want.len(),
            actual: got.len(),
        });
    }
    let unit_of = |m: &Match| needles.unit(m.needle).map(|u| u.to_u32());
    for (index, (w, g)) in want.iter().zip(got).enumerate() {
        if w.position != g.position {
            return Some(Mismatch::Position {
                index,
                expected: w.position,
                actual: g.position,
            });
        }
        if unit_of(w) != unit_of(g) {
            return Some(Mismatch::Character {
                position: w.position,
                expected: unit_of(w),
                actual: unit_of(g),
            });
        }
    }

    let first = want.first().map(|m| m.position);
    match &actual.first {
        Ok(found) if *found == first => None,
        Ok(found) => Some(Mismatch::First {
            expected: first,
            actual: *found,
        }),
        Err(_) => Some(Mismatch::Outcome {
            expected: format!("Ok({first:?})"),
            actual: describe(&actual.first),
        }),
    }
}

/// Checks that `locate_first` agrees with the head of `locate_all` within one
/// observation.
pub fn first_consistency(observed: &Observation) -> Option<Mismatch> {
    match (&observed.all, &observed.first) {
        (Ok(all), Ok(found)) => {
            let head = all.first().map(|m| m.position);
            (*found != head).then_some(Mismatch::First {
                expected: head,
                actual: *found,
            })
        }
        (Err(a), Err(b)) if a == b => None,
        (all, first) => Some(Mismatch::Outcome {
            expected: describe(all),
            actual: describe(first),
        }),
    }
}

/// Verifier settings.
#[derive(Clone, Debug)]
pub struct VerifyConfig {
    pub corpus: CorpusConfig,
    pub reference: EngineKind,
    /// Engines compared against `reference`.
    pub candidates: Vec<EngineKind>,
    /// Also sweep counts around one and two chunk widths.
    pub boundary_shapes: bool,
    pub minimizer: MinimizerCfg,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            reference: EngineKind::Scalar,
            candidates: vec![EngineKind::LaneBasic, EngineKind::LaneFused],
            boundary_shapes: true,
            minimizer: MinimizerCfg::default(),
        }
    }
}

/// Counters for a passing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerifyStats {
    pub buffers: usize,
    pub requests: u64,
    pub matches: u64,
}

/// A candidate engine disagreed with the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceViolation {
    pub reference: &'static str,
    pub candidate: &'static str,
    /// Difference on the minimized case.
    pub mismatch: Mismatch,
    /// Smallest request that still reproduces the difference.
    pub repro: ReproCase,
    /// The request the corpus run first failed on.
    pub original: ReproCase,
}

impl fmt::Display for EquivalenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} disagrees with {}: {} (haystack len {}, start {}, count {}, {} needles)",
            self.candidate,
            self.reference,
            self.mismatch,
            self.repro.haystack.len(),
            self.repro.start,
            self.repro.count,
            self.repro.needles.len()
        )
    }
}

impl std::error::Error for EquivalenceViolation {}

/// Request shapes swept for a buffer of `len` units with chunk width
/// `lanes`.
///
/// Per start: the suffix `(start, len - start)`, the prefix
/// `(0, start + 1)` and, with `boundary`, counts `W-1, W, W+1, 2W-1, 2W,
/// 2W+1` that fit. `(len, 0)` is always included.
pub fn request_shapes(len: usize, lanes: usize, boundary: bool) -> Vec<(usize, usize)> {
    let mut shapes = Vec::new();
    for start in 0..len {
        shapes.push((start, len - start));
        shapes.push((0, start + 1));
        if boundary {
            let w = lanes.max(1);
            for count in [w - 1, w, w + 1, 2 * w - 1, 2 * w, 2 * w + 1] {
                if count <= len - start {
                    shapes.push((start, count));
                }
            }
        }
    }
    shapes.push((len, 0));
    shapes
}

/// A reference engine and the candidates checked against it.
pub struct Differential<'e, T: CodeUnit> {
    reference: &'e dyn ScanEngine<T>,
    candidates: Vec<&'e dyn ScanEngine<T>>,
    boundary_shapes: bool,
    minimizer: MinimizerCfg,
}

impl<'e, T: CodeUnit> Differential<'e, T> {
    pub fn new(reference: &'e dyn ScanEngine<T>, candidates: Vec<&'e dyn ScanEngine<T>>) -> Self {
        Self {
            reference,
            candidates,
            boundary_shapes: true,
            minimizer: MinimizerCfg::default(),
        }
    }

    /// Engines and sweep settings from `cfg`.
    pub fn from_config(cfg: &VerifyConfig) -> Differential<'static, T> {
        Differential {
            reference: cfg.reference.engine::<T>(),
            candidates: cfg.candidates.iter().map(|k| k.engine::<T>()).collect(),
            boundary_shapes: cfg.boundary_shapes,
            minimizer: cfg.minimizer,
        }
    }

    pub fn with_boundary_shapes(mut self, on: bool) -> Self {
        self.boundary_shapes = on;
        self
    }

    pub fn with_minimizer(mut self, minimizer: MinimizerCfg) -> Self {
        self.minimizer = minimizer;
        self
    }

    /// Runs one request on every engine. Returns the reference observation,
    /// or the first engine that disagrees and how.
    ///
    /// Candidates are compared to the reference first; the reference is then
    /// held to its own `locate_all` head, so a broken reference
    /// `locate_first` is reported against the reference itself.
    pub fn check_request(
        &self,
        haystack: &[T],
        needles: &NeedleSet<T>,
        start: usize,
        count: usize,
    ) -> Result<Observation, (&'e dyn ScanEngine<T>, Mismatch)> {
        let observed = cross_check(
            &self.reference,
            &self.candidates,
            |engine| Observation::capture(*engine, haystack, needles, start, count),
            |expected, actual| compare_observations(needles, expected, actual),
        )
        .map_err(|d| (*d.candidate, d.diff))?;
        match first_consistency(&observed) {
            Some(mismatch) => Err((self.reference, mismatch)),
            None => Ok(observed),
        }
    }

    /// Replays `case` against the reference and `candidate` only.
    ///
    /// Returns `None` when they agree or the case does not decode. Replaying
    /// the reference against itself checks its `locate_first` against its
    /// own `locate_all`.
    pub fn replay(&self, case: &ReproCase, candidate: &dyn ScanEngine<T>) -> Option<Mismatch> {
        let haystack = case.haystack_units::<T>()?;
        let needles = NeedleSet::new(&case.needle_units::<T>()?).ok()?;
        let (start, count) = (case.start, case.count);
        cross_check(
            &self.reference,
            std::slice::from_ref(&candidate),
            |engine| Observation::capture(*engine, &haystack, &needles, start, count),
            |expected, actual| compare_observations(&needles, expected, actual),
        )
        .err()
        .map(|d| d.diff)
    }

    /// Shrinks a failing request and packages it as a violation.
    pub fn violation(
        &self,
        candidate: &dyn ScanEngine<T>,
        mismatch: Mismatch,
        original: ReproCase,
    ) -> EquivalenceViolation {
        let repro = minimize_case(&original, self.minimizer, |case| {
            case.is_in_range() && self.replay(case, candidate).is_some()
        });
        let mismatch = self.replay(&repro, candidate).unwrap_or(mismatch);
        EquivalenceViolation {
            reference: self.reference.name(),
            candidate: candidate.name(),
            mismatch,
            repro,
            original,
        }
    }

    /// Sweeps every request shape over one buffer.
    ///
    /// # Errors
    /// The first disagreement, minimized.
    pub fn verify_buffer(
        &self,
        haystack: &[T],
        needles: &NeedleSet<T>,
        stats: &mut VerifyStats,
    ) -> Result<(), EquivalenceViolation> {
        let lanes = <T::Kernel as LaneKernel>::LANES;
        for (start, count) in request_shapes(haystack.len(), lanes, self.boundary_shapes) {
            stats.requests += 1;
            match self.check_request(haystack, needles, start, count) {
                Ok(observed) => {
                    if let Ok(all) = &observed.all {
                        stats.matches += all.len() as u64;
                    }
                }
                Err((candidate, mismatch)) => {
                    let original = ReproCase::new(haystack, needles.as_slice(), start, count);
                    return Err(self.violation(candidate, mismatch, original));
                }
            }
        }
        stats.buffers += 1;
        Ok(())
    }

    /// Verifies every buffer of `corpus`.
    ///
    /// # Errors
    /// [`VerifyError::Config`] if the corpus needles exceed the needle cap,
    /// otherwise the first disagreement, minimized.
    pub fn verify_corpus(&self, corpus: &Corpus<T>) -> Result<VerifyStats, VerifyError> {
        let needles = NeedleSet::new(&corpus.needles)?;
        let mut stats = VerifyStats::default();
        for buffer in &corpus.buffers {
            self.verify_buffer(buffer, &needles, &mut stats)?;
        }
        Ok(stats)
    }
}

/// Why a corpus run stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerifyError {
    /// The corpus needle list is not a valid needle set.
    Config(ScanError),
    /// A candidate engine disagreed with the reference.
    Violation(Box<EquivalenceViolation>),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Config(err) => write!(f, "corpus config: {err}"),
            VerifyError::Violation(v) => write!(f, "equivalence violation: {v}"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Config(err) => Some(err),
            VerifyError::Violation(v) => Some(v.as_ref()),
        }
    }
}

impl From<ScanError> for VerifyError {
    fn from(err: ScanError) -> Self {
        VerifyError::Config(err)
    }
}

impl From<EquivalenceViolation> for VerifyError {
    fn from(v: EquivalenceViolation) -> Self {
        VerifyError::Violation(Box::new(v))
    }
}

/// Generates the configured corpus and verifies every buffer with the
/// configured engines.
///
/// # Errors
/// See [`Differential::verify_corpus`].
pub fn verify_corpus<T: CodeUnit>(cfg: &VerifyConfig) -> Result<VerifyStats, VerifyError> {
    let corpus = corpus::generate::<T>(&cfg.corpus);
    Differential::<T>::from_config(cfg).verify_corpus(&corpus)
}
