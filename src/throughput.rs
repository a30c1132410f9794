//! Relative throughput of the scan engines, bucketed by input length.
//!
//! Buffers are grouped into length buckets (each bucket holds lengths in
//! `(previous bound, bound]`). For every bucket the engines are measured one
//! after another: each call warms the engine on a one-unit window, then
//! times a full-buffer `locate_all`. Times are summed per engine and bucket
//! and reported as a ratio against the baseline engine.
//!
//! Numbers are wall-clock and single-threaded; compare ratios, not absolute
//! nanoseconds, across machines.

use std::io;
use std::time::Instant;

use serde::Serialize;

use crate::api::{CodeUnit, Match};
use crate::engine::EngineKind;
use crate::error::ScanError;
use crate::lanes::LaneKernel;
use crate::needles::NeedleSet;
use crate::util::env::{env_u32, env_u64, RUNS_ENV, SEED_ENV};
use crate::verify::corpus::{self, Corpus, CorpusConfig};

// ============================================================================
// Configuration
// ============================================================================

/// Default bucket upper bounds, in code units.
pub const DEFAULT_BUCKETS: [usize; 11] = [4, 8, 16, 32, 64, 92, 128, 256, 512, 768, 1024];

/// Default timed calls per engine per bucket.
pub const DEFAULT_RUNS_PER_BUCKET: u32 = 32 * 1024;

/// Configuration for a throughput run.
#[derive(Clone, Debug)]
pub struct ThroughputConfig {
    /// Ascending bucket upper bounds. Longer buffers are not measured.
    pub buckets: Vec<usize>,
    /// Timed calls per engine per bucket, cycling through the bucket's
    /// buffers.
    pub runs_per_bucket: u32,
    /// Engines to measure, in report order.
    pub engines: Vec<EngineKind>,
    /// Engine every ratio is relative to. Measured even if not listed in
    /// `engines`.
    pub baseline: EngineKind,
    pub corpus: CorpusConfig,
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS.to_vec(),
            runs_per_bucket: DEFAULT_RUNS_PER_BUCKET,
            engines: EngineKind::ALL.to_vec(),
            baseline: EngineKind::Scalar,
            corpus: CorpusConfig::default(),
        }
    }
}

impl ThroughputConfig {
    /// Quick settings for smoke runs and CI.
    pub fn ci_quick() -> Self {
        Self {
            runs_per_bucket: 64,
            corpus: CorpusConfig {
                buffers: 128,
                ..CorpusConfig::default()
            },
            ..Self::default()
        }
    }

    /// Applies `NEEDLE_SCAN_RUNS` and `NEEDLE_SCAN_SEED` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(runs) = env_u32(RUNS_ENV) {
            self.runs_per_bucket = runs;
        }
        if let Some(seed) = env_u64(SEED_ENV) {
            self.corpus.seed = seed;
        }
        self
    }

    /// Measured engines: `engines` followed by the baseline if missing.
    fn measured_engines(&self) -> Vec<EngineKind> {
        let mut engines = self.engines.clone();
        if !engines.contains(&self.baseline) {
            engines.push(self.baseline);
        }
        engines
    }
}

// ============================================================================
// Report
// ============================================================================

/// One engine's totals within a bucket.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngineTiming {
    pub engine: &'static str,
    /// Saturating sum of timed call durations.
    pub elapsed_ns: u64,
    /// `elapsed_ns / baseline elapsed_ns`; `None` if the baseline measured
    /// zero time.
    pub ratio: Option<f64>,
    /// Matches found by the timed calls.
    pub matches: u64,
}

/// Totals for one length bucket.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BucketReport {
    /// Inclusive upper bound on buffer length.
    pub max_len: usize,
    /// Corpus buffers that fell into the bucket.
    pub buffers: usize,
    /// Timed calls per engine (zero for an empty bucket).
    pub calls: u64,
    pub timings: Vec<EngineTiming>,
}

/// Result of [`run`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThroughputReport {
    pub unit_bits: u32,
    /// Lane kernel the vectorized engines ran on.
    pub kernel: &'static str,
    pub baseline: &'static str,
    pub engines: Vec<&'static str>,
    pub runs_per_bucket: u32,
    pub seed: u64,
    pub buckets: Vec<BucketReport>,
}

impl ThroughputReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Header row followed by one row per bucket.
    ///
    /// Columns: bucket bound, buffer count, then per engine its total
    /// nanoseconds and its ratio to the baseline.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut header = vec!["len<=".to_string(), "buffers".to_string()];
        for engine in &self.engines {
            header.push(format!("{engine} ns"));
            header.push(format!("{engine}/{}", self.baseline));
        }

        let mut rows = vec![header];
        for bucket in &self.buckets {
            let mut row = vec![bucket.max_len.to_string(), bucket.buffers.to_string()];
            for timing in &bucket.timings {
                row.push(timing.elapsed_ns.to_string());
                row.push(match timing.ratio {
                    Some(ratio) => format!("{ratio:.3}"),
                    None => "-".to_string(),
                });
            }
            rows.push(row);
        }
        rows
    }

    /// Writes [`rows`](Self::rows) to `sink`.
    pub fn write_to(&self, sink: &mut dyn ReportSink) -> io::Result<()> {
        for row in self.rows() {
            sink.row(&row)?;
        }
        sink.finish()
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Destination for report rows.
pub trait ReportSink {
    fn row(&mut self, cells: &[String]) -> io::Result<()>;

    /// Called once after the last row.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes rows as right-aligned fixed-width columns.
pub struct TextTableSink<W: io::Write> {
    out: W,
    width: usize,
}

impl<W: io::Write> TextTableSink<W> {
    pub const DEFAULT_WIDTH: usize = 14;

    pub fn new(out: W) -> Self {
        Self::with_width(out, Self::DEFAULT_WIDTH)
    }

    pub fn with_width(out: W, width: usize) -> Self {
        Self { out, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> ReportSink for TextTableSink<W> {
    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b" ")?;
            }
            write!(self.out, "{cell:>width$}", width = self.width)?;
        }
        self.out.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Collects rows in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub rows: Vec<Vec<String>>,
}

impl ReportSink for VecSink {
    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        self.rows.push(cells.to_vec());
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Index of the bucket holding a buffer of `len` units.
fn bucket_of(buckets: &[usize], len: usize) -> Option<usize> {
    buckets.iter().position(|&max_len| len <= max_len)
}

/// Generates the configured corpus and measures it.
///
/// # Errors
/// [`ScanError::TooManyNeedles`] if the corpus needles exceed the cap.
pub fn run<T: CodeUnit>(cfg: &ThroughputConfig) -> Result<ThroughputReport, ScanError> {
    let corpus = corpus::generate::<T>(&cfg.corpus);
    run_on(cfg, &corpus)
}

/// Measures `corpus` with the engines in `cfg`.
///
/// # Errors
/// [`ScanError::TooManyNeedles`] if the corpus needles exceed the cap.
pub fn run_on<T: CodeUnit>(
    cfg: &ThroughputConfig,
    corpus: &Corpus<T>,
) -> Result<ThroughputReport, ScanError> {
    let needles = NeedleSet::new(&corpus.needles)?;
    let engines = cfg.measured_engines();

    let mut by_bucket: Vec<Vec<&[T]>> = vec![Vec::new(); cfg.buckets.len()];
    for buffer in &corpus.buffers {
        if let Some(i) = bucket_of(&cfg.buckets, buffer.len()) {
            by_bucket[i].push(buffer.as_slice());
        }
    }

    let mut out: Vec<Match> = Vec::new();
    let mut buckets = Vec::with_capacity(cfg.buckets.len());
    for (&max_len, buffers) in cfg.buckets.iter().zip(&by_bucket) {
        let calls = if buffers.is_empty() {
            0
        } else {
            u64::from(cfg.runs_per_bucket)
        };

        let mut totals = Vec::with_capacity(engines.len());
        for &kind in &engines {
            totals.push(measure(kind, buffers, &needles, calls, &mut out)?);
        }

        let baseline_ns = engines
            .iter()
            .position(|&k| k == cfg.baseline)
            .map(|i| totals[i].0)
            .unwrap_or(0);
        let timings = engines
            .iter()
            .zip(&totals)
            .map(|(kind, &(elapsed_ns, matches))| EngineTiming {
                engine: kind.name(),
                elapsed_ns,
                ratio: (baseline_ns != 0).then(|| elapsed_ns as f64 / baseline_ns as f64),
                matches,
            })
            .collect();

        buckets.push(BucketReport {
            max_len,
            buffers: buffers.len(),
            calls,
            timings,
        });
    }

    Ok(ThroughputReport {
        unit_bits: T::BITS,
        kernel: <T::Kernel as LaneKernel>::NAME,
        baseline: cfg.baseline.name(),
        engines: engines.iter().map(|k| k.name()).collect(),
        runs_per_bucket: cfg.runs_per_bucket,
        seed: cfg.corpus.seed,
        buckets,
    })
}

/// Times `calls` full-buffer scans of `kind`, cycling through `buffers`.
/// Returns total nanoseconds and total matches.
fn measure<T: CodeUnit>(
    kind: EngineKind,
    buffers: &[&[T]],
    needles: &NeedleSet<T>,
    calls: u64,
    out: &mut Vec<Match>,
) -> Result<(u64, u64), ScanError> {
    let engine = kind.engine::<T>();
    let mut elapsed_ns = 0u64;
    let mut matches = 0u64;
    for call in 0..calls {
        let buffer = buffers[(call % buffers.len() as u64) as usize];

        engine.locate_all(buffer, needles, 0, buffer.len().min(1), out)?;

        let started = Instant::now();
        let summary = engine.locate_all(
            std::hint::black_box(buffer),
            needles,
            0,
            buffer.len(),
            out,
        )?;
        let ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        elapsed_ns = elapsed_ns.saturating_add(ns);
        matches += summary.match_count as u64;
    }
    Ok((elapsed_ns, std::hint::black_box(matches)))
}
