//! Multi-needle code-unit scanning with interchangeable scalar and
//! vectorized engines.
//!
//! ## Scope
//! Given a haystack of code units (`u8` or `u16`), a set of up to
//! [`NEEDLES_MAX`] needle units and a window `[start, start + count)`, report
//! every position whose unit equals a needle, together with the index of the
//! first needle slot that holds that unit.
//!
//! ## Key invariants
//! - Every engine returns the identical match sequence for the same request.
//! - Matches come out in strictly increasing position order.
//! - No engine reads outside `[start, start + count)`.
//! - Requests are validated before any engine code runs; a failed call leaves
//!   the caller's output vector untouched.
//!
//! ## Engines
//! - [`EngineKind::Scalar`]: the reference loop.
//! - [`EngineKind::LaneBasic`]: lane-kernel chunks, needles resolved one at a
//!   time into a per-lane scratch array.
//! - [`EngineKind::LaneFused`] (default): lane-kernel chunks with the needle
//!   index fused into registers and an overlapping tail reload.
//!
//! Lane kernels are SSE2 on x86_64, NEON on aarch64 and portable arrays
//! elsewhere; see [`lanes`].
//!
//! ## Harnesses
//! - [`verify`]: corpus-driven cross-engine equivalence checks with a
//!   deterministic minimizer and replayable [`ReproCase`]s.
//! - [`throughput`]: per-length-bucket timing of every engine relative to a
//!   baseline.
//!
//! ## Example
//! ```
//! use needle_scan::{locate_all_units, Match};
//!
//! let mut out = Vec::new();
//! let summary = locate_all_units(b"a[b]c", b"[]", 0, 5, &mut out).unwrap();
//! assert_eq!(summary.match_count, 2);
//! assert_eq!(out, vec![Match::new(1, 0), Match::new(3, 1)]);
//! ```

pub mod engine;
pub mod lanes;
pub mod stdx;
#[cfg(test)]
pub mod test_utils;
pub mod throughput;
pub mod util;
pub mod verify;

mod api;
mod error;
mod needles;
mod request;

pub use api::{CodeUnit, Match, ScanSummary, NEEDLES_MAX};
pub use engine::{
    locate_all, locate_all_units, locate_first, locate_first_units, EngineKind,
    LaneBasicEngine, LaneFusedEngine, ScalarEngine, ScanEngine, UnknownEngine,
};
pub use error::{ScanError, ScanErrorKind};
pub use needles::{NeedleSet, UniqueNeedle};
pub use request::validate;
pub use throughput::{ReportSink, TextTableSink, ThroughputConfig, ThroughputReport};
pub use verify::{
    cross_check, Differential, EquivalenceViolation, Mismatch, MinimizerCfg, ReproCase,
    VerifyConfig, VerifyError, VerifyStats,
};
