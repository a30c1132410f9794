//! Small process-level helpers shared by the harnesses and the bench binary.

pub mod env;

pub use env::{env_u32, env_u64, is_ci, RUNS_ENV, SEED_ENV};
