//! Property-based tests for the scan engines.
//!
//! Run with: `cargo test --test property`

mod engine_agreement;
mod verifier_minimize;
