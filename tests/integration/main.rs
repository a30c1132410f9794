//! Integration tests for the needle-scan engines and harnesses.
//!
//! Run with: `cargo test --test integration`

mod scan_contract;
mod throughput_report;
mod verifier;
