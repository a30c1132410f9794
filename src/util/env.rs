//! Environment variable overrides.
//!
//! Unset or unparsable values read as `None`; callers keep their configured
//! default in that case.

/// Overrides `ThroughputConfig::runs_per_bucket`.
pub const RUNS_ENV: &str = "NEEDLE_SCAN_RUNS";
/// Overrides the corpus seed for the verifier and the throughput harness.
pub const SEED_ENV: &str = "NEEDLE_SCAN_SEED";

pub fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}

/// Like [`env_u32`]; also accepts a `0x` hex prefix, which is how seeds are
/// usually printed.
pub fn env_u64(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    parse_u64(value.trim())
}

pub fn parse_u64(value: &str) -> Option<u64> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

pub fn is_ci() -> bool {
    std::env::var_os("CI").is_some()
}
