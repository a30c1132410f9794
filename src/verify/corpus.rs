//! Deterministic haystack corpus for equivalence runs.
//!
//! Buffers are drawn from a small alphabet and then sprinkled with needle
//! characters at random positions, so every buffer length sees matches in
//! varied chunk lanes. Output depends only on the config.

use serde::{Deserialize, Serialize};

use crate::api::CodeUnit;

/// Deterministic xorshift64* generator.
///
/// Not cryptographically secure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRng {
    state: u64,
}

impl CorpusRng {
    /// A zero seed is remapped to a non-zero constant to avoid the xorshift
    /// lockup state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state }
    }

    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Value in `[0, bound)`; `bound` must be non-zero.
    #[inline(always)]
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }
}

/// Shape of a generated corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub seed: u64,
    /// Number of buffers, including the length-0 and length-1 buffers.
    pub buffers: usize,
    pub min_len: usize,
    pub max_len: usize,
    /// Filler characters. Characters that do not fit the code unit are
    /// skipped.
    pub alphabet: String,
    /// Needle characters, in slot order.
    pub needles: String,
    /// Needle characters written into each non-empty buffer.
    pub needles_per_buffer: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,
            buffers: 1024,
            min_len: 0,
            max_len: 1024,
            alphabet: "012345679abcdefgzhjklmnopqrstuvwxyz".to_string(),
            needles: "[](){}".to_string(),
            needles_per_buffer: 4,
        }
    }
}

/// Generated buffers plus the needle units they were seeded with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpus<T> {
    pub buffers: Vec<Vec<T>>,
    pub needles: Vec<T>,
}

/// Encodes `text` as UTF-16 and keeps the units that fit `T`.
pub fn units_of<T: CodeUnit>(text: &str) -> Vec<T> {
    text.encode_utf16()
        .filter_map(|u| T::from_u32(u as u32))
        .collect()
}

/// Length of buffer `index`. Buffers 0 and 1 are always the empty and
/// single-unit buffers; the rest sweep `min_len..=max_len`.
fn buffer_len(cfg: &CorpusConfig, index: usize) -> usize {
    match index {
        0 => 0,
        1 => 1,
        _ => {
            let min = cfg.min_len.min(cfg.max_len);
            let span = cfg.max_len - min;
            let steps = cfg.buffers.saturating_sub(3).max(1);
            min + (index - 2) * span / steps
        }
    }
}

/// Builds the corpus described by `cfg`.
///
/// If the alphabet has no unit that fits `T`, buffers are filled with the
/// zero unit.
pub fn generate<T: CodeUnit>(cfg: &CorpusConfig) -> Corpus<T> {
    let alphabet = units_of::<T>(&cfg.alphabet);
    let needles = units_of::<T>(&cfg.needles);
    let mut rng = CorpusRng::new(cfg.seed);

    let mut buffers = Vec::with_capacity(cfg.buffers);
    for index in 0..cfg.buffers {
        let len = buffer_len(cfg, index);
        let mut buf: Vec<T> = (0..len)
            .map(|_| {
                if alphabet.is_empty() {
                    T::default()
                } else {
                    alphabet[rng.below(alphabet.len())]
                }
            })
            .collect();
        if len > 0 && !needles.is_empty() {
            for _ in 0..cfg.needles_per_buffer {
                let at = rng.below(len);
                buf[at] = needles[rng.below(needles.len())];
            }
        }
        buffers.push(buf);
    }

    Corpus { buffers, needles }
}
