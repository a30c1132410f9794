//! Deterministic minimizer for equivalence failures.
//!
//! Greedy shrink passes over a [`ReproCase`]. Each candidate is replayed via
//! a caller-provided predicate and kept only if it still reproduces the
//! failure. No randomness is used.

use super::artifact::ReproCase;

/// Configuration for deterministic minimization.
#[derive(Clone, Copy, Debug)]
pub struct MinimizerCfg {
    /// Maximum full-pass iterations (prevents non-terminating shrink loops).
    pub max_iterations: u32,
}

impl Default for MinimizerCfg {
    fn default() -> Self {
        Self { max_iterations: 8 }
    }
}

/// Shrinks a failing case toward the smallest `(haystack, start, count)`
/// and needle list that still fail.
///
/// `reproduce` should return true only when the failure still reproduces
/// under the candidate. Candidates always address an in-range window.
pub fn minimize_case(
    failing: &ReproCase,
    cfg: MinimizerCfg,
    reproduce: impl Fn(&ReproCase) -> bool,
) -> ReproCase {
    let mut cur = failing.clone();

    let mut iter = 0u32;
    loop {
        if iter >= cfg.max_iterations {
            break;
        }
        iter = iter.saturating_add(1);

        let mut changed = false;
        changed |= trim_window_end(&mut cur, &reproduce);
        changed |= advance_window_start(&mut cur, &reproduce);
        changed |= drop_units_after_window(&mut cur, &reproduce);
        changed |= drop_units_before_window(&mut cur, &reproduce);
        changed |= drop_window_units(&mut cur, &reproduce);
        changed |= drop_needles(&mut cur, &reproduce);
        changed |= simplify_units(&mut cur, &reproduce);

        if !changed {
            break;
        }
    }

    cur
}

fn trim_window_end(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    for count in 0..cur.count {
        let mut cand = cur.clone();
        cand.count = count;
        if reproduce(&cand) {
            *cur = cand;
            return true;
        }
    }
    false
}

fn advance_window_start(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    for skip in (1..=cur.count).rev() {
        let mut cand = cur.clone();
        cand.start += skip;
        cand.count -= skip;
        if reproduce(&cand) {
            *cur = cand;
            return true;
        }
    }
    false
}

fn drop_units_after_window(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    let end = cur.start + cur.count;
    if cur.haystack.len() <= end {
        return false;
    }
    let mut cand = cur.clone();
    cand.haystack.truncate(end);
    if reproduce(&cand) {
        *cur = cand;
        return true;
    }
    false
}

fn drop_units_before_window(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    if cur.start == 0 {
        return false;
    }
    let mut cand = cur.clone();
    cand.haystack.drain(..cand.start);
    cand.start = 0;
    if reproduce(&cand) {
        *cur = cand;
        return true;
    }
    false
}

fn drop_window_units(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    let mut changed = false;
    let mut i = cur.start + cur.count;
    while i > cur.start {
        i -= 1;
        let mut cand = cur.clone();
        cand.haystack.remove(i);
        cand.count -= 1;
        if reproduce(&cand) {
            *cur = cand;
            changed = true;
        }
    }
    changed
}

fn drop_needles(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    let mut changed = false;
    let mut slot = cur.needles.len();
    while slot > 0 {
        slot -= 1;
        let mut cand = cur.clone();
        cand.needles.remove(slot);
        if reproduce(&cand) {
            *cur = cand;
            changed = true;
        }
    }
    changed
}

/// Smallest unit value that is not a needle.
fn filler(needles: &[u32]) -> u32 {
    (0u32..).find(|u| !needles.contains(u)).unwrap_or(0)
}

fn simplify_units(cur: &mut ReproCase, reproduce: &impl Fn(&ReproCase) -> bool) -> bool {
    let fill = filler(&cur.needles);
    let is_noise = |u: u32, needles: &[u32]| u != fill && !needles.contains(&u);
    if !cur.haystack.iter().any(|&u| is_noise(u, &cur.needles)) {
        return false;
    }

    // All at once first, then one unit at a time.
    let mut cand = cur.clone();
    for unit in cand.haystack.iter_mut() {
        if is_noise(*unit, &cur.needles) {
            *unit = fill;
        }
    }
    if reproduce(&cand) {
        *cur = cand;
        return true;
    }

    let mut changed = false;
    for i in 0..cur.haystack.len() {
        if !is_noise(cur.haystack[i], &cur.needles) {
            continue;
        }
        let mut cand = cur.clone();
        cand.haystack[i] = fill;
        if reproduce(&cand) {
            *cur = cand;
            changed = true;
        }
    }
    changed
}
