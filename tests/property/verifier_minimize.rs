//! Minimizer properties: the shrunk case still fails and never grows.

use proptest::prelude::*;

use needle_scan::verify::{minimize_case, MinimizerCfg, ReproCase};

/// Failure predicate: the window holds at least `k` units equal to `target`.
fn holds_at_least(case: &ReproCase, target: u32, k: usize) -> bool {
    case.is_in_range()
        && case.haystack[case.start..case.start + case.count]
            .iter()
            .filter(|&&u| u == target)
            .count()
            >= k
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn shrunk_case_reproduces_and_is_no_larger(
        hay in prop::collection::vec(prop::sample::select(b"ab]".to_vec()), 1..120),
        needles in prop::collection::vec(prop::sample::select(b"[](){}".to_vec()), 0..6),
        k in 1usize..4,
    ) {
        let target = b']' as u32;
        let case = ReproCase::new(&hay, &needles, 0, hay.len());
        prop_assume!(holds_at_least(&case, target, k));

        let min = minimize_case(&case, MinimizerCfg::default(), |c| holds_at_least(c, target, k));

        prop_assert!(holds_at_least(&min, target, k));
        prop_assert!(min.haystack.len() <= case.haystack.len());
        prop_assert!(min.count <= case.count);
        prop_assert!(min.needles.len() <= case.needles.len());
        prop_assert_eq!(min.unit_bits, case.unit_bits);
        // Greedy passes reach the exact lower bound for this predicate.
        prop_assert_eq!(min.count, k);
        prop_assert_eq!(min.haystack.len(), k);
    }
}
