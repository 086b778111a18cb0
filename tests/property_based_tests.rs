//! Property-based tests for the scoring core
//!
//! Covers the invariants the closed-form math must hold for any input:
//! boundary correction stays in the open unit interval, the SDT mapping is
//! not symmetric under proportion swap, classification never panics, and the
//! paired test degrades gracefully below 2 pairs.

use proptest::prelude::*;
use testigo::analysis::{paired_t_test, PairedTestOutcome};
use testigo::proportions::corrected_proportion;
use testigo::record::{Condition, TrialType};
use testigo::sdt::SdtMetrics;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_corrected_proportion_in_open_interval(n in 1usize..500, successes in 0usize..500) {
        let successes = successes.min(n);
        let p = corrected_proportion(successes, n).unwrap();
        prop_assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn prop_correction_converges_at_extremes(n in 1usize..10_000) {
        // The corrected ceiling approaches 1 and the floor approaches 0 as n grows
        let ceiling = corrected_proportion(n, n).unwrap();
        let floor = corrected_proportion(0, n).unwrap();
        prop_assert_eq!(ceiling, 1.0 - 0.5 / n as f64);
        prop_assert_eq!(floor, 0.5 / n as f64);
        prop_assert!(ceiling > 0.0 && floor < 1.0);
    }

    #[test]
    fn prop_interior_proportions_untouched(n in 2usize..500, successes in 1usize..499) {
        prop_assume!(successes < n);
        let p = corrected_proportion(successes, n).unwrap();
        prop_assert_eq!(p, successes as f64 / n as f64);
    }

    #[test]
    fn prop_sdt_mapping_not_symmetric_under_swap(
        p_sn in 0.01f64..0.99,
        p_ns in 0.01f64..0.99,
    ) {
        prop_assume!((p_sn - p_ns).abs() > 1e-6);
        let a = SdtMetrics::from_proportions(p_sn, p_ns);
        let b = SdtMetrics::from_proportions(p_ns, p_sn);
        // Swapping the proportions flips the bias terms: the full mapping
        // is asymmetric even though d' pools both z-scores.
        prop_assert!(a.lambda != b.lambda);
        prop_assert!((a.lambda + b.lambda).abs() < 1e-9);
    }

    #[test]
    fn prop_d_prime_monotone_in_p_sn(
        p_low in 0.05f64..0.5,
        delta in 0.01f64..0.45,
        p_ns in 0.05f64..0.95,
    ) {
        let low = SdtMetrics::from_proportions(p_low, p_ns);
        let high = SdtMetrics::from_proportions(p_low + delta, p_ns);
        prop_assert!(high.d_prime > low.d_prime);
    }

    #[test]
    fn prop_classify_never_panics(left in ".{0,40}", right in ".{0,40}") {
        let t = TrialType::classify(&left, &right);
        prop_assert!(matches!(t, TrialType::Sn | TrialType::Ns | TrialType::Unknown));
    }

    #[test]
    fn prop_condition_from_any_duration(seconds in -10.0f64..100.0) {
        let condition = Condition::from_duration(seconds);
        if seconds < 1.0 {
            prop_assert_eq!(condition, Condition::Short);
        } else {
            prop_assert_eq!(condition, Condition::Long);
        }
    }

    #[test]
    fn prop_paired_test_never_panics(
        pairs in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 0..20),
    ) {
        match paired_t_test(&pairs) {
            PairedTestOutcome::Computed(test) => {
                prop_assert!(pairs.len() >= 2);
                prop_assert!(test.pvalue >= 0.0 && test.pvalue <= 1.0);
                prop_assert_eq!(test.pairs, pairs.len());
            }
            PairedTestOutcome::InsufficientData { pairs: n } => {
                prop_assert!(n < 2);
            }
        }
    }

    #[test]
    fn prop_paired_test_symmetric_under_pair_swap(
        pairs in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 2..20),
    ) {
        let swapped: Vec<(f64, f64)> = pairs.iter().map(|&(a, b)| (b, a)).collect();
        if let (PairedTestOutcome::Computed(t1), PairedTestOutcome::Computed(t2)) =
            (paired_t_test(&pairs), paired_t_test(&swapped))
        {
            // Swapping conditions negates the statistic, same p-value
            prop_assert!((t1.statistic + t2.statistic).abs() < 1e-9
                || (t1.statistic.is_infinite() && t2.statistic.is_infinite()));
            if t1.pvalue.is_finite() && t2.pvalue.is_finite() {
                prop_assert!((t1.pvalue - t2.pvalue).abs() < 1e-9);
            }
        }
    }
}
