//! Invariants of the perceived-time pipeline under arbitrary configurations.

use halfway_lib::model::{
    accumulate_with, discretize, locate_midpoint, pairwise_sum, run_pipeline, weigh,
    PipelineConfig, Summation,
};
use halfway_lib::{compare_resolutions, ModelError};
use proptest::prelude::*;

fn arb_summation() -> impl Strategy<Value = Summation> {
    prop_oneof![Just(Summation::Naive), Just(Summation::Compensated)]
}

proptest! {
    #[test]
    fn samples_cover_one_to_max_age(max_age in 1u32..150, resolution in 1u32..400) {
        let series = discretize(max_age, resolution).unwrap();
        let step = 1.0 / resolution as f64;
        prop_assert_eq!(series.samples[0].age, 1.0);
        prop_assert!(series.samples.last().unwrap().age <= max_age as f64);
        for w in series.samples.windows(2) {
            prop_assert!((w[1].age - w[0].age - step).abs() < 1e-9);
        }
    }

    #[test]
    fn cumulative_is_monotone_and_positive(
        max_age in 1u32..120,
        resolution in 1u32..120,
        summation in arb_summation(),
    ) {
        let weighted = weigh(&discretize(max_age, resolution).unwrap());
        prop_assert!(weighted.weights.iter().all(|&w| w > 0.0));
        let cumulative = accumulate_with(&weighted, summation);
        prop_assert_eq!(cumulative.len(), weighted.len());
        prop_assert!(cumulative.values.iter().all(|&v| v > 0.0));
        for w in cumulative.values.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn total_is_conserved(max_age in 1u32..120, resolution in 1u32..120) {
        let weighted = weigh(&discretize(max_age, resolution).unwrap());
        let total = pairwise_sum(&weighted.weights);
        let last = accumulate_with(&weighted, Summation::Compensated).total().unwrap();
        prop_assert!(((last - total) / total).abs() < 1e-9);
    }

    #[test]
    fn midpoint_is_first_crossing(max_age in 1u32..120, resolution in 1u32..120) {
        let run = run_pipeline(&PipelineConfig::new(max_age, resolution)).unwrap();
        let half = run.cumulative.total().unwrap() / 2.0;
        let mid = run.midpoint;
        prop_assert!(mid.cumulative_value >= half);
        prop_assert!(run.cumulative.values[..mid.index].iter().all(|&v| v < half));
        prop_assert!(mid.age > 1.0 && mid.age <= max_age as f64 + 1.0);
    }

    #[test]
    fn batch_keeps_order_and_length(resolutions in prop::collection::vec(0u32..50, 0..8)) {
        let entries = compare_resolutions(36, &resolutions);
        prop_assert_eq!(entries.len(), resolutions.len());
        for (entry, &resolution) in entries.iter().zip(&resolutions) {
            prop_assert_eq!(entry.resolution(), resolution);
            prop_assert_eq!(entry.midpoint().is_none(), resolution == 0);
        }
    }
}

#[test]
fn zero_parameters_are_invalid_configuration() {
    for (max_age, resolution) in [(0, 12), (81, 0), (0, 0)] {
        assert_eq!(
            halfway_lib::compute_midpoint(max_age, resolution),
            Err(ModelError::InvalidConfiguration {
                max_age,
                resolution
            })
        );
    }
}

#[test]
fn empty_cumulative_series_is_rejected() {
    let weighted = weigh(&discretize(5, 1).unwrap());
    let mut cumulative = accumulate_with(&weighted, Summation::Compensated);
    cumulative.values.clear();
    cumulative.ages.clear();
    assert_eq!(locate_midpoint(&cumulative), Err(ModelError::EmptySeries));
}
