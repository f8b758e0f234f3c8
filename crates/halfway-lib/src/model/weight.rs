use crate::series::{SampleSeries, WeightedSeries};

/// Perceived value of each slice: `step / age`, the discrete form of `dt / t`.
pub fn weigh(series: &SampleSeries) -> WeightedSeries {
    let (ages, weights) = series
        .samples
        .iter()
        .map(|s| (s.age, s.step / s.age))
        .unzip();
    WeightedSeries {
        step: series.step(),
        ages,
        weights,
    }
}
