use crate::series::{CumulativeSeries, WeightedSeries};
use log::warn;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Above this many samples per year naive prefix sums start to drift measurably.
pub const NAIVE_RESOLUTION_LIMIT: u32 = 365;

const PAIRWISE_BLOCK: usize = 8;

/// Strategy for forming the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Summation {
    /// Plain left-to-right addition.
    Naive,
    /// Kahan–Babuška (Neumaier) compensated addition.
    #[default]
    Compensated,
}

/// Neumaier running sum; keeps the low-order bits lost by each addition.
#[derive(Debug, Clone, Copy)]
pub struct CompensatedSum<T> {
    sum: T,
    compensation: T,
}

impl<T: Float> CompensatedSum<T> {
    pub fn new() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
        }
    }

    pub fn add(&mut self, x: T) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation = self.compensation + ((self.sum - t) + x);
        } else {
            self.compensation = self.compensation + ((x - t) + self.sum);
        }
        self.sum = t;
    }

    pub fn value(&self) -> T {
        self.sum + self.compensation
    }
}

impl<T: Float> Default for CompensatedSum<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cascade summation; error grows with `log n` instead of `n`.
pub fn pairwise_sum<T: Float>(values: &[T]) -> T {
    if values.len() <= PAIRWISE_BLOCK {
        return values.iter().fold(T::zero(), |acc, &v| acc + v);
    }
    let (left, right) = values.split_at(values.len() / 2);
    pairwise_sum(left) + pairwise_sum(right)
}

/// Running total of the weights with the default (compensated) strategy.
pub fn accumulate(weighted: &WeightedSeries) -> CumulativeSeries {
    accumulate_with(weighted, Summation::default())
}

pub fn accumulate_with(weighted: &WeightedSeries, summation: Summation) -> CumulativeSeries {
    let values = match summation {
        Summation::Naive => {
            let resolution = (1.0 / weighted.step).round();
            if resolution > NAIVE_RESOLUTION_LIMIT as f64 {
                warn!(
                    "naive summation at resolution {} over {} samples may lose precision",
                    resolution,
                    weighted.len()
                );
            }
            weighted
                .weights
                .iter()
                .scan(0.0, |acc, &w| {
                    *acc += w;
                    Some(*acc)
                })
                .collect()
        }
        Summation::Compensated => {
            let mut acc = CompensatedSum::new();
            weighted
                .weights
                .iter()
                .map(|&w| {
                    acc.add(w);
                    acc.value()
                })
                .collect()
        }
    };
    CumulativeSeries {
        step: weighted.step,
        ages: weighted.ages.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{discretize, weigh};

    fn weighted(max_age: u32, resolution: u32) -> WeightedSeries {
        weigh(&discretize(max_age, resolution).unwrap())
    }

    #[test]
    fn annual_total_is_harmonic_number() {
        let cumulative = accumulate(&weighted(4, 1));
        let expected = [1.0, 1.5, 1.5 + 1.0 / 3.0, 1.5 + 1.0 / 3.0 + 0.25];
        for (v, e) in cumulative.values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-15);
        }
    }

    #[test]
    fn prefix_sums_non_decreasing() {
        for summation in [Summation::Naive, Summation::Compensated] {
            let cumulative = accumulate_with(&weighted(81, 365), summation);
            assert!(cumulative.values.windows(2).all(|w| w[1] >= w[0]));
        }
    }

    #[test]
    fn final_value_matches_pairwise_total() {
        let w = weighted(81, 365);
        let cumulative = accumulate(&w);
        let total = pairwise_sum(&w.weights);
        let last = cumulative.total().unwrap();
        assert!(((last - total) / total).abs() < 1e-12);
        assert_eq!(cumulative.len(), w.len());
        assert_eq!(cumulative.ages, w.ages);
    }

    #[test]
    fn compensated_sum_recovers_lost_bits() {
        let mut acc = CompensatedSum::new();
        acc.add(1.0f64);
        acc.add(1e-16);
        acc.add(1e-16);
        assert!((acc.value() - (1.0 + 2e-16)).abs() < 1e-17);
        let naive = 1.0f64 + 1e-16 + 1e-16;
        assert_eq!(naive, 1.0);
    }

    #[test]
    fn compensated_sum_works_for_f32() {
        let mut acc = CompensatedSum::<f32>::default();
        for _ in 0..10_000 {
            acc.add(0.1);
        }
        assert!((acc.value() - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn pairwise_sum_handles_small_and_empty() {
        assert_eq!(pairwise_sum::<f64>(&[]), 0.0);
        assert_eq!(pairwise_sum(&[1.0, 2.0, 3.0]), 6.0);
        let ones = vec![1.0f64; 1000];
        assert_eq!(pairwise_sum(&ones), 1000.0);
    }

    #[test]
    fn summation_deserializes_lowercase() {
        let s: Summation = serde_json::from_str("\"naive\"").unwrap();
        assert_eq!(s, Summation::Naive);
        assert_eq!(Summation::default(), Summation::Compensated);
    }
}
