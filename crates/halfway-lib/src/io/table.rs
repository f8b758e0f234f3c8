use crate::series::{CumulativeSeries, WeightedSeries};
use serde::{Deserialize, Serialize};

/// One exported row: a sample with its weight and running total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub index: usize,
    pub age: f64,
    pub weight: f64,
    pub cumulative: f64,
}

/// Zip parallel weighted and cumulative series into rows.
pub fn series_rows(weighted: &WeightedSeries, cumulative: &CumulativeSeries) -> Vec<SeriesRow> {
    weighted
        .ages
        .iter()
        .zip(&weighted.weights)
        .zip(&cumulative.values)
        .enumerate()
        .map(|(index, ((&age, &weight), &cumulative))| SeriesRow {
            index,
            age,
            weight,
            cumulative,
        })
        .collect()
}
