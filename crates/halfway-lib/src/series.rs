use serde::{Deserialize, Serialize};

/// One slice of the age axis: starts at `age` and lasts `step` years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub age: f64,
    pub step: f64,
}

impl Sample {
    /// Age at which this slice has been fully lived.
    pub fn end(&self) -> f64 {
        self.age + self.step
    }
}

/// Uniformly spaced samples over `[1, max_age]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSeries {
    pub max_age: u32,
    /// Samples per year
    pub resolution: u32,
    pub samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn step(&self) -> f64 {
        1.0 / self.resolution.max(1) as f64
    }
}

/// Perceived value of each slice, parallel to a [`SampleSeries`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedSeries {
    pub step: f64,
    pub ages: Vec<f64>,
    pub weights: Vec<f64>,
}

impl WeightedSeries {
    pub fn len(&self) -> usize {
        self.weights.len()
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Running total of perceived value, parallel to a [`WeightedSeries`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeSeries {
    pub step: f64,
    pub ages: Vec<f64>,
    pub values: Vec<f64>,
}

impl CumulativeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn total(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// First point at which half of the total perceived value has accrued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Midpoint {
    /// Age (years) by which the crossing slice has been lived.
    pub age: f64,
    /// Start of the crossing slice, i.e. the sample's own age.
    pub sample_age: f64,
    pub index: usize,
    pub cumulative_value: f64,
}
