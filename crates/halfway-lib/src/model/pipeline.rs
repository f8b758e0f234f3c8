use crate::{
    convergence::closed_form_midpoint,
    error::ModelResult,
    model::{accumulate_with, discretize, locate_midpoint, weigh, Summation},
    series::{CumulativeSeries, Midpoint, WeightedSeries},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Parameters for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Last age on the axis (years).
    pub max_age: u32,
    /// Samples per year.
    pub resolution: u32,
    pub summation: Summation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_age: 81,
            resolution: 12,
            summation: Summation::Compensated,
        }
    }
}

impl PipelineConfig {
    pub fn new(max_age: u32, resolution: u32) -> Self {
        Self {
            max_age,
            resolution,
            ..Self::default()
        }
    }
}

/// Every intermediate of a run, for callers that plot or export the series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub config: PipelineConfig,
    pub weighted: WeightedSeries,
    pub cumulative: CumulativeSeries,
    pub midpoint: Midpoint,
}

/// Compact, serializable outcome of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MidpointSummary {
    pub max_age: u32,
    pub resolution: u32,
    pub total: f64,
    pub closed_form: f64,
    pub midpoint: Midpoint,
}

impl PipelineRun {
    pub fn summary(&self) -> MidpointSummary {
        MidpointSummary {
            max_age: self.config.max_age,
            resolution: self.config.resolution,
            total: self.cumulative.total().unwrap_or(0.0),
            closed_form: closed_form_midpoint(self.config.max_age),
            midpoint: self.midpoint,
        }
    }
}

/// Run discretize → weigh → accumulate → locate for one configuration.
pub fn run_pipeline(cfg: &PipelineConfig) -> ModelResult<PipelineRun> {
    let samples = discretize(cfg.max_age, cfg.resolution)?;
    let weighted = weigh(&samples);
    let cumulative = accumulate_with(&weighted, cfg.summation);
    let midpoint = locate_midpoint(&cumulative)?;
    debug!(
        "max_age={} resolution={} samples={} midpoint age={:.4} index={}",
        cfg.max_age,
        cfg.resolution,
        samples.len(),
        midpoint.age,
        midpoint.index
    );
    Ok(PipelineRun {
        config: *cfg,
        weighted,
        cumulative,
        midpoint,
    })
}

/// Perceptual midpoint for `max_age` sampled at `resolution` per year.
pub fn compute_midpoint(max_age: u32, resolution: u32) -> ModelResult<Midpoint> {
    run_pipeline(&PipelineConfig::new(max_age, resolution)).map(|run| run.midpoint)
}
