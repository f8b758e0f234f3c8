//! The perceived-time pipeline: discretize → weigh → accumulate → locate midpoint.

pub mod accumulate;
pub mod discretize;
pub mod midpoint;
pub mod pipeline;
pub mod weight;

pub use accumulate::{accumulate, accumulate_with, pairwise_sum, CompensatedSum, Summation};
pub use discretize::discretize;
pub use midpoint::locate_midpoint;
pub use pipeline::{compute_midpoint, run_pipeline, MidpointSummary, PipelineConfig, PipelineRun};
pub use weight::weigh;
