//! Drive the pipeline across resolutions and compare against the continuous limit.
//!
//! With accrual starting at age 1, `∫₁ᴸ dt/t = ln L`, and half of that is reached
//! at `M = √L`. Finer sampling should walk the discrete midpoint toward `√L`.

use crate::{
    error::ModelError,
    model::{run_pipeline, PipelineConfig, Summation},
    series::Midpoint,
};
use log::warn;
use serde::{Serialize, Serializer};

/// Closed-form midpoint of the continuous model.
pub fn closed_form_midpoint(max_age: u32) -> f64 {
    (max_age as f64).sqrt()
}

/// Result of one resolution in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolutionOutcome {
    Solved {
        resolution: u32,
        age: f64,
        sample_age: f64,
        index: usize,
        cumulative_value: f64,
        abs_error: f64,
    },
    Failed {
        resolution: u32,
        #[serde(serialize_with = "error_message")]
        error: ModelError,
    },
}

fn error_message<S: Serializer>(error: &ModelError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl ResolutionOutcome {
    pub fn resolution(&self) -> u32 {
        match self {
            Self::Solved { resolution, .. } | Self::Failed { resolution, .. } => *resolution,
        }
    }

    pub fn midpoint(&self) -> Option<Midpoint> {
        match *self {
            Self::Solved {
                age,
                sample_age,
                index,
                cumulative_value,
                ..
            } => Some(Midpoint {
                age,
                sample_age,
                index,
                cumulative_value,
            }),
            Self::Failed { .. } => None,
        }
    }

    pub fn abs_error(&self) -> Option<f64> {
        match self {
            Self::Solved { abs_error, .. } => Some(*abs_error),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ModelError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Solved { .. } => None,
        }
    }
}

/// Batch outcome, entries in the order the resolutions were given.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceReport {
    pub max_age: u32,
    pub closed_form: f64,
    pub converging: bool,
    pub entries: Vec<ResolutionOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceComparator {
    pub summation: Summation,
    /// Errors at or below this count as converged even if they stop shrinking.
    pub tolerance: f64,
}

impl Default for ConvergenceComparator {
    fn default() -> Self {
        Self {
            summation: Summation::Compensated,
            tolerance: 1e-3,
        }
    }
}

impl ConvergenceComparator {
    pub fn new(summation: Summation, tolerance: f64) -> Self {
        Self {
            summation,
            tolerance,
        }
    }

    /// Run each resolution in order. A failing resolution is recorded, never fatal.
    pub fn run(&self, max_age: u32, resolutions: &[u32]) -> Vec<ResolutionOutcome> {
        let target = closed_form_midpoint(max_age);
        resolutions
            .iter()
            .map(|&resolution| {
                let cfg = PipelineConfig {
                    max_age,
                    resolution,
                    summation: self.summation,
                };
                match run_pipeline(&cfg) {
                    Ok(run) => ResolutionOutcome::Solved {
                        resolution,
                        age: run.midpoint.age,
                        sample_age: run.midpoint.sample_age,
                        index: run.midpoint.index,
                        cumulative_value: run.midpoint.cumulative_value,
                        abs_error: (run.midpoint.age - target).abs(),
                    },
                    Err(error) => {
                        warn!("resolution {} failed: {}", resolution, error);
                        ResolutionOutcome::Failed { resolution, error }
                    }
                }
            })
            .collect()
    }

    pub fn compare(&self, max_age: u32, resolutions: &[u32]) -> ConvergenceReport {
        let entries = self.run(max_age, resolutions);
        ConvergenceReport {
            max_age,
            closed_form: closed_form_midpoint(max_age),
            converging: self.is_converging(&entries),
            entries,
        }
    }

    /// True when, ordered by resolution, each solved error is strictly smaller
    /// than the previous one or already within tolerance.
    pub fn is_converging(&self, entries: &[ResolutionOutcome]) -> bool {
        let mut solved: Vec<(u32, f64)> = entries
            .iter()
            .filter_map(|e| e.abs_error().map(|err| (e.resolution(), err)))
            .collect();
        if solved.is_empty() {
            return false;
        }
        solved.sort_by_key(|&(resolution, _)| resolution);
        solved
            .windows(2)
            .all(|w| w[1].1 < w[0].1 || w[1].1 <= self.tolerance)
    }
}

/// Run the pipeline once per resolution with default settings.
pub fn compare_resolutions(max_age: u32, resolutions: &[u32]) -> Vec<ResolutionOutcome> {
    ConvergenceComparator::default().run(max_age, resolutions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_form_is_square_root() {
        assert_eq!(closed_form_midpoint(81), 9.0);
        assert_eq!(closed_form_midpoint(1), 1.0);
    }

    #[test]
    fn error_strictly_shrinks_toward_nine() {
        let entries = compare_resolutions(81, &[1, 12, 52, 365]);
        let errors: Vec<f64> = entries.iter().filter_map(|e| e.abs_error()).collect();
        assert_eq!(errors.len(), 4);
        assert!(errors.windows(2).all(|w| w[1] < w[0]), "{:?}", errors);
        assert!(errors[3] < 0.01);
        assert!(ConvergenceComparator::default().is_converging(&entries));
    }

    #[test]
    fn preserves_input_order() {
        let entries = compare_resolutions(81, &[1, 12, 365]);
        let order: Vec<u32> = entries.iter().map(|e| e.resolution()).collect();
        assert_eq!(order, vec![1, 12, 365]);
        assert!(entries.iter().all(|e| e.midpoint().is_some()));
    }

    #[test]
    fn failed_resolution_does_not_abort_batch() {
        let entries = compare_resolutions(81, &[12, 0, 52]);
        assert_eq!(entries.len(), 3);
        assert!(entries[0].midpoint().is_some());
        assert!(matches!(
            entries[1].error(),
            Some(ModelError::InvalidConfiguration { resolution: 0, .. })
        ));
        assert!(entries[2].midpoint().is_some());
    }

    #[test]
    fn unordered_input_is_judged_by_resolution() {
        let comparator = ConvergenceComparator::default();
        let report = comparator.compare(81, &[365, 1, 52, 12]);
        assert!(report.converging);
        assert_eq!(report.entries[0].resolution(), 365);
    }

    #[test]
    fn all_failures_are_not_converging() {
        let report = ConvergenceComparator::default().compare(0, &[1, 12]);
        assert!(!report.converging);
        assert!(report.entries.iter().all(|e| e.error().is_some()));
    }

    #[test]
    fn stalled_errors_within_tolerance_still_converge() {
        let comparator = ConvergenceComparator::new(Summation::Compensated, 0.05);
        let entries = vec![
            ResolutionOutcome::Solved {
                resolution: 52,
                age: 8.98,
                sample_age: 8.96,
                index: 414,
                cumulative_value: 2.2,
                abs_error: 0.02,
            },
            ResolutionOutcome::Solved {
                resolution: 104,
                age: 8.98,
                sample_age: 8.96,
                index: 828,
                cumulative_value: 2.2,
                abs_error: 0.02,
            },
        ];
        assert!(comparator.is_converging(&entries));
        assert!(!ConvergenceComparator::default().is_converging(&entries));
    }

    #[test]
    fn serializes_solved_and_failed_entries() {
        let entries = compare_resolutions(81, &[1, 0]);
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["resolution"], 1);
        assert_eq!(json[0]["index"], 6);
        assert_eq!(json[0]["age"], 8.0);
        assert_eq!(json[0]["sample_age"], 7.0);
        assert_eq!(json[1]["resolution"], 0);
        assert!(json[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid configuration"));
    }
}
