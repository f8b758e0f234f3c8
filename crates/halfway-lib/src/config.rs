use crate::{
    convergence::ConvergenceComparator,
    error::ModelError,
    model::{PipelineConfig, Summation},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

fn default_max_age() -> u32 {
    81
}

fn default_resolution() -> u32 {
    12
}

fn default_resolutions() -> Vec<u32> {
    vec![1, 12, 52, 365]
}

fn default_tolerance() -> f64 {
    1e-3
}

/// Model settings as read from a TOML file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_max_age")]
    pub max_age: u32,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Resolutions for convergence comparisons, in report order.
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<u32>,
    #[serde(default)]
    pub summation: Summation,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_age: default_max_age(),
            resolution: default_resolution(),
            resolutions: default_resolutions(),
            summation: Summation::default(),
            tolerance: default_tolerance(),
        }
    }
}

impl ModelConfig {
    /// `max_age` alone; batch runs judge each resolution per entry.
    pub fn validate_max_age(&self) -> Result<(), ModelError> {
        if self.max_age == 0 {
            return Err(ModelError::InvalidConfiguration {
                max_age: self.max_age,
                resolution: self.resolution,
            });
        }
        Ok(())
    }

    /// Check the single-run parameters.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.validate_max_age()?;
        if self.resolution == 0 {
            return Err(ModelError::InvalidConfiguration {
                max_age: self.max_age,
                resolution: self.resolution,
            });
        }
        Ok(())
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            max_age: self.max_age,
            resolution: self.resolution,
            summation: self.summation,
        }
    }

    pub fn comparator(&self) -> ConvergenceComparator {
        ConvergenceComparator::new(self.summation, self.tolerance)
    }
}

pub fn parse_config(text: &str) -> Result<ModelConfig> {
    toml::from_str(text).context("parsing model config")
}

pub fn read_config(path: &Path) -> Result<ModelConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in {}", path.display()))
}
