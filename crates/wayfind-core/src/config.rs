//! Solver configuration loading and validation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::NavError;

/// Tunables for rasterization, value iteration and path extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Cell size in space units
    #[serde(default = "default_resolution")]
    pub resolution: f32,

    /// Discount factor (gamma), strictly between 0 and 1
    #[serde(default = "default_discount")]
    pub discount: f32,

    /// Multiplier applied to every move cost
    #[serde(default = "default_step_cost")]
    pub step_cost: f32,

    /// Largest per-sweep change treated as converged
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,

    /// Hard cap on value-iteration sweeps
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Clearance (in cells) below which moves are penalized
    #[serde(default = "default_safe_distance")]
    pub safe_distance: f32,

    /// Penalty per cell of missing clearance
    #[serde(default = "default_penalty_factor")]
    pub penalty_factor: f32,

    /// Ring-search radius (in cells) for snapping blocked points
    #[serde(default = "default_snap_radius")]
    pub snap_radius: usize,

    /// Hard cap on path extraction moves
    #[serde(default = "default_max_path_steps")]
    pub max_path_steps: usize,
}

fn default_resolution() -> f32 {
    10.0
}
fn default_discount() -> f32 {
    0.99
}
fn default_step_cost() -> f32 {
    1.0
}
fn default_epsilon() -> f32 {
    0.001
}
fn default_max_iterations() -> usize {
    2_000
}
fn default_safe_distance() -> f32 {
    3.0
}
fn default_penalty_factor() -> f32 {
    0.5
}
fn default_snap_radius() -> usize {
    20
}
fn default_max_path_steps() -> usize {
    10_000
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            discount: default_discount(),
            step_cost: default_step_cost(),
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            safe_distance: default_safe_distance(),
            penalty_factor: default_penalty_factor(),
            snap_radius: default_snap_radius(),
            max_path_steps: default_max_path_steps(),
        }
    }
}

impl SolverConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solver config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse solver config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.resolution > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "resolution must be > 0, got {}",
                self.resolution
            )));
        }
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(NavError::InvalidConfig(format!(
                "discount must be in (0, 1), got {}",
                self.discount
            )));
        }
        if !(self.step_cost > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "step_cost must be > 0, got {}",
                self.step_cost
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "epsilon must be > 0, got {}",
                self.epsilon
            )));
        }
        if self.safe_distance < 0.0 || self.penalty_factor < 0.0 {
            return Err(NavError::InvalidConfig(
                "safe_distance and penalty_factor must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
