//! Planner configuration.
//!
//! Every field has a serde default so partial YAML files are accepted.

use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::arm_navigation::LINK_LENGTH_CELLS;
use crate::common::{ArmPlanningError, ArmPlanningResult};

/// Tunable constants shared by all sampling-based planners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Length of every arm link, in grid cells
    pub link_length: f64,
    /// Maximum configuration-space distance of one tree-growth step (epsilon)
    pub extension_limit: f64,
    /// Wall-clock budget of one planning call, in seconds
    pub time_limit_secs: f64,
    /// Probability of sampling the goal (RRT, RRT* before the goal is reached)
    pub goal_bias: f64,
    /// Constant of the shrinking neighborhood radius `(gamma * ln n / n)^(1/D)`
    pub rewire_gamma: f64,
    /// Accepted RRT* insertions after the goal is first reached
    pub refinement_insertions: usize,
    /// Angular resolution of the straight-line interpolation planner
    pub interpolation_step: f64,
    /// Seed for the random generator used by the binary
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            link_length: LINK_LENGTH_CELLS,
            extension_limit: PI / 4.0,
            time_limit_secs: 60.0,
            goal_bias: 0.5,
            rewire_gamma: 1000.0,
            refinement_insertions: 1000,
            interpolation_step: PI / 20.0,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ArmPlanningResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> ArmPlanningResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ArmPlanningError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_time_limit(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_secs)
    }

    pub fn validate(&self) -> ArmPlanningResult<()> {
        let positive = [
            ("link_length", self.link_length),
            ("extension_limit", self.extension_limit),
            ("time_limit_secs", self.time_limit_secs),
            ("rewire_gamma", self.rewire_gamma),
            ("interpolation_step", self.interpolation_step),
        ];
        for (name, value) in positive.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(ArmPlanningError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.goal_bias) {
            return Err(ArmPlanningError::InvalidParameter(format!(
                "goal_bias must lie in [0, 1], got {}",
                self.goal_bias
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = PlannerConfig::default();
        assert_eq!(config.link_length, 10.0);
        assert_eq!(config.extension_limit, PI / 4.0);
        assert_eq!(config.time_limit(), Duration::from_secs(60));
        assert_eq!(config.goal_bias, 0.5);
        assert_eq!(config.refinement_insertions, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = PlannerConfig::from_yaml("time_limit_secs: 5.0\nseed: 42\n").unwrap();
        assert_eq!(config.time_limit_secs, 5.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.link_length, 10.0);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PlannerConfig::default().with_seed(7).with_time_limit(2.5);
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(PlannerConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(PlannerConfig::from_yaml("link_length: -1.0").is_err());
        assert!(PlannerConfig::from_yaml("goal_bias: 1.5").is_err());
        assert!(PlannerConfig::default().with_time_limit(0.0).validate().is_err());
        assert!(matches!(
            PlannerConfig::from_yaml("link_length: [1, 2]"),
            Err(ArmPlanningError::Config(_))
        ));
    }
}
