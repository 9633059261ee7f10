//! Joint-angle configuration space of the planar arm.
//!
//! Bundles the validity oracle with the metric, the angular resolution
//! used for steering, the extension limit and the samplers shared by all
//! planners.

use std::f64::consts::{SQRT_2, TAU};

use rand::RngCore;
use rand_distr::{Distribution, Uniform};

use crate::arm_navigation::ArmValidityChecker;
use crate::common::{configuration_distance, ArmPlanningError, ArmPlanningResult, Configuration};
use crate::path_planning::PlannerConfig;
use crate::utils::OccupancyGrid;

/// Number of angular steps per full turn so that one step moves the arm tip
/// by less than about one cell.
///
/// `round(2π / (2·asin(√2 / (2·L·D))))`
pub fn discretization_factor(dofs: usize, link_length: f64) -> ArmPlanningResult<u32> {
    let ratio = SQRT_2 / (2.0 * link_length * dofs as f64);
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(ArmPlanningError::InvalidParameter(format!(
            "link length {} is too short for {} joints",
            link_length, dofs
        )));
    }
    let factor = (TAU / (2.0 * ratio.asin())).round();
    Ok(factor.max(1.0) as u32)
}

/// Result of growing from one configuration toward another
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub configuration: Configuration,
    /// Distance from the origin of the extension
    pub distance: f64,
    /// False when the target was clipped to the extension limit
    pub reached_target: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigurationSpace<'a> {
    checker: ArmValidityChecker<'a>,
    dofs: usize,
    discretization_factor: u32,
    discretization_step: f64,
    extension_limit: f64,
    rewire_gamma: f64,
    angle_distribution: Uniform<f64>,
    index_distribution: Uniform<u32>,
}

impl<'a> ConfigurationSpace<'a> {
    pub fn new(grid: &'a OccupancyGrid, dofs: usize, config: &PlannerConfig) -> ArmPlanningResult<Self> {
        if dofs < 2 {
            return Err(ArmPlanningError::InvalidDofCount { dofs });
        }
        config.validate()?;

        let factor = discretization_factor(dofs, config.link_length)?;
        Ok(ConfigurationSpace {
            checker: ArmValidityChecker::new(grid, config.link_length),
            dofs,
            discretization_factor: factor,
            discretization_step: TAU / factor as f64,
            extension_limit: config.extension_limit,
            rewire_gamma: config.rewire_gamma,
            angle_distribution: Uniform::new(0.0, TAU),
            index_distribution: Uniform::new(0, factor),
        })
    }

    pub fn dofs(&self) -> usize {
        self.dofs
    }

    pub fn grid(&self) -> &'a OccupancyGrid {
        self.checker.grid()
    }

    pub fn discretization_factor(&self) -> u32 {
        self.discretization_factor
    }

    pub fn discretization_step(&self) -> f64 {
        self.discretization_step
    }

    pub fn extension_limit(&self) -> f64 {
        self.extension_limit
    }

    pub fn check_dimension(&self, configuration: &Configuration) -> ArmPlanningResult<()> {
        if configuration.len() != self.dofs {
            return Err(ArmPlanningError::DimensionMismatch {
                expected: self.dofs,
                actual: configuration.len(),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self, configuration: &Configuration) -> bool {
        self.checker.is_valid_configuration(configuration)
    }

    pub fn distance(&self, a: &Configuration, b: &Configuration) -> f64 {
        configuration_distance(a, b)
    }

    /// Check the `⌊distance / step⌋` evenly spaced points strictly after `from`
    /// on the way to `to`, and the same points walked back from `to`.
    ///
    /// Walking from both ends gives the same answer for `(from, to)` and
    /// `(to, from)`, so an edge accepted while growing a structure stays
    /// valid when a plan traverses it backwards. The endpoints are left to
    /// the caller.
    pub fn is_transition_valid(&self, from: &Configuration, to: &Configuration, distance: f64) -> bool {
        if distance <= 0.0 {
            return true;
        }
        let num_steps = (distance / self.discretization_step).floor() as usize;
        let direction = (to - from) / distance;
        (1..=num_steps).all(|i| {
            let offset = &direction * (i as f64 * self.discretization_step);
            self.is_valid(&(from + &offset)) && self.is_valid(&(to - &offset))
        })
    }

    /// Move from `from` toward `to`, at most the extension limit away
    pub fn clip_toward(&self, from: &Configuration, to: &Configuration, distance: f64) -> Extension {
        if distance > self.extension_limit {
            let configuration = from + (to - from) * (self.extension_limit / distance);
            Extension {
                distance: self.distance(from, &configuration),
                configuration,
                reached_target: false,
            }
        } else {
            Extension { configuration: to.clone(), distance, reached_target: true }
        }
    }

    /// Clip toward `to` and keep the result only if the new configuration
    /// and the transition to it are collision free.
    ///
    /// An unclipped target is assumed to have been validated already.
    pub fn extend(&self, from: &Configuration, to: &Configuration, distance: f64) -> Option<Extension> {
        let extension = self.clip_toward(from, to, distance);
        if !extension.reached_target && !self.is_valid(&extension.configuration) {
            return None;
        }
        if !self.is_transition_valid(from, &extension.configuration, extension.distance) {
            return None;
        }
        Some(extension)
    }

    /// Every joint angle drawn uniformly from `[0, 2π)`
    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> Configuration {
        Configuration::from_fn(self.dofs, |_, _| self.angle_distribution.sample(&mut *rng))
    }

    /// Every joint angle drawn from the discretized set `2π·k / factor`
    pub fn sample_discretized(&self, rng: &mut dyn RngCore) -> Configuration {
        let factor = self.discretization_factor as f64;
        Configuration::from_fn(self.dofs, |_, _| {
            TAU * self.index_distribution.sample(&mut *rng) as f64 / factor
        })
    }

    /// Uniform valid configuration, `None` after `max_attempts` rejections
    pub fn sample_valid(&self, rng: &mut dyn RngCore, max_attempts: usize) -> Option<Configuration> {
        (0..max_attempts)
            .map(|_| self.sample_uniform(&mut *rng))
            .find(|candidate| self.is_valid(candidate))
    }

    /// Shrinking connection radius `min(ε, (γ·ln n / n)^(1/D))` for a
    /// structure of `num_nodes` nodes
    pub fn neighborhood_radius(&self, num_nodes: usize) -> f64 {
        let n = num_nodes.max(1) as f64;
        let radius = (self.rewire_gamma * n.ln() / n).powf(1.0 / self.dofs as f64);
        radius.min(self.extension_limit)
    }
}
