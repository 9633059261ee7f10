//! Straight-line joint interpolation
//!
//! Moves every joint linearly from start to goal at a fixed angular
//! resolution without looking at obstacles. Also serves as the
//! already-at-goal short-circuit for the sampling planners.

use log::{info, warn};
use rand::RngCore;

use crate::common::{
    ArmPlanningResult, Configuration, ConfigurationSpacePlanner, Plan, PlanOutcome,
};
use crate::path_planning::{ConfigurationSpace, PlannerConfig, PlanningBudget};

/// Straight-line interpolation planner
#[derive(Debug, Clone, Default)]
pub struct InterpolationPlanner {
    config: PlannerConfig,
}

impl InterpolationPlanner {
    pub const NAME: &'static str = "Interpolation";

    pub fn new(config: PlannerConfig) -> Self {
        InterpolationPlanner { config }
    }

    /// Number of interpolated configurations, `⌊max_j |goal_j - start_j| / step⌋`
    pub fn num_samples(&self, start: &Configuration, goal: &Configuration) -> usize {
        let largest_move = (goal - start).amax();
        (largest_move / self.config.interpolation_step).floor() as usize
    }

    /// Evenly spaced configurations from `start` to `goal` inclusive, or
    /// `[start]` when fewer than two samples are needed
    pub fn interpolate(&self, start: &Configuration, goal: &Configuration) -> Plan {
        let num_samples = self.num_samples(start, goal);
        if num_samples < 2 {
            return Plan::stationary(start);
        }
        let delta = goal - start;
        let last = (num_samples - 1) as f64;
        Plan::from_configurations(
            (0..num_samples)
                .map(|i| start + &delta * (i as f64 / last))
                .collect(),
        )
    }
}

impl ConfigurationSpacePlanner for InterpolationPlanner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn plan(
        &self,
        space: &ConfigurationSpace,
        start: &Configuration,
        goal: &Configuration,
        _rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<PlanOutcome> {
        space.check_dimension(start)?;
        space.check_dimension(goal)?;
        let budget = PlanningBudget::start(self.config.time_limit());

        let plan = self.interpolate(start, goal);
        if plan.len() == 1 {
            info!("{}: arm is already at the goal", Self::NAME);
        }
        for (i, configuration) in plan.iter().enumerate() {
            if !space.is_valid(configuration) {
                warn!("{}: configuration {} of the plan is in collision", Self::NAME, i);
            }
        }

        let num_nodes = plan.len();
        Ok(PlanOutcome::found(plan, budget.elapsed_secs(), num_nodes))
    }
}
