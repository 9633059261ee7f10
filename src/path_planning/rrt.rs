//! RRT (Rapidly-exploring Random Tree) arm planner
//!
//! Grows a single tree from the start configuration. Half of the samples
//! (by default) are the goal itself; the search ends as soon as a goal
//! sample is inserted unclipped.

use log::{debug, info, trace};
use rand::RngCore;
use rand_distr::{Bernoulli, Distribution};

use crate::common::{
    ArmPlanningError, ArmPlanningResult, Configuration, ConfigurationSpacePlanner, PlanOutcome,
};
use crate::path_planning::{ConfigurationSpace, PlannerConfig, PlanningBudget, Tree};

pub(crate) fn goal_coin(goal_bias: f64) -> ArmPlanningResult<Bernoulli> {
    Bernoulli::new(goal_bias)
        .map_err(|e| ArmPlanningError::InvalidParameter(format!("goal_bias: {}", e)))
}

/// RRT path planner
#[derive(Debug, Clone, Default)]
pub struct RRTPlanner {
    config: PlannerConfig,
}

impl RRTPlanner {
    pub const NAME: &'static str = "RRT";

    pub fn new(config: PlannerConfig) -> Self {
        RRTPlanner { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

impl ConfigurationSpacePlanner for RRTPlanner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn plan(
        &self,
        space: &ConfigurationSpace,
        start: &Configuration,
        goal: &Configuration,
        rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<PlanOutcome> {
        space.check_dimension(start)?;
        space.check_dimension(goal)?;
        let coin = goal_coin(self.config.goal_bias)?;
        let budget = PlanningBudget::start(self.config.time_limit());
        info!("{}: planning with {} DOF", Self::NAME, space.dofs());

        let mut tree = Tree::new(start.clone());
        loop {
            budget.check(Self::NAME, tree.len())?;

            let goal_sample = coin.sample(rng);
            let sample = if goal_sample { goal.clone() } else { space.sample_uniform(rng) };
            if !space.is_valid(&sample) {
                continue;
            }

            let (nearest, distance) = tree.nearest(&sample);
            let extension = match space.extend(&tree[nearest].configuration, &sample, distance) {
                Some(extension) => extension,
                None => continue,
            };
            let reached_goal = goal_sample && extension.reached_target;
            let node = tree.add_child(nearest, extension.configuration, 0.0);
            trace!("{}: added node {} at depth {}", Self::NAME, node.0, tree[node].depth);

            if reached_goal {
                let plan = tree.path_from_root(node);
                let outcome = PlanOutcome::found(plan, budget.elapsed_secs(), tree.len());
                debug!("{}: goal inserted after {:.3} s", Self::NAME, outcome.stats.planning_time);
                info!(
                    "{}: plan of {} steps from {} nodes, quality {:.3}",
                    Self::NAME,
                    outcome.stats.plan_length,
                    outcome.stats.num_nodes,
                    outcome.stats.plan_quality
                );
                return Ok(outcome);
            }
        }
    }
}
