//! RRT* arm planner
//!
//! Like RRT, but every new node picks the cheapest collision-free parent in
//! a shrinking neighborhood and then offers itself as a cheaper parent to
//! the rest of that neighborhood (rewiring). Reaching the goal does not stop
//! the search: goal biasing is switched off and a fixed number of further
//! insertions refine the tree before the plan is extracted.

use log::{debug, info, trace};
use rand::RngCore;
use rand_distr::Distribution;

use crate::common::{
    ArmPlanningResult, Configuration, ConfigurationSpacePlanner, PlanOutcome,
};
use crate::path_planning::rrt::goal_coin;
use crate::path_planning::{ConfigurationSpace, NodeId, PlannerConfig, PlanningBudget, Tree};

/// RRT* path planner
#[derive(Debug, Clone, Default)]
pub struct RRTStarPlanner {
    config: PlannerConfig,
}

impl RRTStarPlanner {
    pub const NAME: &'static str = "RRTStar";

    pub fn new(config: PlannerConfig) -> Self {
        RRTStarPlanner { config }
    }

    /// Insert `configuration` under its cheapest collision-free parent among
    /// `nearest` and `near`, then rewire the remaining neighbors through it.
    ///
    /// `nearest_distance` must already be known to be collision free.
    fn insert_and_rewire(
        space: &ConfigurationSpace,
        tree: &mut Tree,
        configuration: Configuration,
        nearest: NodeId,
        nearest_distance: f64,
        near: &[(NodeId, f64)],
    ) -> NodeId {
        let mut parent = nearest;
        let mut min_cost = tree[nearest].cost + nearest_distance;

        let obstacle_free: Vec<bool> = near
            .iter()
            .map(|&(id, distance)| {
                space.is_transition_valid(&tree[id].configuration, &configuration, distance)
            })
            .collect();
        for (&(id, distance), &free) in near.iter().zip(obstacle_free.iter()) {
            if !free {
                continue;
            }
            let cost = tree[id].cost + distance;
            if cost < min_cost {
                parent = id;
                min_cost = cost;
            }
        }

        let node = tree.add_child(parent, configuration, min_cost);

        for (&(id, distance), &free) in near.iter().zip(obstacle_free.iter()) {
            if id == parent || !free {
                continue;
            }
            let cost = min_cost + distance;
            if cost < tree[id].cost {
                trace!("{}: rewired node {} through {}", Self::NAME, id.0, node.0);
                tree.reparent(id, node, cost);
            }
        }
        node
    }

    /// Grow the tree until the refinement countdown after first reaching
    /// the goal runs out, or the budget does. Returns the tree and the
    /// remembered goal node.
    fn grow(
        &self,
        space: &ConfigurationSpace,
        start: &Configuration,
        goal: &Configuration,
        budget: &PlanningBudget,
        rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<(Tree, NodeId)> {
        let coin = goal_coin(self.config.goal_bias)?;
        let mut tree = Tree::new(start.clone());
        // goal node and insertions left once the goal has been reached
        let mut refining: Option<(NodeId, usize)> = None;
        loop {
            if let Some((goal_node, _)) = refining {
                if budget.is_expired() {
                    debug!("{}: time budget spent during refinement", Self::NAME);
                    return Ok((tree, goal_node));
                }
            }
            budget.check(Self::NAME, tree.len())?;

            let goal_sample = refining.is_none() && coin.sample(rng);
            let sample = if goal_sample { goal.clone() } else { space.sample_uniform(rng) };
            if !space.is_valid(&sample) {
                continue;
            }

            let radius = space.neighborhood_radius(tree.len());
            let hood = tree.neighborhood(&sample, radius);
            let extension =
                match space.extend(&tree[hood.nearest].configuration, &sample, hood.nearest_distance) {
                    Some(extension) => extension,
                    None => continue,
                };
            let reached_goal = goal_sample && extension.reached_target;
            // neighbors are gathered around the sample, distances are to the inserted node
            let near: Vec<(NodeId, f64)> = hood
                .near
                .iter()
                .map(|&(id, _)| (id, space.distance(&tree[id].configuration, &extension.configuration)))
                .collect();

            let node = Self::insert_and_rewire(
                space,
                &mut tree,
                extension.configuration,
                hood.nearest,
                extension.distance,
                &near,
            );

            if let Some((goal_node, remaining)) = refining.as_mut() {
                *remaining -= 1;
                if *remaining == 0 {
                    return Ok((tree, *goal_node));
                }
            } else if reached_goal {
                debug!(
                    "{}: goal reached with cost {:.3}, refining for {} insertions",
                    Self::NAME,
                    tree[node].cost,
                    self.config.refinement_insertions
                );
                if self.config.refinement_insertions == 0 {
                    return Ok((tree, node));
                }
                refining = Some((node, self.config.refinement_insertions));
            }
        }
    }
}

impl ConfigurationSpacePlanner for RRTStarPlanner {
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
        let budget = PlanningBudget::start(self.config.time_limit());
        info!("{}: planning with {} DOF", Self::NAME, space.dofs());

        let (tree, goal_node) = self.grow(space, start, goal, &budget, rng)?;
        let plan = tree.path_from_root(goal_node);
        let outcome = PlanOutcome::found(plan, budget.elapsed_secs(), tree.len());
        info!(
            "{}: plan of {} steps from {} nodes, cost {:.3}",
            Self::NAME,
            outcome.stats.plan_length,
            outcome.stats.num_nodes,
            tree[goal_node].cost
        );
        Ok(outcome)
    }
}
