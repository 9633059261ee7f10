//! RRT-Connect bidirectional arm planner
//!
//! Two trees, rooted at the start and at the goal, take turns extending
//! toward a random sample drawn from the discretized angle set. After every
//! successful extension the other tree greedily steps toward the new node
//! until the gap closes or a step collides.

use log::{debug, info, trace};
use rand::RngCore;

use crate::common::{
    ArmPlanningResult, Configuration, ConfigurationSpacePlanner, Plan, PlanOutcome,
};
use crate::path_planning::{ConfigurationSpace, NodeId, PlannerConfig, PlanningBudget, Tree};

const START_TREE: usize = 0;
const GOAL_TREE: usize = 1;

/// RRT-Connect path planner
#[derive(Debug, Clone, Default)]
pub struct RRTConnectPlanner {
    config: PlannerConfig,
}

impl RRTConnectPlanner {
    pub const NAME: &'static str = "RRTConnect";

    pub fn new(config: PlannerConfig) -> Self {
        RRTConnectPlanner { config }
    }

    /// Step from the nearest node of `tree` toward `target` in
    /// extension-limit increments. Returns the node that ends within one
    /// collision-free step of `target`, or `None` when a step collides.
    fn connect(space: &ConfigurationSpace, tree: &mut Tree, target: &Configuration) -> Option<NodeId> {
        let (mut node, mut distance) = tree.nearest(target);
        while distance > space.extension_limit() {
            let extension = space.extend(&tree[node].configuration, target, distance)?;
            node = tree.add_child(node, extension.configuration, 0.0);
            distance = space.distance(&tree[node].configuration, target);
        }
        if space.is_transition_valid(&tree[node].configuration, target, distance) {
            Some(node)
        } else {
            None
        }
    }

    /// Start-tree branch root to junction, then goal-tree branch junction to
    /// root. A goal-side junction equal to the start-side one appears once.
    fn join(trees: &[Tree; 2], start_side: NodeId, goal_side: NodeId) -> Plan {
        let mut plan = trees[START_TREE].path_from_root(start_side);
        let mut goal_branch = trees[GOAL_TREE].branch_to_root(goal_side).into_iter().peekable();
        if goal_branch.peek() == plan.last() {
            goal_branch.next();
        }
        for configuration in goal_branch {
            plan.push(configuration);
        }
        plan
    }
}

impl ConfigurationSpacePlanner for RRTConnectPlanner {
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

        let mut trees = [Tree::new(start.clone()), Tree::new(goal.clone())];
        let mut current = START_TREE;
        loop {
            budget.check(Self::NAME, trees[0].len() + trees[1].len())?;

            let sample = space.sample_discretized(rng);
            if !space.is_valid(&sample) {
                continue;
            }

            let (nearest, distance) = trees[current].nearest(&sample);
            // a sample already in the tree adds nothing
            let added = space
                .extend(&trees[current][nearest].configuration, &sample, distance)
                .filter(|extension| extension.distance > 0.0)
                .map(|extension| trees[current].add_child(nearest, extension.configuration, 0.0));

            let extended = current;
            current = 1 - current;

            let new_node = match added {
                Some(node) => node,
                None => continue,
            };
            trace!("{}: tree {} grew node {}", Self::NAME, extended, new_node.0);

            let target = trees[extended][new_node].configuration.clone();
            if let Some(junction) = Self::connect(space, &mut trees[current], &target) {
                let (start_side, goal_side) = if current == START_TREE {
                    (junction, new_node)
                } else {
                    (new_node, junction)
                };
                let plan = Self::join(&trees, start_side, goal_side);
                let num_nodes = trees[0].len() + trees[1].len();
                let outcome = PlanOutcome::found(plan, budget.elapsed_secs(), num_nodes);
                debug!("{}: trees connected after {:.3} s", Self::NAME, outcome.stats.planning_time);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::test_support::*;
    use crate::utils::OccupancyGrid;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rrt_connect_finds_plan_in_empty_grid() {
        let grid = OccupancyGrid::empty(20, 20);
        let config = PlannerConfig::default().with_time_limit(20.0);
        let space = ConfigurationSpace::new(&grid, 2, &config).unwrap();
        let (start, goal) = free_space_pair();
        let mut rng = StdRng::seed_from_u64(21);

        let outcome = RRTConnectPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap();
        assert!(outcome.plan.len() > 1);
        assert_eq!(outcome.plan.first(), Some(&start));
        assert_eq!(outcome.plan.last(), Some(&goal));
        assert!(outcome.stats.num_nodes >= outcome.plan.len());
        assert_plan_collision_free(&space, &outcome.plan);
    }

    #[test]
    fn test_rrt_connect_plans_around_obstacle() {
        let (grid, start, goal) = walled_instance();
        let config = PlannerConfig::default().with_time_limit(30.0);
        let space = ConfigurationSpace::new(&grid, 3, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let outcome = RRTConnectPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap();
        assert_eq!(outcome.plan.first(), Some(&start));
        assert_eq!(outcome.plan.last(), Some(&goal));
        assert_plan_collision_free(&space, &outcome.plan);
    }

    #[test]
    fn test_rrt_connect_times_out_on_full_grid() {
        let grid = OccupancyGrid::filled(20, 20);
        let config = PlannerConfig::default().with_time_limit(0.2);
        let space = ConfigurationSpace::new(&grid, 2, &config).unwrap();
        let (start, goal) = free_space_pair();
        let mut rng = StdRng::seed_from_u64(0);

        let err = RRTConnectPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_connect_closes_gap_in_free_space() {
        let grid = OccupancyGrid::empty(40, 40);
        let space = ConfigurationSpace::new(&grid, 2, &PlannerConfig::default()).unwrap();
        let (start, _) = free_space_pair();
        // sweep the second link two full steps plus a remainder
        let target = Configuration::from_vec(vec![start[0], start[1] + 2.0 * space.extension_limit() + 0.1]);
        let mut tree = Tree::new(start);

        let junction = RRTConnectPlanner::connect(&space, &mut tree, &target).unwrap();
        assert_eq!(tree.len(), 3);
        assert!(space.distance(&tree[junction].configuration, &target) <= space.extension_limit());
    }

    #[test]
    fn test_join_orders_start_to_goal() {
        let q = |a: f64| Configuration::from_vec(vec![a, a]);
        let mut start_tree = Tree::new(q(0.0));
        let s1 = start_tree.add_child(start_tree.root(), q(1.0), 0.0);
        let mut goal_tree = Tree::new(q(4.0));
        let g1 = goal_tree.add_child(goal_tree.root(), q(3.0), 0.0);
        let g2 = goal_tree.add_child(g1, q(2.0), 0.0);

        let plan = RRTConnectPlanner::join(&[start_tree, goal_tree], s1, g2);
        assert_eq!(plan.configurations, vec![q(0.0), q(1.0), q(2.0), q(3.0), q(4.0)]);
    }

    #[test]
    fn test_join_drops_repeated_junction() {
        let q = |a: f64| Configuration::from_vec(vec![a, a]);
        let mut start_tree = Tree::new(q(0.0));
        let s1 = start_tree.add_child(start_tree.root(), q(1.0), 0.0);
        let mut goal_tree = Tree::new(q(3.0));
        let g1 = goal_tree.add_child(goal_tree.root(), q(1.0), 0.0);

        let plan = RRTConnectPlanner::join(&[start_tree, goal_tree], s1, g1);
        assert_eq!(plan.configurations, vec![q(0.0), q(1.0), q(3.0)]);
    }

    #[test]
    fn test_plans_traverse_goal_tree_safely_on_cluttered_grid() {
        let grid = cluttered_grid();
        let config = PlannerConfig::default().with_time_limit(20.0);
        let space = ConfigurationSpace::new(&grid, CLUTTERED_DOFS, &config).unwrap();
        let planner = RRTConnectPlanner::new(config);

        for seed in 0..6 {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = space.sample_valid(&mut rng, 10_000).unwrap();
            let goal = space.sample_valid(&mut rng, 10_000).unwrap();
            let outcome = planner.plan(&space, &start, &goal, &mut rng).unwrap();
            assert_eq!(outcome.plan.last(), Some(&goal));
            assert_plan_collision_free(&space, &outcome.plan);
            for (a, b) in outcome.plan.iter().tuple_windows() {
                assert_ne!(a, b);
            }
        }
    }
}
