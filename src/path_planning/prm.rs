//! PRM (Probabilistic Road-Map) arm planner
//!
//! Construction grows an undirected roadmap from uniform valid samples,
//! linking each one to every collision-free neighbor inside the shrinking
//! connection radius, until start and goal share a component. The query is
//! a breadth-first search over the finished roadmap.

use log::{debug, info, trace};
use rand::RngCore;

use crate::common::{
    ArmPlanningError, ArmPlanningResult, Configuration, ConfigurationSpacePlanner, PlanOutcome,
};
use crate::path_planning::{ConfigurationSpace, PlannerConfig, PlanningBudget, Roadmap};

/// PRM path planner
#[derive(Debug, Clone, Default)]
pub struct PRMPlanner {
    config: PlannerConfig,
}

impl PRMPlanner {
    pub const NAME: &'static str = "PRM";

    pub fn new(config: PlannerConfig) -> Self {
        PRMPlanner { config }
    }

    /// Grow `roadmap` until start and goal are connected or the budget runs out
    fn construct(
        space: &ConfigurationSpace,
        roadmap: &mut Roadmap,
        budget: &PlanningBudget,
        rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<()> {
        loop {
            budget.check(Self::NAME, roadmap.len())?;

            let sample = space.sample_uniform(rng);
            if !space.is_valid(&sample) {
                continue;
            }

            let radius = space.neighborhood_radius(roadmap.len());
            let near = roadmap.near(&sample, radius);
            let node = roadmap.add_node(sample);
            for (neighbor, distance) in near {
                let from = &roadmap[neighbor].configuration;
                if space.is_transition_valid(from, &roadmap[node].configuration, distance) {
                    roadmap.connect(node, neighbor);
                }
            }
            trace!("{}: node {} has {} edges", Self::NAME, node.0, roadmap[node].neighbors.len());

            if roadmap.propagate_connectivity(node) {
                debug!("{}: start and goal connected with {} nodes", Self::NAME, roadmap.len());
                return Ok(());
            }
        }
    }
}

impl ConfigurationSpacePlanner for PRMPlanner {
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

        let mut roadmap = Roadmap::new(start.clone(), goal.clone());
        Self::construct(space, &mut roadmap, &budget, rng)?;

        let plan = roadmap.shortest_path().ok_or_else(|| {
            ArmPlanningError::Planning("roadmap reports start and goal connected but no path exists".to_string())
        })?;
        let outcome = PlanOutcome::found(plan, budget.elapsed_secs(), roadmap.len());
        info!(
            "{}: plan of {} steps from {} nodes, quality {:.3}",
            Self::NAME,
            outcome.stats.plan_length,
            outcome.stats.num_nodes,
            outcome.stats.plan_quality
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::test_support::*;
    use crate::utils::OccupancyGrid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_prm_finds_plan_in_empty_grid() {
        let grid = OccupancyGrid::empty(20, 20);
        let config = PlannerConfig::default().with_time_limit(20.0);
        let space = ConfigurationSpace::new(&grid, 2, &config).unwrap();
        let (start, goal) = free_space_pair();
        let mut rng = StdRng::seed_from_u64(17);

        let outcome = PRMPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap();
        assert!(outcome.success);
        assert!(outcome.plan.len() > 1);
        assert_eq!(outcome.plan.first(), Some(&start));
        assert_eq!(outcome.plan.last(), Some(&goal));
        assert!(outcome.stats.num_nodes >= outcome.plan.len());
        assert_plan_collision_free(&space, &outcome.plan);
    }

    #[test]
    fn test_prm_plans_around_obstacle() {
        let (grid, start, goal) = walled_instance();
        let config = PlannerConfig::default().with_time_limit(30.0);
        let space = ConfigurationSpace::new(&grid, 3, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = PRMPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap();
        assert_eq!(outcome.plan.first(), Some(&start));
        assert_eq!(outcome.plan.last(), Some(&goal));
        assert_plan_collision_free(&space, &outcome.plan);
    }

    #[test]
    fn test_construction_leaves_start_and_goal_flagged() {
        let grid = OccupancyGrid::empty(20, 20);
        let config = PlannerConfig::default().with_time_limit(20.0);
        let space = ConfigurationSpace::new(&grid, 2, &config).unwrap();
        let (start, goal) = free_space_pair();
        let mut roadmap = Roadmap::new(start, goal);
        let budget = PlanningBudget::start(config.time_limit());
        let mut rng = StdRng::seed_from_u64(2);

        PRMPlanner::construct(&space, &mut roadmap, &budget, &mut rng).unwrap();
        assert!(roadmap[roadmap.start()].connected_to_goal);
        assert!(roadmap[roadmap.goal()].connected_to_start);
        assert!(roadmap.shortest_path().is_some());
    }

    #[test]
    fn test_prm_times_out_on_full_grid() {
        let grid = OccupancyGrid::filled(20, 20);
        let config = PlannerConfig::default().with_time_limit(0.2);
        let space = ConfigurationSpace::new(&grid, 2, &config).unwrap();
        let (start, goal) = free_space_pair();
        let mut rng = StdRng::seed_from_u64(0);

        let err = PRMPlanner::new(config).plan(&space, &start, &goal, &mut rng).unwrap_err();
        assert!(err.is_timeout());
    }
}
