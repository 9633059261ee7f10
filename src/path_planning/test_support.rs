//! Shared planning instances for the planner tests

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use itertools::Itertools;

use crate::common::{Configuration, Plan};
use crate::path_planning::ConfigurationSpace;
use crate::utils::OccupancyGrid;

/// Two valid 2-DOF configurations on an empty 20x20 grid. The straight
/// joint-space line between them swings the tip out of the top of the
/// grid, so planners have to bend the first link.
pub fn free_space_pair() -> (Configuration, Configuration) {
    (
        Configuration::from_vec(vec![FRAC_PI_2, FRAC_PI_4]),
        Configuration::from_vec(vec![FRAC_PI_2, 3.0 * FRAC_PI_4]),
    )
}

/// 50x50 grid with a block above the base and a 3-DOF arm that has to
/// move from leaning left to leaning right without touching it
pub fn walled_instance() -> (OccupancyGrid, Configuration, Configuration) {
    let grid = OccupancyGrid::empty(50, 50).with_obstacle(23, 26, 27, 29);
    let start = Configuration::from_element(3, 3.0 * FRAC_PI_4);
    let goal = Configuration::from_element(3, FRAC_PI_4);
    (grid, start, goal)
}

/// Joint count used with [`cluttered_grid`]
pub const CLUTTERED_DOFS: usize = 4;

/// 60x60 grid with three blocks spread around the reach of a 4-DOF arm
pub fn cluttered_grid() -> OccupancyGrid {
    OccupancyGrid::empty(60, 60)
        .with_obstacle(10, 20, 16, 26)
        .with_obstacle(42, 18, 48, 24)
        .with_obstacle(26, 34, 34, 38)
}

/// Every configuration is valid and every consecutive pair passes the
/// steering check at the planning resolution
pub fn assert_plan_collision_free(space: &ConfigurationSpace, plan: &Plan) {
    for (i, configuration) in plan.iter().enumerate() {
        assert!(space.is_valid(configuration), "configuration {} is in collision", i);
    }
    for (i, (from, to)) in plan.iter().tuple_windows().enumerate() {
        let distance = space.distance(from, to);
        assert!(space.is_transition_valid(from, to, distance), "segment {} is in collision", i);
    }
}
