//! arm_planning - sampling-based motion planning for a planar N-link arm
//!
//! This crate plans joint-space motions for a planar arm anchored at the
//! bottom of a 2D occupancy grid, with RRT, RRT-Connect, RRT* and PRM
//! planners sharing one configuration-space model.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod arm_navigation;
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Configuration, Plan, PlanOutcome, PlanningStats, Point2D};
pub use common::ConfigurationSpacePlanner;
pub use common::{ArmPlanningError, ArmPlanningResult};
pub use path_planning::{plan_arm_motion, PlannerConfig, PlannerKind};
pub use utils::OccupancyGrid;
