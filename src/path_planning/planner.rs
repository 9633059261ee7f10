//! Planner selection and the single-call planning entry point

use std::fmt;

use clap::ValueEnum;
use log::{info, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::common::{
    ArmPlanningError, ArmPlanningResult, Configuration, ConfigurationSpacePlanner, PlanOutcome,
};
use crate::path_planning::{
    ConfigurationSpace, InterpolationPlanner, PRMPlanner, PlannerConfig, RRTConnectPlanner,
    RRTPlanner, RRTStarPlanner,
};
use crate::utils::OccupancyGrid;

/// Start and goal closer than this are treated as the same configuration
const AT_GOAL_TOLERANCE: f64 = 1e-9;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PlannerKind {
    #[value(name = "rrt")]
    #[serde(rename = "rrt")]
    RRT,
    #[value(name = "rrt-connect")]
    #[serde(rename = "rrt-connect")]
    RRTConnect,
    #[value(name = "rrt-star")]
    #[serde(rename = "rrt-star")]
    RRTStar,
    #[value(name = "prm")]
    #[serde(rename = "prm")]
    PRM,
    #[value(name = "interpolation")]
    #[serde(rename = "interpolation")]
    Interpolation,
}

impl PlannerKind {
    /// The sampling planners, in benchmark order
    pub const SAMPLING: [PlannerKind; 4] =
        [PlannerKind::RRT, PlannerKind::RRTConnect, PlannerKind::RRTStar, PlannerKind::PRM];

    pub fn planner(self, config: &PlannerConfig) -> Box<dyn ConfigurationSpacePlanner> {
        let config = config.clone();
        match self {
            PlannerKind::RRT => Box::new(RRTPlanner::new(config)),
            PlannerKind::RRTConnect => Box::new(RRTConnectPlanner::new(config)),
            PlannerKind::RRTStar => Box::new(RRTStarPlanner::new(config)),
            PlannerKind::PRM => Box::new(PRMPlanner::new(config)),
            PlannerKind::Interpolation => Box::new(InterpolationPlanner::new(config)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlannerKind::RRT => RRTPlanner::NAME,
            PlannerKind::RRTConnect => RRTConnectPlanner::NAME,
            PlannerKind::RRTStar => RRTStarPlanner::NAME,
            PlannerKind::PRM => PRMPlanner::NAME,
            PlannerKind::Interpolation => InterpolationPlanner::NAME,
        }
    }
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Plan an arm motion on `grid` from `start` to `goal` joint angles.
///
/// Malformed input (fewer than two joints, start and goal of different
/// lengths, invalid config) is rejected before planning. A start equal to
/// the goal yields the single-step plan `[start]`. When the planner runs
/// out of time the result is the degenerate plan `[start]` with
/// `success == false` and a negative planning time.
pub fn plan_arm_motion(
    grid: &OccupancyGrid,
    start: &[f64],
    goal: &[f64],
    kind: PlannerKind,
    config: &PlannerConfig,
    rng: &mut dyn RngCore,
) -> ArmPlanningResult<PlanOutcome> {
    if start.len() < 2 {
        return Err(ArmPlanningError::InvalidDofCount { dofs: start.len() });
    }
    if goal.len() != start.len() {
        return Err(ArmPlanningError::DimensionMismatch { expected: start.len(), actual: goal.len() });
    }
    config.validate()?;

    let space = ConfigurationSpace::new(grid, start.len(), config)?;
    let start = Configuration::from_column_slice(start);
    let goal = Configuration::from_column_slice(goal);
    if !space.is_valid(&start) {
        warn!("start configuration is in collision, planning anyway");
    }
    if !space.is_valid(&goal) {
        warn!("goal configuration is in collision, planning anyway");
    }

    let kind = if space.distance(&start, &goal) < AT_GOAL_TOLERANCE {
        info!("start equals goal, skipping {}", kind);
        PlannerKind::Interpolation
    } else {
        kind
    };

    info!("running {} planner", kind);
    match kind.planner(config).plan(&space, &start, &goal, rng) {
        Ok(outcome) => Ok(outcome),
        Err(e) if e.is_timeout() => {
            warn!("{}, returning the start configuration", e);
            Ok(PlanOutcome::degenerate(&start))
        }
        Err(e) => Err(e),
    }
}
