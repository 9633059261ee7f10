//! Common traits defining interfaces for arm planners

use rand::RngCore;

use crate::common::error::ArmPlanningResult;
use crate::common::types::*;
use crate::path_planning::ConfigurationSpace;

/// Trait for planners operating in the joint-angle configuration space
/// (RRT, RRT-Connect, RRT*, PRM, straight-line interpolation)
pub trait ConfigurationSpacePlanner {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Plan a motion from `start` to `goal`.
    ///
    /// Returns `ArmPlanningError::Timeout` when the time budget runs out.
    fn plan(
        &self,
        space: &ConfigurationSpace,
        start: &Configuration,
        goal: &Configuration,
        rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<PlanOutcome>;
}
