//! Wall-clock budget of one planning call

use std::time::{Duration, Instant};

use log::warn;

use crate::common::ArmPlanningError;

/// Cooperative time budget checked once per sampling iteration
#[derive(Debug, Clone, Copy)]
pub struct PlanningBudget {
    started: Instant,
    limit: Duration,
}

impl PlanningBudget {
    pub fn start(limit: Duration) -> Self {
        Self { started: Instant::now(), limit }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn is_expired(&self) -> bool {
        self.started.elapsed() > self.limit
    }

    /// `Err(Timeout)` once the budget is spent
    pub fn check(&self, planner: &'static str, num_nodes: usize) -> Result<(), ArmPlanningError> {
        if self.is_expired() {
            let elapsed = self.elapsed_secs();
            warn!("{}: timed out after {:.3} s with {} nodes", planner, elapsed, num_nodes);
            return Err(ArmPlanningError::Timeout { planner, elapsed });
        }
        Ok(())
    }
}
