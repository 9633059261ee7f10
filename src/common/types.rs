//! Common types used throughout arm_planning

use itertools::Itertools;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// 2D point representation (workspace / grid coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Joint-angle vector of the arm, one entry per DOF, in radians
pub type Configuration = DVector<f64>;

/// Euclidean distance between two configurations.
///
/// Angles are compared as plain reals: no wrap-around at 2π.
pub fn configuration_distance(a: &Configuration, b: &Configuration) -> f64 {
    (a - b).norm()
}

/// Sequence of configurations from start to goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub configurations: Vec<Configuration>,
}

impl Plan {
    pub fn new() -> Self {
        Self { configurations: Vec::new() }
    }

    pub fn from_configurations(configurations: Vec<Configuration>) -> Self {
        Self { configurations }
    }

    /// One-step plan holding only `start`
    pub fn stationary(start: &Configuration) -> Self {
        Self { configurations: vec![start.clone()] }
    }

    pub fn push(&mut self, configuration: Configuration) {
        self.configurations.push(configuration);
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn first(&self) -> Option<&Configuration> {
        self.configurations.first()
    }

    pub fn last(&self) -> Option<&Configuration> {
        self.configurations.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.configurations.iter()
    }

    /// Summed configuration-space length of all plan segments ("plan quality")
    pub fn total_length(&self) -> f64 {
        self.configurations
            .iter()
            .tuple_windows()
            .map(|(a, b)| configuration_distance(a, b))
            .sum()
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call statistics reported by every planner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningStats {
    /// Wall-clock planning time in seconds, negative when the call timed out
    pub planning_time: f64,
    /// Number of nodes created across all trees or roadmaps
    pub num_nodes: usize,
    pub plan_length: usize,
    pub plan_quality: f64,
}

impl PlanningStats {
    pub fn new(planning_time: f64, num_nodes: usize, plan: &Plan) -> Self {
        Self {
            planning_time,
            num_nodes,
            plan_length: plan.len(),
            plan_quality: plan.total_length(),
        }
    }

    /// Sentinel statistics for a call that ran out of time
    pub fn timed_out() -> Self {
        Self {
            planning_time: -1.0,
            num_nodes: 0,
            plan_length: 1,
            plan_quality: 0.0,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.planning_time < 0.0
    }
}

/// Plan plus the statistics of the call that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub plan: Plan,
    pub stats: PlanningStats,
    /// False for the degenerate `[start]` plan returned after a timeout
    pub success: bool,
}

impl PlanOutcome {
    pub fn found(plan: Plan, planning_time: f64, num_nodes: usize) -> Self {
        let stats = PlanningStats::new(planning_time, num_nodes, &plan);
        Self { plan, stats, success: true }
    }

    /// Degenerate one-step plan equal to `start`
    pub fn degenerate(start: &Configuration) -> Self {
        Self {
            plan: Plan::stationary(start),
            stats: PlanningStats::timed_out(),
            success: false,
        }
    }
}
