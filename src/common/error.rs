//! Error types for arm_planning

use thiserror::Error;

/// Main error type for arm motion planning
#[derive(Debug, Error)]
pub enum ArmPlanningError {
    /// Fewer than two joints
    #[error("Invalid DOF count: {dofs} (at least 2 required)")]
    InvalidDofCount { dofs: usize },
    /// Start and goal (or any other pair of configurations) disagree in length
    #[error("Dimension mismatch: expected {expected} joints, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Occupancy grid could not be built or parsed
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Planning budget exhausted before a plan was found
    #[error("{planner}: no plan found within {elapsed:.3} s")]
    Timeout { planner: &'static str, elapsed: f64 },
    /// Path planning failed for a reason other than the time budget
    #[error("Planning error: {0}")]
    Planning(String),
    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),
    /// Plot could not be rendered or written
    #[error("Visualization error: {0}")]
    Visualization(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArmPlanningError {
    /// True for the recoverable "ran out of time" failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, ArmPlanningError::Timeout { .. })
    }
}

/// Result type alias for arm planning operations
pub type ArmPlanningResult<T> = Result<T, ArmPlanningError>;
