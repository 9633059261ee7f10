//! Common types, traits, and error definitions for arm_planning
//!
//! This module provides the foundational building blocks shared by the
//! kinematics, the configuration space and all planners.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
