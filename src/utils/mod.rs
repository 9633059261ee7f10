//! Utility modules for arm_planning

pub mod grid_map;
pub mod line_raster;
pub mod visualization;

pub use grid_map::*;
pub use line_raster::*;
pub use visualization::{ArmStyle, Visualizer, colors};
