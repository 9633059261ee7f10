// Configuration-space path planning for the planar arm

pub mod config;
pub mod budget;
pub mod c_space;
pub mod tree;
pub mod roadmap;
pub mod rrt;
pub mod rrt_connect;
pub mod rrt_star;
pub mod prm;
pub mod interpolation;
pub mod planner;
pub mod benchmark;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::*;
pub use budget::*;
pub use c_space::*;
pub use tree::*;
pub use roadmap::*;
pub use rrt::RRTPlanner;
pub use rrt_connect::*;
pub use rrt_star::*;
pub use prm::*;
pub use interpolation::*;
pub use planner::*;
pub use benchmark::*;
