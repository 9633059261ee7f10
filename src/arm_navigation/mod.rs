// Arm navigation: kinematics and the configuration validity oracle

pub mod planar_arm;

pub use planar_arm::*;
