//
// Planar N-link arm: forward kinematics and collision checking against
// an occupancy grid
//

use std::f64::consts::TAU;

use crate::common::{Configuration, Point2D};
use crate::utils::{rasterize_line, OccupancyGrid};

/// Default length of every link, in grid cells
pub const LINK_LENGTH_CELLS: f64 = 10.0;

/// Chain of equal-length links anchored at a fixed base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarArm {
    pub link_length: f64,
    pub base: Point2D,
}

impl PlanarArm {
    pub fn new(link_length: f64, base: Point2D) -> Self {
        PlanarArm { link_length, base }
    }

    /// Arm anchored at the canonical base `(width / 2, 0)` of `grid`
    pub fn on_grid(grid: &OccupancyGrid, link_length: f64) -> Self {
        Self::new(link_length, Point2D::new(grid.width() as f64 / 2.0, 0.0))
    }

    /// Endpoint of a link of this arm starting at `from` with joint angle `theta`
    pub fn link_end(&self, from: Point2D, theta: f64) -> Point2D {
        Point2D::new(
            from.x + self.link_length * (TAU - theta).cos(),
            from.y - self.link_length * (TAU - theta).sin(),
        )
    }

    /// Base followed by the `D` joint positions
    pub fn joint_positions(&self, angles: &Configuration) -> Vec<Point2D> {
        let mut positions = Vec::with_capacity(angles.len() + 1);
        positions.push(self.base);
        let mut current = self.base;
        for &theta in angles.iter() {
            current = self.link_end(current, theta);
            positions.push(current);
        }
        positions
    }
}

/// Arm validity oracle: a configuration is valid when every link stays
/// inside the grid and crosses no occupied cell
#[derive(Debug, Clone, Copy)]
pub struct ArmValidityChecker<'a> {
    grid: &'a OccupancyGrid,
    arm: PlanarArm,
}

impl<'a> ArmValidityChecker<'a> {
    pub fn new(grid: &'a OccupancyGrid, link_length: f64) -> Self {
        ArmValidityChecker { grid, arm: PlanarArm::on_grid(grid, link_length) }
    }

    pub fn grid(&self) -> &'a OccupancyGrid {
        self.grid
    }

    /// Check a continuous segment against the grid bounds and obstacles
    pub fn is_valid_line_segment(&self, p0: Point2D, p1: Point2D) -> bool {
        if !self.grid.contains(p0.x, p0.y) || !self.grid.contains(p1.x, p1.y) {
            return false;
        }

        let (x0, y0) = self.grid.to_cell(p0.x, p0.y);
        let (x1, y1) = self.grid.to_cell(p1.x, p1.y);

        rasterize_line((x0 as i64, y0 as i64), (x1 as i64, y1 as i64))
            .all(|(cx, cy)| !self.grid.is_occupied(cx as usize, cy as usize))
    }

    pub fn is_valid_configuration(&self, angles: &Configuration) -> bool {
        let mut start = self.arm.base;
        for &theta in angles.iter() {
            let end = self.arm.link_end(start, theta);
            if !self.is_valid_line_segment(start, end) {
                return false;
            }
            start = end;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn q(angles: &[f64]) -> Configuration {
        Configuration::from_vec(angles.to_vec())
    }

    #[test]
    fn test_forward_kinematics_sign_convention() {
        let grid = OccupancyGrid::empty(20, 20);
        let arm = PlanarArm::on_grid(&grid, 10.0);
        let joints = arm.joint_positions(&q(&[FRAC_PI_2, FRAC_PI_4]));

        assert_eq!(joints.len(), 3);
        assert_relative_eq!(joints[0].x, 10.0);
        assert_relative_eq!(joints[0].y, 0.0);
        // pi/2 points straight up from the base
        assert_relative_eq!(joints[1].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(joints[1].y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(joints[2].x, 10.0 + 50f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(joints[2].y, 10.0 + 50f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_valid_configuration_in_empty_grid() {
        let grid = OccupancyGrid::empty(20, 20);
        let checker = ArmValidityChecker::new(&grid, LINK_LENGTH_CELLS);
        assert!(checker.is_valid_configuration(&q(&[FRAC_PI_2, FRAC_PI_4])));
        assert!(checker.is_valid_configuration(&q(&[FRAC_PI_2, 3.0 * FRAC_PI_4])));
    }

    #[test]
    fn test_links_leaving_the_grid_are_invalid() {
        let grid = OccupancyGrid::empty(20, 20);
        let checker = ArmValidityChecker::new(&grid, LINK_LENGTH_CELLS);
        // first link ends exactly on x = width
        assert!(!checker.is_valid_configuration(&q(&[0.0, 0.0])));
        // first link ends just below y = 0
        assert!(!checker.is_valid_configuration(&q(&[PI, PI])));
        // second link reaches y = height
        assert!(!checker.is_valid_configuration(&q(&[FRAC_PI_2, FRAC_PI_2])));
    }

    #[test]
    fn test_obstacle_blocks_link() {
        let grid = OccupancyGrid::empty(20, 20).with_obstacle(8, 4, 11, 6);
        let checker = ArmValidityChecker::new(&grid, LINK_LENGTH_CELLS);
        assert!(!checker.is_valid_configuration(&q(&[FRAC_PI_2, FRAC_PI_4])));

        let p0 = Point2D::new(1.0, 1.0);
        let p1 = Point2D::new(1.0, 15.0);
        assert!(checker.is_valid_line_segment(p0, p1));
        assert!(!checker.is_valid_line_segment(Point2D::new(0.5, 5.5), Point2D::new(15.0, 5.5)));
    }

    #[test]
    fn test_fully_occupied_grid_rejects_everything() {
        let grid = OccupancyGrid::filled(20, 20);
        let checker = ArmValidityChecker::new(&grid, LINK_LENGTH_CELLS);
        assert!(!checker.is_valid_configuration(&q(&[FRAC_PI_2, FRAC_PI_4])));
    }

    #[test]
    fn test_validity_is_pure() {
        let grid = OccupancyGrid::empty(30, 30).with_obstacle(12, 8, 14, 20);
        let checker = ArmValidityChecker::new(&grid, LINK_LENGTH_CELLS);
        let configurations = [q(&[1.0, 2.0]), q(&[FRAC_PI_2, 0.3]), q(&[2.5, 1.2])];
        for configuration in &configurations {
            let first = checker.is_valid_configuration(configuration);
            for _ in 0..5 {
                assert_eq!(checker.is_valid_configuration(configuration), first);
            }
        }
    }
}
