//! Integer line rasterization (Bresenham)
//!
//! Walks every grid cell between two integer endpoints, both included.
//! The dominant axis is stepped one unit at a time while an error term
//! decides when to step the minor axis. Negative slopes are handled by
//! mirroring the minor axis so the inner loop only sees slopes in `[0, 1]`.

/// Iterator over the cells of a digital line from `p1` to `p2`
#[derive(Debug, Clone)]
pub struct LineRaster {
    /// The major axis is y (coordinates were swapped)
    using_y_index: bool,
    /// The minor axis was mirrored to make the slope non-negative
    flipped: bool,
    x2: i64,
    increment: i64,
    incr_e: i64,
    incr_ne: i64,
    d_term: i64,
    x_index: i64,
    y_index: i64,
    done: bool,
}

impl LineRaster {
    pub fn new(p1: (i64, i64), p2: (i64, i64)) -> Self {
        let (p1x, p1y) = p1;
        let (p2x, p2y) = p2;

        let using_y_index = (p2y - p1y).abs() > (p2x - p1x).abs();
        let (x1, mut y1, x2, mut y2) = if using_y_index {
            (p1y, p1x, p2y, p2x)
        } else {
            (p1x, p1y, p2x, p2y)
        };

        let flipped = (p2x - p1x) * (p2y - p1y) < 0;
        if flipped {
            y1 = -y1;
            y2 = -y2;
        }

        let increment = if x2 > x1 { 1 } else { -1 };
        let delta_x = x2 - x1;
        let delta_y = y2 - y1;

        LineRaster {
            using_y_index,
            flipped,
            x2,
            increment,
            incr_e: 2 * delta_y * increment,
            incr_ne: 2 * (delta_y - delta_x) * increment,
            d_term: (2 * delta_y - delta_x) * increment,
            x_index: x1,
            y_index: y1,
            done: false,
        }
    }

    fn current_point(&self) -> (i64, i64) {
        let minor = if self.flipped { -self.y_index } else { self.y_index };
        if self.using_y_index {
            (minor, self.x_index)
        } else {
            (self.x_index, minor)
        }
    }

    fn advance(&mut self) -> bool {
        if self.x_index == self.x2 {
            return false;
        }
        self.x_index += self.increment;
        if self.d_term < 0 || (self.increment < 0 && self.d_term <= 0) {
            self.d_term += self.incr_e;
        } else {
            self.d_term += self.incr_ne;
            self.y_index += self.increment;
        }
        true
    }
}

impl Iterator for LineRaster {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = self.current_point();
        if !self.advance() {
            self.done = true;
        }
        Some(point)
    }
}

/// Convenience wrapper over [`LineRaster`]
pub fn rasterize_line(p1: (i64, i64), p2: (i64, i64)) -> LineRaster {
    LineRaster::new(p1, p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn cells(p1: (i64, i64), p2: (i64, i64)) -> Vec<(i64, i64)> {
        rasterize_line(p1, p2).collect()
    }

    #[test]
    fn test_single_point() {
        assert_eq!(cells((4, 7), (4, 7)), vec![(4, 7)]);
    }

    #[test]
    fn test_axis_aligned() {
        assert_eq!(cells((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(cells((2, 5), (2, 2)), vec![(2, 5), (2, 4), (2, 3), (2, 2)]);
    }

    #[test]
    fn test_steep_negative_slope() {
        assert_eq!(cells((0, 3), (1, 0)), vec![(0, 3), (0, 2), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_diagonal() {
        assert_eq!(cells((5, 5), (2, 2)), vec![(5, 5), (4, 4), (3, 3), (2, 2)]);
    }

    #[test]
    fn test_lines_are_connected_and_end_at_target() {
        let endpoints = [
            ((0, 0), (7, 3)),
            ((7, 3), (0, 0)),
            ((1, 9), (4, 0)),
            ((10, 2), (0, 6)),
            ((3, 3), (3, -4)),
            ((-2, 5), (9, 5)),
        ];
        for &(p1, p2) in &endpoints {
            let line = cells(p1, p2);
            let expected_len = (p2.0 - p1.0).abs().max((p2.1 - p1.1).abs()) + 1;
            assert_eq!(line.len() as i64, expected_len, "{:?} -> {:?}", p1, p2);
            assert_eq!(line.first(), Some(&p1));
            assert_eq!(line.last(), Some(&p2));
            for (a, b) in line.iter().tuple_windows() {
                assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            }
        }
    }
}
