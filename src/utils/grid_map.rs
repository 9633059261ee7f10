// Occupancy grid of the arm workspace

use std::ops::Deref;
use std::path::Path;

extern crate nalgebra as na;

use crate::common::{ArmPlanningError, ArmPlanningResult};

/// Cell value marking an obstacle
pub const OCCUPIED: f64 = 1.0;

/// Immutable `width x height` occupancy field with unit-size cells.
///
/// Stored as a `width`-row matrix so the flat column-major buffer has
/// `index = y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    grid: na::DMatrix<f64>,
}

impl OccupancyGrid {
    /// Build from a flat buffer laid out as `index = y * width + x`
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> ArmPlanningResult<Self> {
        if width == 0 || height == 0 {
            return Err(ArmPlanningError::InvalidGrid(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(ArmPlanningError::InvalidGrid(format!(
                "expected {} cells for a {}x{} grid, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { grid: na::DMatrix::from_vec(width, height, data) })
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self { grid: na::DMatrix::zeros(width, height) }
    }

    pub fn filled(width: usize, height: usize) -> Self {
        Self { grid: na::DMatrix::from_element(width, height, OCCUPIED) }
    }

    /// Parse whitespace separated rows; line index is `y`, column index is `x`
    pub fn from_text(text: &str) -> ArmPlanningResult<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<f64>().map_err(|e| {
                        ArmPlanningError::InvalidGrid(format!(
                            "line {}: cannot parse '{}': {}",
                            line_no + 1,
                            token,
                            e
                        ))
                    })
                })
                .collect::<ArmPlanningResult<Vec<f64>>>()?;
            rows.push(row);
        }

        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(ArmPlanningError::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }
        Self::new(width, height, rows.concat())
    }

    pub fn load(path: &Path) -> ArmPlanningResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// Mark every cell of the inclusive rectangle as occupied
    pub fn with_obstacle(mut self, x_min: usize, y_min: usize, x_max: usize, y_max: usize) -> Self {
        let x_max = x_max.min(self.width() - 1);
        let y_max = y_max.min(self.height() - 1);
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                self.grid[(x, y)] = OCCUPIED;
            }
        }
        self
    }

    pub fn width(&self) -> usize {
        self.grid.nrows()
    }

    pub fn height(&self) -> usize {
        self.grid.ncols()
    }

    /// True when `(x, y)` lies in `[0, width) x [0, height)`
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x < self.width() as f64 && y >= 0.0 && y < self.height() as f64
    }

    /// Discretize a continuous coordinate, clamping to the grid
    pub fn to_cell(&self, x: f64, y: f64) -> (usize, usize) {
        (clamp_index(x, self.width()), clamp_index(y, self.height()))
    }

    pub fn is_occupied(&self, cx: usize, cy: usize) -> bool {
        self.grid[(cx, cy)] == OCCUPIED
    }

    pub fn occupied_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.is_occupied(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }
}

fn clamp_index(value: f64, size: usize) -> usize {
    if value < 0.0 {
        return 0;
    }
    (value as usize).min(size - 1)
}

impl Deref for OccupancyGrid {
    type Target = na::DMatrix<f64>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}
