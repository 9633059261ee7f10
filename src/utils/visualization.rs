//! Visualization utilities for arm_planning
//!
//! Draws the occupancy grid and arm poses along a plan using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::arm_navigation::PlanarArm;
use crate::common::{ArmPlanningError, ArmPlanningResult, Configuration, Plan};
use crate::utils::OccupancyGrid;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const RED: &str = "#FF0000";
    pub const GRAY: &str = "#808080";

    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const INTERMEDIATE: &str = GRAY;
    pub const TIP: &str = RED;
}

/// Style for one arm pose
#[derive(Debug, Clone)]
pub struct ArmStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: Option<String>,
}

impl ArmStyle {
    pub fn new(color: &str) -> Self {
        Self { color: color.to_string(), line_width: 2.0, caption: None }
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Centers of the occupied cells of `grid`
pub fn obstacle_points(grid: &OccupancyGrid) -> (Vec<f64>, Vec<f64>) {
    grid.occupied_cells()
        .into_iter()
        .map(|(x, y)| (x as f64 + 0.5, y as f64 + 0.5))
        .unzip()
}

/// Base and joint positions of `arm` at `angles` as a polyline
pub fn arm_polyline(arm: &PlanarArm, angles: &Configuration) -> (Vec<f64>, Vec<f64>) {
    arm.joint_positions(angles).into_iter().map(|p| (p.x, p.y)).unzip()
}

/// Indices of the poses drawn for a plan: every `stride`-th pose plus the last one
pub fn pose_indices(plan_len: usize, stride: usize) -> Vec<usize> {
    if plan_len == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..plan_len).step_by(stride.max(1)).collect();
    if indices.last() != Some(&(plan_len - 1)) {
        indices.push(plan_len - 1);
    }
    indices
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self { figure: Figure::new(), title: String::new(), x_range: None, y_range: None }
    }

    /// Visualizer whose axes cover `grid`
    pub fn for_grid(grid: &OccupancyGrid) -> Self {
        let mut vis = Self::new();
        vis.set_x_range(0.0, grid.width() as f64);
        vis.set_y_range(0.0, grid.height() as f64);
        vis
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn plot_grid(&mut self, grid: &OccupancyGrid) -> &mut Self {
        let (x, y) = obstacle_points(grid);
        self.figure.axes2d().points(
            &x,
            &y,
            &[Caption("Obstacles"), Color(colors::OBSTACLE), PointSymbol('S'), PointSize(0.5)],
        );
        self
    }

    pub fn plot_arm(&mut self, arm: &PlanarArm, angles: &Configuration, style: &ArmStyle) -> &mut Self {
        let (x, y) = arm_polyline(arm, angles);
        let color = Color(style.color.as_str());
        let width = LineWidth(style.line_width);
        let axes = self.figure.axes2d();
        match &style.caption {
            Some(caption) => {
                axes.lines_points(&x, &y, &[Caption(caption.as_str()), color, width, PointSymbol('O')]);
            }
            None => {
                axes.lines_points(&x, &y, &[color, width, PointSymbol('O')]);
            }
        }
        self
    }

    /// Start pose, every `stride`-th intermediate pose, goal pose and the tip trace
    pub fn plot_plan(&mut self, arm: &PlanarArm, plan: &Plan, stride: usize) -> &mut Self {
        let indices = pose_indices(plan.len(), stride);
        let last = plan.len().saturating_sub(1);
        for &i in &indices {
            let style = if i == 0 {
                ArmStyle::new(colors::START).with_caption("Start").with_line_width(3.0)
            } else if i == last {
                ArmStyle::new(colors::GOAL).with_caption("Goal").with_line_width(3.0)
            } else {
                ArmStyle::new(colors::INTERMEDIATE).with_line_width(1.0)
            };
            self.plot_arm(arm, &plan.configurations[i], &style);
        }

        let (tip_x, tip_y): (Vec<f64>, Vec<f64>) = plan
            .iter()
            .filter_map(|q| arm.joint_positions(q).last().map(|p| (p.x, p.y)))
            .unzip();
        self.figure.axes2d().lines(&tip_x, &tip_y, &[Caption("Tip"), Color(colors::TIP), LineWidth(1.0)]);
        self
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> ArmPlanningResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| ArmPlanningError::Visualization(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();
        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [cells]", &[]);
        axes.set_y_label("Y [cells]", &[]);
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
