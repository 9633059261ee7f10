//! Batch comparison of the sampling planners on random instances
//!
//! Every iteration draws one random valid start/goal pair and runs RRT,
//! RRT-Connect, RRT* and PRM on it. A pair on which any planner times out is
//! discarded and redrawn, so the averages always cover the same instances.

use std::fmt;
use std::time::Instant;

use log::{debug, info};
use rand::RngCore;
use serde::Serialize;

use crate::common::{ArmPlanningError, ArmPlanningResult, Configuration, PlanOutcome};
use crate::path_planning::{ConfigurationSpace, PlannerConfig, PlannerKind};
use crate::utils::OccupancyGrid;

/// Uniform draws per start or goal before the pair counts as a failed attempt
const SAMPLE_ATTEMPTS: usize = 10_000;

/// Averages of one planner over all completed iterations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmSummary {
    pub algorithm: &'static str,
    pub avg_planning_time: f64,
    pub avg_num_nodes: f64,
    pub avg_plan_quality: f64,
}

impl AlgorithmSummary {
    fn new(algorithm: &'static str) -> Self {
        AlgorithmSummary {
            algorithm,
            avg_planning_time: 0.0,
            avg_num_nodes: 0.0,
            avg_plan_quality: 0.0,
        }
    }

    fn accumulate(&mut self, outcome: &PlanOutcome) {
        self.avg_planning_time += outcome.stats.planning_time;
        self.avg_num_nodes += outcome.stats.num_nodes as f64;
        self.avg_plan_quality += outcome.stats.plan_quality;
    }

    fn average_over(&mut self, iterations: usize) {
        let n = iterations.max(1) as f64;
        self.avg_planning_time /= n;
        self.avg_num_nodes /= n;
        self.avg_plan_quality /= n;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub iterations: usize,
    /// Start/goal pairs drawn, including discarded ones
    pub attempts: usize,
    pub summaries: Vec<AlgorithmSummary>,
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} iterations ({} pairs drawn)", self.iterations, self.attempts)?;
        writeln!(f, "Algorithm | avgPlanningTime | avgNumNodes | avgPlanQuality")?;
        for summary in &self.summaries {
            writeln!(
                f,
                "{} | {:.6} | {:.1} | {:.6}",
                summary.algorithm, summary.avg_planning_time, summary.avg_num_nodes, summary.avg_plan_quality
            )?;
        }
        Ok(())
    }
}

/// Benchmark driver
#[derive(Debug, Clone, Default)]
pub struct Benchmark {
    config: PlannerConfig,
    max_attempts: Option<usize>,
}

impl Benchmark {
    pub fn new(config: PlannerConfig) -> Self {
        Benchmark { config, max_attempts: None }
    }

    /// Give up after `max_attempts` start/goal pairs instead of redrawing forever
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    fn draw_pair(space: &ConfigurationSpace, rng: &mut dyn RngCore) -> Option<(Configuration, Configuration)> {
        let start = space.sample_valid(rng, SAMPLE_ATTEMPTS)?;
        let goal = space.sample_valid(rng, SAMPLE_ATTEMPTS)?;
        Some((start, goal))
    }

    /// Run every sampling planner on `iterations` random instances
    pub fn run(
        &self,
        grid: &OccupancyGrid,
        dofs: usize,
        iterations: usize,
        rng: &mut dyn RngCore,
    ) -> ArmPlanningResult<BenchmarkReport> {
        self.config.validate()?;
        let space = ConfigurationSpace::new(grid, dofs, &self.config)?;
        let planners: Vec<_> = PlannerKind::SAMPLING.iter().map(|kind| kind.planner(&self.config)).collect();
        let mut summaries: Vec<AlgorithmSummary> =
            planners.iter().map(|planner| AlgorithmSummary::new(planner.name())).collect();

        let started = Instant::now();
        let mut completed = 0;
        let mut attempts = 0;
        'instances: while completed < iterations {
            if self.max_attempts.map_or(false, |max| attempts >= max) {
                return Err(ArmPlanningError::Timeout {
                    planner: "Benchmark",
                    elapsed: started.elapsed().as_secs_f64(),
                });
            }
            attempts += 1;

            let (start, goal) = match Self::draw_pair(&space, rng) {
                Some(pair) => pair,
                None => {
                    debug!("Benchmark: no valid start/goal pair found, redrawing");
                    continue;
                }
            };

            let mut outcomes = Vec::with_capacity(planners.len());
            for planner in &planners {
                match planner.plan(&space, &start, &goal, rng) {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) if e.is_timeout() => {
                        info!("Benchmark: {}, discarding this start/goal pair", e);
                        continue 'instances;
                    }
                    Err(e) => return Err(e),
                }
            }

            for (summary, outcome) in summaries.iter_mut().zip(outcomes.iter()) {
                summary.accumulate(outcome);
            }
            completed += 1;
            info!("Benchmark: iteration {}/{} done", completed, iterations);
        }

        for summary in &mut summaries {
            summary.average_over(iterations);
        }
        Ok(BenchmarkReport { iterations, attempts, summaries })
    }
}
