//! Planar arm motion planner
//!
//! Plans a single start/goal query on an occupancy grid, or compares all
//! sampling planners on random instances.
//!
//! Usage:
//!   arm_planner --map map.txt --start 1.57,0.78 --goal 1.57,2.35 --planner rrt-connect
//!   arm_planner --width 50 --height 50 --dofs 3 --benchmark 20 --seed 7
//!
//! Enable debug logging to see planner milestones:
//!   RUST_LOG=debug arm_planner ...

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arm_planning::arm_navigation::PlanarArm;
use arm_planning::path_planning::Benchmark;
use arm_planning::utils::Visualizer;
use arm_planning::{
    plan_arm_motion, ArmPlanningError, ArmPlanningResult, OccupancyGrid, PlannerConfig, PlannerKind,
};

/// Planar arm motion planner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Occupancy grid text file (one row per line, 1 = occupied)
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Width of the empty grid used when no map is given
    #[arg(long, default_value = "50")]
    width: usize,

    /// Height of the empty grid used when no map is given
    #[arg(long, default_value = "50")]
    height: usize,

    /// Start joint angles in radians, comma separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    start: Vec<f64>,

    /// Goal joint angles in radians, comma separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    goal: Vec<f64>,

    /// Planner to run
    #[arg(short, long, value_enum, default_value = "rrt")]
    planner: PlannerKind,

    /// Run the benchmark over this many random instances instead of a single query
    #[arg(short, long)]
    benchmark: Option<usize>,

    /// Number of joints for benchmark instances
    #[arg(long, default_value = "2")]
    dofs: usize,

    /// Stop the benchmark after this many start/goal draws
    #[arg(long)]
    max_attempts: Option<usize>,

    /// YAML planner configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the configuration file
    #[arg(long)]
    seed: Option<u64>,

    /// Planning time budget in seconds, overrides the configuration file
    #[arg(long)]
    time_limit: Option<f64>,

    /// Save a PNG of the plan
    #[arg(long)]
    plot: Option<PathBuf>,
}

fn load_grid(args: &Args) -> ArmPlanningResult<OccupancyGrid> {
    match &args.map {
        Some(path) => OccupancyGrid::load(path),
        None => OccupancyGrid::new(args.width, args.height, vec![0.0; args.width * args.height]),
    }
}

fn load_config(args: &Args) -> ArmPlanningResult<PlannerConfig> {
    let mut config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(secs) = args.time_limit {
        config = config.with_time_limit(secs);
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> ArmPlanningResult<()> {
    let grid = load_grid(args)?;
    let config = load_config(args)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("grid {}x{} with {} occupied cells", grid.width(), grid.height(), grid.occupied_cells().len());

    if let Some(iterations) = args.benchmark {
        let mut benchmark = Benchmark::new(config);
        if let Some(max_attempts) = args.max_attempts {
            benchmark = benchmark.with_max_attempts(max_attempts);
        }
        let report = benchmark.run(&grid, args.dofs, iterations, &mut rng)?;
        println!("{}", report);
        return Ok(());
    }

    if args.start.is_empty() || args.goal.is_empty() {
        return Err(ArmPlanningError::InvalidParameter(
            "--start and --goal are required unless --benchmark is given".to_string(),
        ));
    }

    let outcome = plan_arm_motion(&grid, &args.start, &args.goal, args.planner, &config, &mut rng)?;
    for configuration in outcome.plan.iter() {
        let angles: Vec<String> = configuration.iter().map(|a| format!("{:.6}", a)).collect();
        println!("{}", angles.join(","));
    }
    println!(
        "planner={} success={} planning_time={:.6} num_nodes={} plan_length={} plan_quality={:.6}",
        args.planner,
        outcome.success,
        outcome.stats.planning_time,
        outcome.stats.num_nodes,
        outcome.stats.plan_length,
        outcome.stats.plan_quality
    );

    if let Some(path) = &args.plot {
        let arm = PlanarArm::on_grid(&grid, config.link_length);
        let mut vis = Visualizer::for_grid(&grid);
        vis.set_title(&format!("{} plan", args.planner));
        vis.plot_grid(&grid);
        vis.plot_plan(&arm, &outcome.plan, 5);
        vis.save_png(&path.to_string_lossy(), 800, 800)?;
        info!("plot saved to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
