use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drive_viz::config::eval::{self as eval_config, DEFAULT_AGENT_FILE, DEFAULT_CARLA_ROOT, DEFAULT_CHECKPOINT, DEFAULT_OUTPUT_DIR};
use drive_viz::eval::{self, EvalPlan, TM_PORT_RANGE, WORLD_PORT_RANGE};
use drive_viz::{EvalConfig, ScaleMode, Visualizer, VisualizerConfig};
use log::{debug, warn};
use tokio::task::spawn_blocking;

/// Bench2Drive single-scenario evaluation and live frame viewer
#[derive(Parser, Debug)]
#[command(name = "drive-viz")]
#[command(about = "Run one Bench2Drive route through CARLA, or preview frames in the live viewer")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single scenario with leaderboard_evaluator.py
    Eval(EvalArgs),
    /// Stream a directory of images into the live viewer
    View(ViewArgs),
}

#[derive(clap::Args, Debug)]
struct EvalArgs {
    /// Route XML file (defaults to the first known route file that exists)
    #[arg(long)]
    route: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_AGENT_FILE, help = "Agent Python file")]
    agent: PathBuf,

    #[arg(long, default_value = DEFAULT_CHECKPOINT, help = "Model checkpoint passed as --agent-config")]
    checkpoint: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, help = "Directory for result.json, logs and viz/")]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_CARLA_ROOT, help = "CARLA installation root")]
    carla_root: String,

    #[arg(long, default_value = ".", help = "Repository root containing Bench2Drive/")]
    repo_root: PathBuf,

    #[arg(long, default_value_t = 1, help = "Traffic manager seed")]
    seed: u32,

    #[arg(long, default_value_t = 600, help = "Leaderboard client timeout in seconds")]
    timeout: u32,

    #[arg(long, default_value = "python", help = "Python interpreter")]
    python: String,
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Directory of images (png, jpg, ...)
    dir: PathBuf,

    #[arg(long, default_value_t = 20, help = "Frames submitted per second")]
    fps: u32,

    #[arg(long, default_value = "original", help = "Initial scale mode: original, fit, fill, custom")]
    mode: ScaleMode,

    #[arg(long, help = "Loop over the images until the window is closed")]
    repeat: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Eval(args) => {
            let code = run_eval(args).await?;
            std::process::exit(code);
        }
        Commands::View(args) => spawn_blocking(move || run_view(args)).await?,
    }
}

async fn run_eval(args: EvalArgs) -> Result<i32> {
    let config = EvalConfig {
        route_file: args.route.unwrap_or_else(|| eval_config::default_route(Path::new("."))),
        agent_file: args.agent,
        checkpoint: args.checkpoint,
        output_dir: args.output,
        carla_root: eval_config::expand_home(&args.carla_root),
        repo_root: args.repo_root,
        seed: args.seed,
        timeout_secs: args.timeout,
        python: args.python,
    };

    if !config.route_file.exists() {
        println!("Route file not found: {}", config.route_file.display());
        println!("Known route locations:");
        for (path, exists) in eval_config::route_candidates(Path::new(".")) {
            println!("  [{}] {}", if exists { "x" } else { " " }, path.display());
        }
    }
    config.validate()?;
    let config = config.resolved()?;

    println!("Evaluation configuration:");
    for (key, value) in config.summary() {
        println!("  {}: {}", key, value);
    }

    let world_port = eval::find_available_port(WORLD_PORT_RANGE)?;
    let tm_port = eval::find_available_port(TM_PORT_RANGE)?;
    println!("Ports: world={}, traffic manager={}", world_port, tm_port);

    let plan = EvalPlan::build(&config, world_port, tm_port);
    eval::prepare_output_dirs(&plan)?;
    println!("Command: {}", plan.command_line());
    println!("Output directory: {}", plan.output_dir.display());

    let outcome = eval::run_evaluation(&plan).await?;
    println!("Finished in {:.2}s with exit code {}", outcome.elapsed.as_secs_f64(), outcome.exit_code);

    if outcome.interrupted {
        println!("Evaluation interrupted");
    } else if outcome.success() {
        println!("Evaluation completed, results in {}", plan.result_file.display());
        if let Some(progress) = outcome.checkpoint.as_ref().and_then(|c| c.progress.as_ref()) {
            println!("Progress: {}", progress);
        }
    } else {
        println!("Evaluation failed, see {}", plan.err_file.display());
    }

    Ok(outcome.exit_code)
}

fn run_view(args: ViewArgs) -> Result<()> {
    let images = load_images(&args.dir)?;
    anyhow::ensure!(!images.is_empty(), "no decodable images in {}", args.dir.display());
    println!("Loaded {} images from {}", images.len(), args.dir.display());

    let config = VisualizerConfig::default()
        .with_title(format!("drive-viz: {}", args.dir.display()))
        .with_initial_mode(args.mode);
    let viz = Visualizer::new(config);
    viz.start()?;

    let period = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    'outer: loop {
        for image in &images {
            if !viz.is_running() {
                break 'outer;
            }
            let tick = Instant::now();
            viz.submit_frame(image);
            if let Some(rest) = period.checked_sub(tick.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        if !args.repeat {
            break;
        }
    }

    // keep the last frame on screen until the window is closed
    while viz.is_running() {
        std::thread::sleep(Duration::from_millis(100));
    }
    let stats = viz.channel_stats();
    debug!("channel stats: {:?}", stats);
    viz.stop();
    Ok(())
}

fn load_images(dir: &Path) -> Result<Vec<image::DynamicImage>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        match image::open(&path) {
            Ok(img) => images.push(img),
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(images)
}
