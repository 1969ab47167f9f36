//! # Evaluator Command Plan
//!
//! Everything needed to launch `leaderboard_evaluator.py` for one route,
//! computed up front so it can be printed, inspected and tested without
//! spawning anything.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EvalConfig;
use crate::error::{VizError, VizResult};

const CARLA_EGG: &str = "carla-0.9.15-py3.7-linux-x86_64.egg";

/// Program, arguments, environment and output files of one evaluator run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalPlan {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment.
    pub env: BTreeMap<String, OsString>,
    pub cwd: PathBuf,
    pub output_dir: PathBuf,
    pub viz_dir: PathBuf,
    pub result_file: PathBuf,
    pub log_file: PathBuf,
    pub err_file: PathBuf,
    pub world_port: u16,
    pub tm_port: u16,
}

impl EvalPlan {
    pub fn build(config: &EvalConfig, world_port: u16, tm_port: u16) -> Self {
        let output_dir = config.output_dir.clone();
        let viz_dir = output_dir.join("viz");
        let result_file = output_dir.join("result.json");
        let repo = &config.repo_root;
        let carla = &config.carla_root;

        let evaluator = repo.join("Bench2Drive/leaderboard/leaderboard/leaderboard_evaluator.py");
        let args = vec![
            "-u".to_string(),
            evaluator.display().to_string(),
            format!("--routes={}", config.route_file.display()),
            "--repetitions=1".to_string(),
            "--track=SENSORS".to_string(),
            format!("--checkpoint={}", result_file.display()),
            format!("--timeout={}", config.timeout_secs),
            format!("--agent={}", config.agent_file.display()),
            format!("--agent-config={}", config.checkpoint.display()),
            format!("--traffic-manager-seed={}", config.seed),
            format!("--port={}", world_port),
            format!("--traffic-manager-port={}", tm_port),
        ];

        let scenario_runner = repo.join("Bench2Drive/scenario_runner");
        let python_path = join_search_path(&[
            carla.join("PythonAPI/carla"),
            carla.join("PythonAPI/carla/dist").join(CARLA_EGG),
            repo.join("Bench2Drive/leaderboard"),
            scenario_runner.clone(),
        ]);

        let mut env = BTreeMap::new();
        env.insert("CARLA_ROOT".to_string(), carla.clone().into_os_string());
        env.insert("PYTHONPATH".to_string(), python_path);
        env.insert("SCENARIO_RUNNER_ROOT".to_string(), scenario_runner.into_os_string());
        env.insert("SAVE_PATH".to_string(), viz_dir.clone().into_os_string());

        Self {
            program: config.python.clone(),
            args,
            env,
            cwd: repo.clone(),
            log_file: output_dir.join("output.log"),
            err_file: output_dir.join("error.log"),
            result_file,
            viz_dir,
            output_dir,
            world_port,
            tm_port,
        }
    }

    /// The command as a single shell-like line, for printing.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn join_search_path(parts: &[PathBuf]) -> OsString {
    let mut joined = OsString::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            joined.push(":");
        }
        joined.push(part.as_os_str());
    }
    joined
}

/// Create the output directory and a fresh, empty `viz/` inside it.
pub fn prepare_output_dirs(plan: &EvalPlan) -> VizResult<()> {
    create_dir(&plan.output_dir)?;
    if plan.viz_dir.exists() {
        fs::remove_dir_all(&plan.viz_dir).map_err(|e| VizError::io_at("clear viz dir", &plan.viz_dir, e))?;
    }
    create_dir(&plan.viz_dir)
}

fn create_dir(path: &Path) -> VizResult<()> {
    fs::create_dir_all(path).map_err(|e| VizError::io_at("create directory", path, e))
}
