//! # Evaluation Configuration
//!
//! Paths and parameters for one Bench2Drive leaderboard run: which route to drive,
//! which agent to load with which checkpoint, where CARLA and the repository live,
//! and where the run writes its results.

use std::path::{Path, PathBuf};

use crate::error::{VizError, VizResult};

/// Route files probed, in order, when no route is given.
pub const KNOWN_ROUTE_LOCATIONS: [&str; 6] = [
    "./Bench2Drive/leaderboard/data/routes_devtest.xml",
    "./leaderboard/data/routes_devtest.xml",
    "./Bench2Drive/leaderboard/data/bench2drive_split/route_001.xml",
    "./leaderboard/data/bench2drive_split/route_001.xml",
    "./leaderboard/data/routes_training.xml",
    "./Bench2Drive/leaderboard/data/routes_training.xml",
];

pub const DEFAULT_AGENT_FILE: &str = "./team_code/agent_simlingo.py";
pub const DEFAULT_CHECKPOINT: &str = "./outputs/simlingo/checkpoints/epoch=013.ckpt/pytorch_model.pt";
pub const DEFAULT_OUTPUT_DIR: &str = "./single_eval_results";
pub const DEFAULT_CARLA_ROOT: &str = "~/software/carla0915";

/// Configuration of a single-scenario evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub route_file: PathBuf,
    pub agent_file: PathBuf,
    pub checkpoint: PathBuf,
    pub output_dir: PathBuf,
    pub carla_root: PathBuf,
    pub repo_root: PathBuf,
    /// Traffic manager seed.
    pub seed: u32,
    /// Leaderboard client timeout in seconds.
    pub timeout_secs: u32,
    /// Python interpreter used to run the evaluator.
    pub python: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            route_file: default_route(Path::new(".")),
            agent_file: PathBuf::from(DEFAULT_AGENT_FILE),
            checkpoint: PathBuf::from(DEFAULT_CHECKPOINT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            carla_root: expand_home(DEFAULT_CARLA_ROOT),
            repo_root: PathBuf::from("."),
            seed: 1,
            timeout_secs: 600,
            python: "python".to_string(),
        }
    }
}

impl EvalConfig {
    /// Checks that the route, agent and checkpoint files exist.
    pub fn validate(&self) -> VizResult<()> {
        let inputs = [
            ("route", &self.route_file),
            ("agent", &self.agent_file),
            ("checkpoint", &self.checkpoint),
        ];
        for (field, path) in inputs {
            if !path.exists() {
                return Err(VizError::config(field, path.display().to_string(), "file does not exist"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(VizError::config("timeout", "0", "timeout must be greater than 0"));
        }
        Ok(())
    }

    /// Turns every path absolute and expands a leading `~` in the CARLA root.
    pub fn resolved(mut self) -> VizResult<Self> {
        self.route_file = absolute(&self.route_file)?;
        self.agent_file = absolute(&self.agent_file)?;
        self.checkpoint = absolute(&self.checkpoint)?;
        self.repo_root = absolute(&self.repo_root)?;
        self.carla_root = expand_home(&self.carla_root.to_string_lossy());
        Ok(self)
    }

    /// Human-readable `key: value` lines, in a stable order.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("route_file", self.route_file.display().to_string()),
            ("agent_file", self.agent_file.display().to_string()),
            ("checkpoint", self.checkpoint.display().to_string()),
            ("output_dir", self.output_dir.display().to_string()),
            ("carla_root", self.carla_root.display().to_string()),
            ("repo_root", self.repo_root.display().to_string()),
            ("seed", self.seed.to_string()),
            ("timeout", self.timeout_secs.to_string()),
        ]
    }
}

/// First known route file that exists under `base`, or the first candidate.
pub fn default_route(base: &Path) -> PathBuf {
    KNOWN_ROUTE_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|candidate| base.join(candidate).exists())
        .unwrap_or_else(|| PathBuf::from(KNOWN_ROUTE_LOCATIONS[0]))
}

/// Each known route location with whether it exists under `base`.
pub fn route_candidates(base: &Path) -> Vec<(PathBuf, bool)> {
    KNOWN_ROUTE_LOCATIONS
        .iter()
        .map(|candidate| {
            let path = PathBuf::from(candidate);
            let exists = base.join(&path).exists();
            (path, exists)
        })
        .collect()
}

/// Expand a leading `~` using `HOME`.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                PathBuf::from(home)
            } else {
                PathBuf::from(home).join(rest)
            }
        }
        _ => PathBuf::from(path),
    }
}

fn absolute(path: &Path) -> VizResult<PathBuf> {
    std::path::absolute(path).map_err(|e| VizError::io_at("resolve path", path, e))
}
