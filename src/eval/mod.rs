//! # Single-Scenario Evaluation
//!
//! Runs `leaderboard_evaluator.py` for one route: pick free ports, build the
//! command line and environment, supervise the child process and read back the
//! result checkpoint.

pub mod checkpoint;
pub mod command;
pub mod ports;
pub mod runner;

pub use checkpoint::{read_checkpoint, CheckpointSummary};
pub use command::{prepare_output_dirs, EvalPlan};
pub use ports::{find_available_port, TM_PORT_RANGE, WORLD_PORT_RANGE};
pub use runner::{run_evaluation, EvalOutcome, INTERRUPTED_EXIT_CODE};
