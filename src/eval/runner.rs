//! # Evaluator Process Supervision
//!
//! Spawns the evaluator described by an [`EvalPlan`], redirects its output to
//! the log files and waits for it to finish or for Ctrl-C, whichever comes
//! first.

use std::fs::File;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::process::{Child, Command};

use crate::error::{VizError, VizResult};
use crate::eval::checkpoint::{read_checkpoint, CheckpointSummary};
use crate::eval::command::EvalPlan;

/// Exit code reported when the run was interrupted by the user.
pub const INTERRUPTED_EXIT_CODE: i32 = -1;

/// Exit code reported when the platform gives neither a code nor a signal.
pub const UNKNOWN_EXIT_CODE: i32 = -2;

/// Time the evaluator gets to flush `result.json` after SIGTERM before it is killed.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(10);

/// How a supervised run ended.
#[derive(Debug)]
pub struct EvalOutcome {
    /// The evaluator's exit code, `128 + signal` when a signal ended it,
    /// or [`INTERRUPTED_EXIT_CODE`].
    pub exit_code: i32,
    pub elapsed: Duration,
    pub interrupted: bool,
    /// Present only after a successful run with a readable result file.
    pub checkpoint: Option<CheckpointSummary>,
}

impl EvalOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the evaluator to completion.
///
/// Ctrl-C sends SIGTERM, kills the child if it is still alive after
/// [`TERMINATE_GRACE`], and reports [`INTERRUPTED_EXIT_CODE`]. A result file
/// that is missing or unparsable after a successful run is logged, not returned
/// as an error.
pub async fn run_evaluation(plan: &EvalPlan) -> VizResult<EvalOutcome> {
    let stdout = File::create(&plan.log_file).map_err(|e| VizError::io_at("create log", &plan.log_file, e))?;
    let stderr = File::create(&plan.err_file).map_err(|e| VizError::io_at("create log", &plan.err_file, e))?;

    let mut child = Command::new(&plan.program)
        .args(&plan.args)
        .envs(&plan.env)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| VizError::process(&plan.program, format!("failed to spawn: {}", e)))?;

    info!("evaluator started (pid {:?})", child.id());
    let started = Instant::now();

    let waited = tokio::select! {
        status = child.wait() => Some(status),
        _ = tokio::signal::ctrl_c() => None,
    };
    let (exit_code, interrupted) = match waited {
        Some(status) => {
            let status = status.map_err(|e| VizError::process(&plan.program, e.to_string()))?;
            (exit_code(status), false)
        }
        None => {
            warn!("interrupted, stopping evaluator");
            match terminate(&mut child, TERMINATE_GRACE).await {
                Ok(status) => info!("evaluator stopped: {}", status),
                Err(e) => warn!("failed to stop evaluator: {}", e),
            }
            (INTERRUPTED_EXIT_CODE, true)
        }
    };
    let elapsed = started.elapsed();

    let checkpoint = if exit_code == 0 && plan.result_file.exists() {
        match read_checkpoint(&plan.result_file) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(EvalOutcome {
        exit_code,
        elapsed,
        interrupted,
        checkpoint,
    })
}

/// SIGTERM first, SIGKILL once `grace` has passed.
async fn terminate(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SAFETY: `pid` is our own child and has not been reaped yet.
            let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
            if rc == 0 {
                match tokio::time::timeout(grace, child.wait()).await {
                    Ok(status) => return status,
                    Err(_) => warn!("evaluator still running {:?} after SIGTERM, killing", grace),
                }
            }
        }
    }
    child.kill().await?;
    child.wait().await
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            warn!("evaluator terminated by signal {}", signal);
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}
