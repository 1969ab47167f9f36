use std::fs;
use std::path::Path;

use drive_viz::eval::{prepare_output_dirs, read_checkpoint, EvalPlan};
use drive_viz::EvalConfig;

fn config_in(root: &Path) -> EvalConfig {
    EvalConfig {
        route_file: root.join("routes.xml"),
        agent_file: root.join("agent.py"),
        checkpoint: root.join("model.pt"),
        output_dir: root.join("out"),
        carla_root: root.join("carla"),
        repo_root: root.to_path_buf(),
        seed: 1,
        timeout_secs: 600,
        python: "sh".to_string(),
    }
}

/// Stand-in evaluator: a shell script at the evaluator path. `sh -u <script>`
/// accepts the same leading `-u` the Python invocation uses.
fn install_evaluator(root: &Path, body: &str) {
    let dir = root.join("Bench2Drive/leaderboard/leaderboard");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("leaderboard_evaluator.py"), body).unwrap();
}

#[test]
fn test_output_dirs_are_recreated() {
    let tmp = tempfile::tempdir().unwrap();
    let plan = EvalPlan::build(&config_in(tmp.path()), 10000, 30000);

    fs::create_dir_all(&plan.viz_dir).unwrap();
    fs::write(plan.viz_dir.join("stale.png"), b"old").unwrap();

    prepare_output_dirs(&plan).unwrap();
    assert!(plan.viz_dir.is_dir());
    assert_eq!(fs::read_dir(&plan.viz_dir).unwrap().count(), 0);
}

#[test]
fn test_validate_requires_input_files() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    assert!(config.validate().is_err());

    for path in [&config.route_file, &config.agent_file, &config.checkpoint] {
        fs::write(path, b"").unwrap();
    }
    config.validate().unwrap();
}

#[test]
fn test_read_checkpoint_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("result.json");
    fs::write(&path, r#"{"_checkpoint": {"progress": [2, 5], "records": [{}, {}]}}"#).unwrap();

    let summary = read_checkpoint(&path).unwrap();
    assert_eq!(summary.route_progress(), Some((2, 5)));
    assert_eq!(summary.records, 2);

    assert!(read_checkpoint(&tmp.path().join("missing.json")).is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_successful_run_reads_checkpoint() {
    let tmp = tempfile::tempdir().unwrap();
    install_evaluator(
        tmp.path(),
        r#"for arg in "$@"; do
  case "$arg" in --checkpoint=*) out="${arg#--checkpoint=}" ;; esac
done
echo "save path $SAVE_PATH"
echo "warming up" >&2
printf '{"_checkpoint": {"progress": [1, 1], "records": [{}]}}' > "$out"
"#,
    );
    let plan = EvalPlan::build(&config_in(tmp.path()), 10000, 30000);
    prepare_output_dirs(&plan).unwrap();

    let outcome = drive_viz::eval::run_evaluation(&plan).await.unwrap();
    assert!(outcome.success());
    assert!(!outcome.interrupted);
    assert_eq!(outcome.checkpoint.unwrap().route_progress(), Some((1, 1)));

    let log = fs::read_to_string(&plan.log_file).unwrap();
    assert!(log.contains(&plan.viz_dir.display().to_string()));
    assert_eq!(fs::read_to_string(&plan.err_file).unwrap().trim(), "warming up");
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_run_mirrors_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    install_evaluator(tmp.path(), "echo boom >&2\nexit 3\n");
    let plan = EvalPlan::build(&config_in(tmp.path()), 10000, 30000);
    prepare_output_dirs(&plan).unwrap();

    let outcome = drive_viz::eval::run_evaluation(&plan).await.unwrap();
    assert_eq!(outcome.exit_code, 3);
    assert!(!outcome.success());
    assert!(outcome.checkpoint.is_none());
}

#[tokio::test]
async fn test_missing_program_is_a_process_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path());
    config.python = "definitely-not-a-python-binary".to_string();
    let plan = EvalPlan::build(&config, 10000, 30000);
    prepare_output_dirs(&plan).unwrap();

    let err = drive_viz::eval::run_evaluation(&plan).await.unwrap_err();
    assert_eq!(err.category(), "process");
}
