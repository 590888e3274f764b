//! `TerraformCli` argument routing and retry behaviour.
//!
//! These tests verify that the adapter hands the correct argument vectors
//! and working directory to the command runner, that failures matching the
//! retry policy are re-attempted, and that genuine failures surface as
//! `TerraformError`s.

use std::path::PathBuf;

use serde_json::json;
use tfcheck_cli::application::ports::{ModuleLifecycle, StateOutputs};
use tfcheck_cli::domain::config::{BackendSettings, RetrySettings};
use tfcheck_cli::domain::error::TerraformError;
use tfcheck_cli::domain::options::RunOptions;
use tfcheck_cli::domain::retry::RetryPolicy;
use tfcheck_cli::infra::terraform::TerraformCli;

use crate::mocks::{MockCommandRunner, Scripted};

fn fast_policy() -> RetryPolicy {
    // No backoff so retry tests don't sleep.
    RetryPolicy::from_settings(&RetrySettings {
        max_attempts: 3,
        backoff_secs: 0,
    })
}

fn options() -> RunOptions {
    RunOptions::new(
        PathBuf::from("/tmp/staged"),
        vec!["dev.tfvars".to_string()],
        BackendSettings::default().config_pairs("ci/redis.tfstate"),
    )
}

/// Adapter whose two runner slots share one call log.
fn cli(runner: &MockCommandRunner) -> TerraformCli<MockCommandRunner> {
    TerraformCli::new("terraform", fast_policy(), runner.clone(), runner.clone())
}

#[tokio::test]
async fn init_and_apply_runs_init_then_apply_in_the_staged_dir() {
    let runner = MockCommandRunner::new();
    let tf = cli(&runner);
    let opts = options();

    tf.init_and_apply(&opts).await.expect("init and apply");

    let calls = runner.recorded_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "terraform");
    assert_eq!(calls[0].1, opts.init_args());
    assert_eq!(calls[0].2, opts.dir);
    assert_eq!(calls[1].1, opts.apply_args());
    assert_eq!(calls[1].2, opts.dir);
}

#[tokio::test]
async fn destroy_runs_destroy_in_the_staged_dir() {
    let runner = MockCommandRunner::new();
    let tf = cli(&runner);
    let opts = options();

    tf.destroy(&opts).await.expect("destroy");

    let calls = runner.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, opts.destroy_args());
}

#[tokio::test]
async fn output_parses_the_json_value() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Ok(b"\"redis-123\"\n".to_vec()));
    let tf = cli(&runner);

    let value = tf.output(&options(), "id").await.expect("output");
    assert_eq!(value, json!("redis-123"));

    let calls = runner.recorded_calls();
    assert_eq!(calls[0].1, RunOptions::output_args("id"));
}

#[tokio::test]
async fn malformed_output_json_is_a_terraform_error() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Ok(b"not json".to_vec()));
    let tf = cli(&runner);

    let err = tf
        .output(&options(), "id")
        .await
        .expect_err("garbage must fail");
    let tf_err = err
        .downcast_ref::<TerraformError>()
        .expect("TerraformError");
    assert!(matches!(tf_err, TerraformError::MalformedJson { .. }));
}

#[tokio::test]
async fn version_returns_the_first_line() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Ok(b"Terraform v1.7.5\non linux_amd64\n".to_vec()));
    let tf = cli(&runner);

    assert_eq!(tf.version().await.expect("version"), "Terraform v1.7.5");
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Fail(b"read tcp: connection reset by peer".to_vec()));
    let tf = cli(&runner);
    let opts = options();

    // First destroy attempt fails transiently, second (unscripted) succeeds.
    tf.destroy(&opts).await.expect("retried destroy succeeds");
    assert_eq!(runner.recorded_calls().len(), 2);
}

#[tokio::test]
async fn retries_stop_at_the_attempt_budget() {
    let runner = MockCommandRunner::new();
    for _ in 0..3 {
        runner.push(Scripted::Fail(b"connection reset by peer".to_vec()));
    }
    let tf = cli(&runner);

    let err = tf
        .destroy(&options())
        .await
        .expect_err("persistent failure must surface");
    assert_eq!(runner.recorded_calls().len(), 3);
    assert!(format!("{err}").contains("destroy failed"));
}

#[tokio::test]
async fn genuine_failures_are_not_retried() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Fail(b"Error: Unsupported argument".to_vec()));
    let tf = cli(&runner);

    let err = tf
        .init_and_apply(&options())
        .await
        .expect_err("fatal init error");
    assert_eq!(runner.recorded_calls().len(), 1);
    let tf_err = err
        .downcast_ref::<TerraformError>()
        .expect("TerraformError");
    assert!(
        matches!(tf_err, TerraformError::CommandFailed { operation, .. } if *operation == "init")
    );
}

#[tokio::test]
async fn spawn_failures_carry_the_operation_context() {
    let runner = MockCommandRunner::new();
    runner.push(Scripted::SpawnError("failed to spawn terraform".to_string()));
    let tf = cli(&runner);

    let err = tf
        .init_and_apply(&options())
        .await
        .expect_err("spawn failure");
    assert!(format!("{err:#}").contains("terraform init"));
}

#[tokio::test]
async fn fatal_apply_error_after_successful_init_names_apply() {
    // init succeeds, apply fails fatally: exactly two calls, error names apply.
    let runner = MockCommandRunner::new();
    runner.push(Scripted::Ok(Vec::new()));
    runner.push(Scripted::Fail(b"Error: InvalidParameterValue".to_vec()));
    let tf = cli(&runner);

    let err = tf
        .init_and_apply(&options())
        .await
        .expect_err("apply failure");
    assert_eq!(runner.recorded_calls().len(), 2);
    assert!(format!("{err}").contains("apply failed"));
}
