//! Application service — the provision/verify/destroy lifecycle.
//!
//! Drives one module through stage → init+apply → read output → assert →
//! teardown. Teardown (destroy, then staging removal — in that order,
//! because destroy needs the staged files to know what to tear down) runs
//! on every exit path, success or failure.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::application::ports::{ModuleStager, ProgressReporter, StagedModule, Terraform};
use crate::domain::config::HarnessConfig;
use crate::domain::options::RunOptions;
use crate::domain::output;

/// One verification run, as requested by the caller.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Root folder the module path is relative to.
    pub root: PathBuf,
    /// Module directory, relative to `root`.
    pub module: PathBuf,
    /// Variable file names, in the order they are passed to terraform.
    pub var_files: Vec<String>,
    /// Remote state object key. Passed through without validation — an
    /// empty key is the backend's to accept or reject.
    pub state_key: String,
    /// Name of the output attribute that must be present after apply.
    pub output_name: String,
    /// Append a UTC run stamp to the state key so concurrent runs of the
    /// same module cannot collide on remote state.
    pub unique_key: bool,
}

/// What a completed run did and found.
#[derive(Debug)]
pub struct RunReport {
    /// The state key actually sent to the backend.
    pub state_key: String,
    /// The staged working directory the run used (removed by the time the
    /// report is returned).
    pub module_dir: PathBuf,
    /// Name of the verified output attribute.
    pub output_name: String,
    /// Its rendered value.
    pub output_value: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Run the full lifecycle for one module and verify the named output.
///
/// # Errors
///
/// Fails if staging, init/apply, the output read, the presence assertion,
/// or teardown fails. A teardown failure after a failed body is reported
/// as a warning rather than masking the primary error.
pub async fn verify_module(
    tf: &impl Terraform,
    stager: &impl ModuleStager,
    reporter: &impl ProgressReporter,
    config: &HarnessConfig,
    request: &RunRequest,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let state_key = effective_state_key(request, started_at);

    reporter.step(&format!(
        "Staging {} into a temporary directory...",
        request.module.display()
    ));
    let staged = stager
        .stage(&request.root, &request.module)
        .context("staging module")?;
    let module_dir = staged.path().to_path_buf();

    let opts = RunOptions::new(
        module_dir.clone(),
        request.var_files.clone(),
        config.backend.config_pairs(&state_key),
    );

    let body = apply_and_read(tf, reporter, &opts, &request.output_name).await;

    reporter.step("Destroying provisioned resources...");
    let teardown = teardown(tf, &opts, staged).await;

    match (body, teardown) {
        (Ok(output_value), Ok(())) => {
            reporter.success(&format!(
                "{} = {output_value}; resources destroyed",
                request.output_name
            ));
            Ok(RunReport {
                state_key,
                module_dir,
                output_name: request.output_name.clone(),
                output_value,
                started_at,
                finished_at: Utc::now(),
            })
        }
        // A clean body does not excuse a failed teardown: resources may
        // still exist.
        (Ok(_), Err(teardown_err)) => Err(teardown_err),
        (Err(body_err), Ok(())) => Err(body_err),
        (Err(body_err), Err(teardown_err)) => {
            reporter.warn(&format!("teardown also failed: {teardown_err:#}"));
            Err(body_err)
        }
    }
}

/// The apply-and-verify body of the run. Split out so teardown can run no
/// matter where this fails.
async fn apply_and_read(
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
    opts: &RunOptions,
    output_name: &str,
) -> Result<String> {
    reporter.step("Initializing and applying module...");
    tf.init_and_apply(opts).await?;

    reporter.step(&format!("Reading output '{output_name}'..."));
    let value = tf.output(opts, output_name).await?;
    let rendered = output::require_nonempty(output_name, &value)?;
    Ok(rendered)
}

/// Destroy the provisioned resources, then remove the staging directory.
///
/// If destroy fails, the staging directory is still removed — by
/// `StagedModule`'s drop — so the temp copy never survives the run.
async fn teardown(tf: &impl Terraform, opts: &RunOptions, staged: StagedModule) -> Result<()> {
    tf.destroy(opts)
        .await
        .context("destroying provisioned resources")?;
    staged.close().context("removing staging directory")
}

/// The state key sent to the backend: the requested key as-is, or with a
/// UTC run stamp appended when unique keys were asked for.
fn effective_state_key(request: &RunRequest, started_at: DateTime<Utc>) -> String {
    if !request.unique_key {
        return request.state_key.clone();
    }
    let stamp = started_at.format("%Y%m%d%H%M%S");
    if request.state_key.is_empty() {
        stamp.to_string()
    } else {
        format!("{}-{stamp}", request.state_key)
    }
}
