//! Infrastructure implementation of the terraform port traits.
//!
//! `TerraformCli<R>` routes all terraform CLI calls through a
//! `CommandRunner` and applies the retryable-error policy to every
//! operation. Lifecycle operations (init/apply/destroy) and inspection
//! operations (version/output) run with separate timeout budgets.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ModuleLifecycle, StateOutputs};
use crate::domain::config::HarnessConfig;
use crate::domain::error::TerraformError;
use crate::domain::options::RunOptions;
use crate::domain::retry::RetryPolicy;
use crate::infra::command_runner::TokioCommandRunner;

/// How much of a failed operation's combined output is kept in the error.
const ERROR_EXCERPT_LEN: usize = 4096;

/// Infrastructure adapter that routes all terraform CLI calls through a
/// `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    bin: String,
    policy: RetryPolicy,
    cmd_runner: R,
    apply_runner: R,
}

impl<R: CommandRunner> TerraformCli<R> {
    /// Create an adapter with explicit runner instances.
    pub fn new(bin: impl Into<String>, policy: RetryPolicy, cmd_runner: R, apply_runner: R) -> Self {
        Self {
            bin: bin.into(),
            policy,
            cmd_runner,
            apply_runner,
        }
    }

    /// Run one terraform operation, retrying failures the policy classifies
    /// as transient. Attempts are spaced by the policy's backoff.
    async fn run_terraform(
        &self,
        runner: &R,
        args: &[String],
        dir: &Path,
        operation: &'static str,
    ) -> Result<Output> {
        let mut attempt = 1;
        loop {
            let out = runner
                .run(&self.bin, args, dir)
                .await
                .with_context(|| format!("terraform {operation}"))?;
            if out.status.success() {
                return Ok(out);
            }

            let combined = combined_output(&out);
            if attempt < self.policy.max_attempts && self.policy.classify(&combined).is_some() {
                attempt += 1;
                tokio::time::sleep(self.policy.backoff).await;
                continue;
            }

            return Err(TerraformError::CommandFailed {
                operation,
                output: tail(&combined, ERROR_EXCERPT_LEN),
            }
            .into());
        }
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.terraform_bin.clone(),
            RetryPolicy::from_settings(&config.retry),
            TokioCommandRunner::new(std::time::Duration::from_secs(config.command_timeout_secs)),
            TokioCommandRunner::new(std::time::Duration::from_secs(config.apply_timeout_secs)),
        )
    }
}

impl<R: CommandRunner> ModuleLifecycle for TerraformCli<R> {
    async fn init_and_apply(&self, opts: &RunOptions) -> Result<Output> {
        self.run_terraform(&self.apply_runner, &opts.init_args(), &opts.dir, "init")
            .await?;
        self.run_terraform(&self.apply_runner, &opts.apply_args(), &opts.dir, "apply")
            .await
    }

    async fn destroy(&self, opts: &RunOptions) -> Result<Output> {
        self.run_terraform(&self.apply_runner, &opts.destroy_args(), &opts.dir, "destroy")
            .await
    }
}

impl<R: CommandRunner> StateOutputs for TerraformCli<R> {
    async fn output(&self, opts: &RunOptions, name: &str) -> Result<serde_json::Value> {
        let out = self
            .run_terraform(
                &self.cmd_runner,
                &RunOptions::output_args(name),
                &opts.dir,
                "output",
            )
            .await?;
        serde_json::from_slice(&out.stdout).map_err(|e| {
            TerraformError::MalformedJson {
                operation: "output",
                detail: e.to_string(),
            }
            .into()
        })
    }

    async fn version(&self) -> Result<String> {
        let args = vec!["version".to_string()];
        let out = self
            .run_terraform(&self.cmd_runner, &args, Path::new("."), "version")
            .await?;
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }
}

/// stdout and stderr of a finished process, concatenated for matching and
/// error reporting.
fn combined_output(out: &Output) -> String {
    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
    if !out.stderr.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&out.stderr));
    }
    text
}

/// Last `max` bytes of `text`, on a char boundary.
fn tail(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}
