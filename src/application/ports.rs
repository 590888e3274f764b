//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::HarnessConfig;
use crate::domain::options::RunOptions;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Terraform is directory-scoped, so every run takes an explicit working
/// directory.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program in `cwd` and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<Output>;

    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds
    /// `timeout`. On timeout, the child process must be killed (not left
    /// orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Terraform Ports ───────────────────────────────────────────────────────────

/// Module lifecycle operations: create and destroy real infrastructure.
#[allow(async_fn_in_trait)]
pub trait ModuleLifecycle {
    /// Run `terraform init` followed by `terraform apply` as one combined
    /// operation. Any error in either step is the operation's error.
    async fn init_and_apply(&self, opts: &RunOptions) -> Result<Output>;
    /// Run `terraform destroy` against the same working directory.
    async fn destroy(&self, opts: &RunOptions) -> Result<Output>;
}

/// Read-only queries against applied state and the tool itself.
#[allow(async_fn_in_trait)]
pub trait StateOutputs {
    /// Read one named output attribute from applied state as JSON.
    async fn output(&self, opts: &RunOptions, name: &str) -> Result<serde_json::Value>;
    /// The terraform binary's version line.
    async fn version(&self) -> Result<String>;
}

/// Composite trait — any type implementing both sub-traits is a `Terraform`.
pub trait Terraform: ModuleLifecycle + StateOutputs {}

/// Blanket implementation: any type implementing both sub-traits is a `Terraform`.
impl<T> Terraform for T where T: ModuleLifecycle + StateOutputs {}

// ── Staging Port ──────────────────────────────────────────────────────────────

/// A module tree staged into an isolated temporary directory.
///
/// The directory is owned exclusively by the run: dropping this value
/// removes it, and [`StagedModule::close`] removes it with error
/// propagation. Either way the staged copy never outlives the run.
#[derive(Debug)]
pub struct StagedModule {
    dir: tempfile::TempDir,
}

impl StagedModule {
    #[must_use]
    pub fn new(dir: tempfile::TempDir) -> Self {
        Self { dir }
    }

    /// Path of the staged copy.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the staged copy, surfacing any filesystem error.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    pub fn close(self) -> Result<()> {
        self.dir.close().map_err(Into::into)
    }
}

/// Abstracts staging a module tree into a temporary working directory, so
/// tests can observe or substitute the staged location.
pub trait ModuleStager {
    /// Copy the module at `module_rel` (relative to `root`) into a fresh
    /// temporary directory and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist or the copy fails.
    fn stage(&self, root: &Path, module_rel: &Path) -> Result<StagedModule>;
}

// ── Config Store Port ─────────────────────────────────────────────────────────

/// Abstracts harness configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    fn load(&self) -> Result<HarnessConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &HarnessConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
