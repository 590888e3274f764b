//! Run options and terraform argument construction.
//!
//! `RunOptions` is the fully-resolved configuration for one lifecycle run:
//! the staged working directory, the variable files, and the backend
//! configuration pairs. The `*_args` methods build the exact argument
//! vectors handed to the terraform binary, so they can be unit tested
//! without spawning anything.

use std::path::PathBuf;

/// Fully-resolved options for one terraform lifecycle run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working directory terraform runs in — always a staged copy, never
    /// the source module tree.
    pub dir: PathBuf,
    /// Variable file names passed as `-var-file` flags, in order.
    pub var_files: Vec<String>,
    /// Whether `init` upgrades provider plugins (`-upgrade`).
    pub upgrade: bool,
    /// Whether state locking is requested (`-lock`).
    pub lock: bool,
    /// `key=value` pairs passed to `init` as `-backend-config` flags.
    pub backend_config: Vec<(String, String)>,
}

impl RunOptions {
    /// Options with the defaults the verification lifecycle uses: provider
    /// upgrade on, state locking on.
    #[must_use]
    pub fn new(
        dir: PathBuf,
        var_files: Vec<String>,
        backend_config: Vec<(String, String)>,
    ) -> Self {
        Self {
            dir,
            var_files,
            upgrade: true,
            lock: true,
            backend_config,
        }
    }

    /// Arguments for `terraform init`.
    ///
    /// `-force-copy` answers the "copy existing state" prompt so init can
    /// never block on stdin.
    #[must_use]
    pub fn init_args(&self) -> Vec<String> {
        let mut args = vec![
            "init".to_string(),
            format!("-upgrade={}", self.upgrade),
            "-input=false".to_string(),
            "-no-color".to_string(),
            "-force-copy".to_string(),
        ];
        for (key, value) in &self.backend_config {
            args.push(format!("-backend-config={key}={value}"));
        }
        args
    }

    /// Arguments for `terraform apply`.
    #[must_use]
    pub fn apply_args(&self) -> Vec<String> {
        self.apply_like_args("apply")
    }

    /// Arguments for `terraform destroy`.
    #[must_use]
    pub fn destroy_args(&self) -> Vec<String> {
        self.apply_like_args("destroy")
    }

    /// Arguments for `terraform output -json <name>`.
    #[must_use]
    pub fn output_args(name: &str) -> Vec<String> {
        vec![
            "output".to_string(),
            "-no-color".to_string(),
            "-json".to_string(),
            name.to_string(),
        ]
    }

    /// apply and destroy take the same flag set.
    fn apply_like_args(&self, verb: &str) -> Vec<String> {
        let mut args = vec![
            verb.to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
            "-no-color".to_string(),
            format!("-lock={}", self.lock),
        ];
        for file in &self.var_files {
            args.push(format!("-var-file={file}"));
        }
        args
    }
}
