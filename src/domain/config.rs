//! Harness configuration — terraform binary, remote state backend, retry
//! and timeout settings.
//!
//! Everything here has a usable default so a missing config file is never an
//! error. The remote state object key is deliberately absent: it belongs to
//! a single run, not to the installation, and is injected per run.

use serde::{Deserialize, Serialize};

/// Top-level harness configuration, persisted as YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Name or path of the terraform binary to invoke.
    pub terraform_bin: String,
    /// Remote state backend parameters.
    pub backend: BackendSettings,
    /// Retry behaviour for known-transient provisioning errors.
    pub retry: RetrySettings,
    /// Upper bound for init/apply/destroy, in seconds. These operations
    /// create real infrastructure and can legitimately run for a long time;
    /// the bound only guarantees a hung process is killed, not orphaned.
    pub apply_timeout_secs: u64,
    /// Upper bound for inspection operations (version, output), in seconds.
    pub command_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            terraform_bin: "terraform".to_string(),
            backend: BackendSettings::default(),
            retry: RetrySettings::default(),
            apply_timeout_secs: 3600,
            command_timeout_secs: 60,
        }
    }
}

/// Remote state backend parameters for `terraform init`.
///
/// All fields are installation constants; the state object key varies per
/// run and is supplied to [`BackendSettings::config_pairs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// S3 bucket holding remote state.
    pub bucket: String,
    /// AWS region of the bucket and lock table.
    pub region: String,
    /// DynamoDB table used for state locking.
    pub dynamodb_table: String,
    /// Canned ACL applied to the state object.
    pub acl: String,
    /// Whether server-side encryption is requested for the state object.
    pub encrypt: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            bucket: "adex-terraform-state".to_string(),
            region: "us-east-1".to_string(),
            dynamodb_table: "adex-terraform-state".to_string(),
            acl: "bucket-owner-full-control".to_string(),
            encrypt: true,
        }
    }
}

impl BackendSettings {
    /// Build the ordered `key=value` pairs passed to `terraform init` as
    /// `-backend-config` flags.
    ///
    /// `state_key` is passed through exactly as given — an empty key is the
    /// backend's problem to reject, not ours.
    #[must_use]
    pub fn config_pairs(&self, state_key: &str) -> Vec<(String, String)> {
        vec![
            ("bucket".to_string(), self.bucket.clone()),
            ("key".to_string(), state_key.to_string()),
            ("region".to_string(), self.region.clone()),
            ("dynamodb_table".to_string(), self.dynamodb_table.clone()),
            ("acl".to_string(), self.acl.clone()),
            ("encrypt".to_string(), self.encrypt.to_string()),
        ]
    }
}

/// Retry settings for known-transient provisioning errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per terraform operation, including the first.
    pub max_attempts: u32,
    /// Seconds to wait between attempts.
    pub backoff_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 5,
        }
    }
}
