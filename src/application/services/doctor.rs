//! Application service — environment diagnosis.
//!
//! Checks the pieces a verification run depends on: the terraform binary,
//! the harness configuration, the module directory, and the state-key
//! environment variable. The state-key check can only warn — an unset key
//! is passed through to the backend by design, never rejected locally.

use std::path::Path;

use crate::application::ports::{ConfigStore, StateOutputs};

/// Name of the environment variable supplying the remote state object key.
pub const STATE_KEY_ENV: &str = "terraformS3Key";

/// One diagnostic check result.
#[derive(Debug)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// All checks from one doctor run.
#[derive(Debug)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    /// True when every check passed.
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }
}

/// Run all diagnostics.
pub async fn diagnose(
    tf: &impl StateOutputs,
    store: &impl ConfigStore,
    root: &Path,
    module: &Path,
) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match tf.version().await {
        Ok(version) => DoctorCheck {
            name: "terraform binary",
            ok: true,
            detail: version,
        },
        Err(e) => DoctorCheck {
            name: "terraform binary",
            ok: false,
            detail: format!("{e:#}"),
        },
    });

    checks.push(match store.load() {
        Ok(config) => DoctorCheck {
            name: "configuration",
            ok: true,
            detail: format!(
                "backend bucket '{}' in {}",
                config.backend.bucket, config.backend.region
            ),
        },
        Err(e) => DoctorCheck {
            name: "configuration",
            ok: false,
            detail: format!("{e:#}"),
        },
    });

    let module_dir = root.join(module);
    checks.push(if module_dir.is_dir() {
        DoctorCheck {
            name: "module directory",
            ok: true,
            detail: module_dir.display().to_string(),
        }
    } else {
        DoctorCheck {
            name: "module directory",
            ok: false,
            detail: format!("{} does not exist", module_dir.display()),
        }
    });

    // Informational only: an empty key is forwarded to the backend as-is.
    checks.push(match std::env::var(STATE_KEY_ENV) {
        Ok(key) if !key.is_empty() => DoctorCheck {
            name: "state key",
            ok: true,
            detail: format!("{STATE_KEY_ENV} is set"),
        },
        _ => DoctorCheck {
            name: "state key",
            ok: true,
            detail: format!("{STATE_KEY_ENV} not set; an empty key will be passed through"),
        },
    });

    DoctorReport { checks }
}
