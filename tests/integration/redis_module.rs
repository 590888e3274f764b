//! End-to-end verification of the repository's redis module.
//!
//! This is the real thing: it stages `modules/redis`, runs
//! `terraform init` + `apply` against AWS with the `dev.tfvars` variable
//! file, asserts the `id` output is non-empty, then destroys everything
//! and removes the staged copy. Ignored by default because it provisions
//! (and pays for) real infrastructure.
//!
//! Requirements when run: `terraform` on PATH, AWS credentials in the
//! environment, and optionally `terraformS3Key` naming the remote state
//! object for this run.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use tfcheck_cli::application::ports::ProgressReporter;
use tfcheck_cli::application::services::run::{RunRequest, verify_module};
use tfcheck_cli::domain::config::HarnessConfig;
use tfcheck_cli::infra::staging::TempStager;
use tfcheck_cli::infra::terraform::TerraformCli;

struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn step(&self, message: &str) {
        println!("-> {message}");
    }
    fn success(&self, message: &str) {
        println!("ok {message}");
    }
    fn warn(&self, message: &str) {
        println!("!! {message}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[tokio::test]
#[ignore = "provisions real AWS resources; requires terraform on PATH and credentials"]
async fn redis_module_apply_exposes_a_cluster_id() {
    let state_key = std::env::var("terraformS3Key").unwrap_or_default();

    let config = HarnessConfig::default();
    let tf = TerraformCli::from_config(&config);
    let request = RunRequest {
        root: repo_root(),
        module: PathBuf::from("modules/redis"),
        var_files: vec!["dev.tfvars".to_string()],
        state_key,
        output_name: "id".to_string(),
        // Stamped key so a concurrent CI run cannot collide on state.
        unique_key: true,
    };

    let report = verify_module(&tf, &TempStager, &StdoutReporter, &config, &request)
        .await
        .expect("provision, verify and destroy should succeed");

    assert!(
        !report.output_value.is_empty(),
        "output 'id' must be non-empty"
    );
    assert_ne!(report.module_dir, repo_root().join("modules/redis"));
    assert!(
        !report.module_dir.exists(),
        "staging directory must be removed after the run"
    );
}
