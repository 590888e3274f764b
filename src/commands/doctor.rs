//! `tfcheck doctor` — diagnose the environment a run depends on.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::doctor::{self as service, DoctorReport};
use crate::infra::terraform::TerraformCli;
use crate::output::OutputContext;

/// Arguments for the doctor command.
#[derive(Args, Default)]
pub struct DoctorArgs {
    /// Module directory to check, relative to --root
    #[arg(long, default_value = "modules/redis", value_name = "DIR")]
    pub module: PathBuf,

    /// Root folder the module path is relative to
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,
}

/// Run `tfcheck doctor`.
///
/// # Errors
///
/// Returns an error when any check fails, so the process exits non-zero.
pub async fn run(args: &DoctorArgs, app: &AppContext) -> Result<()> {
    // A broken config file is itself a finding; diagnose with defaults.
    let config = app.config_store.load().unwrap_or_default();
    let tf = TerraformCli::from_config(&config);

    let report = service::diagnose(&tf, &app.config_store, &args.root, &args.module).await;

    if app.is_json() {
        print_json(&report);
    } else {
        print_human(&report, &app.output);
    }

    if report.healthy() {
        Ok(())
    } else {
        anyhow::bail!("doctor found problems")
    }
}

fn print_human(report: &DoctorReport, ctx: &OutputContext) {
    for check in &report.checks {
        if check.ok {
            ctx.success(&format!("{}: {}", check.name, check.detail));
        } else {
            ctx.error(&format!("{}: {}", check.name, check.detail));
        }
    }
}

fn print_json(report: &DoctorReport) {
    let checks: Vec<serde_json::Value> = report
        .checks
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "ok": c.ok,
                "detail": c.detail,
            })
        })
        .collect();
    let doc = serde_json::json!({ "healthy": report.healthy(), "checks": checks });
    println!("{doc}");
}
