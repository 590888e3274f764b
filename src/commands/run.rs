//! `tfcheck run` — provision a module, verify an output, destroy everything.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::run::{self as service, RunRequest};
use crate::infra::staging::TempStager;
use crate::infra::terraform::TerraformCli;
use crate::output::reporter::TerminalReporter;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Module directory, relative to --root
    #[arg(long, default_value = "modules/redis", value_name = "DIR")]
    pub module: PathBuf,

    /// Root folder the module path is relative to
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Variable file passed to terraform (repeatable)
    #[arg(long = "var-file", default_value = "dev.tfvars", value_name = "FILE")]
    pub var_files: Vec<String>,

    /// Output attribute that must be non-empty after apply
    #[arg(long, default_value = "id", value_name = "NAME")]
    pub output: String,

    /// Remote state object key. Empty is passed through to the backend
    /// unchanged.
    #[arg(
        long,
        env = "terraformS3Key",
        default_value = "",
        hide_env_values = true,
        value_name = "KEY"
    )]
    pub state_key: String,

    /// Append a UTC run stamp to the state key so concurrent runs cannot
    /// collide on remote state
    #[arg(long)]
    pub unique_key: bool,
}

/// Run `tfcheck run`.
///
/// # Errors
///
/// Returns an error if the run is declined, or if staging, apply, output
/// verification, or teardown fails.
pub async fn run(args: &RunArgs, app: &AppContext) -> Result<()> {
    let module = args.root.join(&args.module);
    if !app.confirm(
        &format!(
            "Provision real infrastructure from {} and destroy it afterwards?",
            module.display()
        ),
        true,
    )? {
        anyhow::bail!("aborted");
    }

    let config = app.config_store.load()?;
    let tf = TerraformCli::from_config(&config);
    let reporter = TerminalReporter::new(&app.output);

    let request = RunRequest {
        root: args.root.clone(),
        module: args.module.clone(),
        var_files: args.var_files.clone(),
        state_key: args.state_key.clone(),
        output_name: args.output.clone(),
        unique_key: args.unique_key,
    };

    let report = service::verify_module(&tf, &TempStager, &reporter, &config, &request).await?;
    drop(reporter);

    if app.is_json() {
        let doc = serde_json::json!({
            "module": args.module,
            "state_key": report.state_key,
            "output": { "name": report.output_name, "value": report.output_value },
            "started_at": report.started_at.to_rfc3339(),
            "finished_at": report.finished_at.to_rfc3339(),
        });
        println!("{doc}");
    } else {
        let ctx = &app.output;
        ctx.kv("Module", &args.module.display().to_string());
        ctx.kv(&report.output_name, &report.output_value);
        if !report.state_key.is_empty() {
            ctx.kv("State key", &report.state_key);
        }
        let elapsed = report.finished_at - report.started_at;
        ctx.kv("Duration", &format!("{}s", elapsed.num_seconds()));
    }

    Ok(())
}
