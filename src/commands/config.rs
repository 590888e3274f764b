//! `tfcheck config` — inspect and initialize the harness configuration.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a config file with the default settings
    Init,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read, parsed or written.
pub fn run(cmd: ConfigCommand, app: &AppContext) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(app),
        ConfigCommand::Path => {
            println!("{}", app.config_store.path()?.display());
            Ok(())
        }
        ConfigCommand::Init => init(app),
    }
}

fn show(app: &AppContext) -> Result<()> {
    let config = app.config_store.load()?;
    if app.is_json() {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!(
            "{}",
            serde_yaml::to_string(&config).context("cannot serialize config")?
        );
    }
    Ok(())
}

fn init(app: &AppContext) -> Result<()> {
    let path = app.config_store.path()?;
    if path.exists() && !app.confirm(&format!("Overwrite {}?", path.display()), false)? {
        anyhow::bail!("aborted");
    }
    app.config_store
        .save(&crate::domain::config::HarnessConfig::default())?;
    app.output
        .success(&format!("Wrote defaults to {}", path.display()));
    Ok(())
}
