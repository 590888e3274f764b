//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Provision, verify and tear down Terraform modules
#[derive(Parser)]
#[command(
    name = "tfcheck",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip interactive prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision a module, verify an output, destroy everything
    Run(commands::run::RunArgs),

    /// Diagnose the environment a run depends on
    Doctor(commands::doctor::DoctorArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Dispatch the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the failing command's error; `main` prints it and exits 1.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&AppFlags {
            json: self.json,
            quiet: self.quiet,
            no_color: self.no_color,
            yes: self.yes,
        });

        match self.command {
            Command::Run(args) => commands::run::run(&args, &app).await,
            Command::Doctor(args) => commands::doctor::run(&args, &app).await,
            Command::Config(cmd) => commands::config::run(cmd, &app),
            Command::Version => {
                commands::version::run(app.is_json());
                Ok(())
            }
        }
    }
}
