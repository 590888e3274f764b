//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is constructed once in `Cli::run()` and passed as
//! `&AppContext` to all command handlers, so cross-cutting concerns
//! (output flags, config store, prompt suppression) live in one place.

use anyhow::Result;

use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Enable JSON output mode.
    pub json: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Skip interactive prompts (also set by `CI` / `TFCHECK_YES` env vars).
    pub yes: bool,
}

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Harness configuration store.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("TFCHECK_YES").is_ok();
        let non_interactive = flags.yes || ci_env;

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            config_store: YamlConfigStore,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `TFCHECK_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
