//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` runs a spinner that the next event resolves; on a
/// plain stream the events degrade to prefixed lines:
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Resolve the active spinner, if any, as completed.
    fn finish_active(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            let msg = pb.message();
            progress::finish_ok(&pb, &msg);
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        // A step interrupted by an error leaves its spinner line in place.
        if let Some(pb) = self.active.borrow_mut().take() {
            pb.abandon();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish_active();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_ok(&pb, message);
        } else {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let active = self.active.borrow();
        if let Some(pb) = active.as_ref() {
            pb.println(format!("  {} {message}", "!".yellow()));
        } else {
            println!("  {} {message}", "!".yellow());
        }
    }
}
