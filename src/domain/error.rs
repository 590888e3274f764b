//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Terraform errors ──────────────────────────────────────────────────────────

/// Errors surfaced by terraform operations.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform {operation} failed:\n{output}")]
    CommandFailed {
        operation: &'static str,
        output: String,
    },

    #[error("terraform {operation} produced output that is not valid JSON: {detail}")]
    MalformedJson {
        operation: &'static str,
        detail: String,
    },
}

// ── Output verification errors ────────────────────────────────────────────────

/// Errors raised when asserting on a module output attribute.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output '{0}' is not present in the applied state")]
    Missing(String),

    #[error("output '{0}' is empty")]
    Empty(String),
}
