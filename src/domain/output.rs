//! Output attribute values read back from applied state.
//!
//! `terraform output -json <name>` prints one JSON document: the value of
//! that output. Scalars render to their bare string form, compound values
//! to compact JSON, so callers always see a displayable string.

use serde_json::Value;

use crate::domain::error::OutputError;

/// Render an output value to its display string.
///
/// Strings render bare (no quotes), everything else as compact JSON.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Assert the named output is present and non-empty, returning its
/// rendered string form.
///
/// # Errors
///
/// `OutputError::Missing` when the value is JSON `null` (terraform's
/// encoding of an absent output), `OutputError::Empty` when it renders to
/// an empty string.
pub fn require_nonempty(name: &str, value: &Value) -> Result<String, OutputError> {
    if value.is_null() {
        return Err(OutputError::Missing(name.to_string()));
    }
    let rendered = render_value(value);
    if rendered.is_empty() {
        return Err(OutputError::Empty(name.to_string()));
    }
    Ok(rendered)
}
