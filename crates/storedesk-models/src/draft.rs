//! Form draft contract and the parsing helpers drafts share.
//!
//! # Design
//! - Keep form inputs as strings for lossless editing.
//! - Convert to a [`FieldPatch`] only on submit, diffing against the original
//!   record so updates carry changed fields only.
//! - Treat empty inputs as unset values.

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use crate::patch::FieldPatch;

/// A staged, possibly partial record edited by a form.
pub trait Draft: Clone + Debug + Default + Send + Sync + 'static {
    /// Record type the draft edits.
    type Record;

    /// Prefill a draft from an existing record (edit flow).
    fn from_record(record: &Self::Record) -> Self;

    /// Identifier of the record being edited; `None` for creation.
    fn target_id(&self) -> Option<&str>;

    /// Assign a form field by wire name.
    ///
    /// # Errors
    /// Returns a message when the field does not exist on this draft.
    fn set_field(&mut self, key: &str, value: String) -> Result<(), String>;

    /// Build the request body, diffing against `original` when editing.
    ///
    /// # Errors
    /// Returns a human-readable message when required fields are missing or a
    /// field fails to parse.
    fn to_patch(&self, original: Option<&Self::Record>) -> Result<FieldPatch, String>;

    /// Check the draft without building a request body.
    ///
    /// # Errors
    /// Returns the same message [`Draft::to_patch`] would.
    fn validate(&self, original: Option<&Self::Record>) -> Result<(), String> {
        self.to_patch(original).map(|_| ())
    }
}

pub(crate) fn unknown_field(key: &str) -> String {
    format!("unknown field '{key}'")
}

/// Required text: blank input is an error, unchanged input is skipped.
pub(crate) fn required_text(
    patch: &mut FieldPatch,
    key: &str,
    label: &str,
    input: &str,
    current: Option<&str>,
) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is required"));
    }
    if current != Some(trimmed) {
        patch.insert(key, trimmed);
    }
    Ok(())
}

/// Optional text: blank clears the field (sent as `null` on update).
pub(crate) fn optional_text(patch: &mut FieldPatch, key: &str, input: &str, current: Option<&str>) {
    let trimmed = input.trim();
    let next = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    };
    if next != current {
        patch.insert(key, next.map_or(Value::Null, Value::from));
    }
}

/// Typed value: inserted when it differs from the current one.
pub(crate) fn value_field<T>(patch: &mut FieldPatch, key: &str, next: Option<T>, current: Option<T>)
where
    T: PartialEq + Serialize,
{
    if next != current {
        let value = next
            .and_then(|inner| serde_json::to_value(inner).ok())
            .unwrap_or(Value::Null);
        patch.insert(key, value);
    }
}

/// Passwords are only sent when provided; absence means "no change".
pub(crate) fn password_field(patch: &mut FieldPatch, input: &str) {
    if !input.trim().is_empty() {
        patch.insert("password", input);
    }
}

pub(crate) fn parse_optional_i32(field: &str, value: &str) -> Result<Option<i32>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = trimmed
        .parse::<i32>()
        .map_err(|_| format!("{field} must be an integer"))?;
    if parsed < 0 {
        return Err(format!("{field} must be zero or a positive integer"));
    }
    Ok(Some(parsed))
}

pub(crate) fn parse_optional_u32(field: &str, value: &str) -> Result<Option<u32>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = trimmed
        .parse::<u32>()
        .map_err(|_| format!("{field} must be a non-negative integer"))?;
    Ok(Some(parsed))
}

pub(crate) fn parse_optional_f64(field: &str, value: &str) -> Result<Option<f64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| format!("{field} must be a number"))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(format!("{field} must be a non-negative number"));
    }
    Ok(Some(parsed))
}

pub(crate) fn parse_bool(field: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" | "" => Ok(false),
        _ => Err(format!("{field} must be true or false")),
    }
}

pub(crate) fn option_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|inner| inner.to_string()).unwrap_or_default()
}
