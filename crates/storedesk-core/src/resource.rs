//! Per-resource behaviour the controller is parameterised by.
//!
//! # Design
//! - Each record type declares its endpoint, envelope key, and how it filters,
//!   sorts, and toggles. The controller stays ignorant of field names.
//! - Normalization goes through serde; the wire DTOs in `storedesk-models`
//!   absorb casing and status-flag differences.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storedesk_client::ApiError;
use storedesk_models::{Draft, FieldPatch};

use crate::confirm::ConfirmPrompt;
use crate::state::MutationKind;

/// How local state catches up after a successful mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Append, replace, or remove the affected record locally.
    PatchInPlace,
    /// Refetch the whole collection.
    Reload,
}

/// A record type managed by a [`crate::ListController`].
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection endpoint relative to the API base, e.g. `/vendors`.
    const COLLECTION_PATH: &'static str;
    /// Key under `data` holding the array when the server wraps it.
    const PLURAL_KEY: &'static str;
    /// Singular, lower-case name used in prompts and logs.
    const LABEL: &'static str;
    /// Reconciliation after mutations.
    const RECONCILE: ReconcilePolicy = ReconcilePolicy::PatchInPlace;

    /// Form draft editing this record.
    type Draft: Draft<Record = Self>;

    /// Stable identifier.
    fn id(&self) -> &str;

    /// Short human label (name, code, title).
    fn display_name(&self) -> &str;

    /// Canonical status value compared against the status filter.
    fn status_key(&self) -> &str;

    /// Text fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Sort keys accepted by [`Resource::compare`].
    fn sort_keys() -> &'static [&'static str];

    /// Compare by `key`; `None` when the key is not sortable.
    fn compare(&self, other: &Self, key: &str) -> Option<Ordering>;

    /// Single-field body flipping this record's status.
    fn toggle_patch(&self) -> FieldPatch;

    /// Status the record will have after a toggle.
    fn toggled_status(&self) -> &'static str;

    /// Canonical status for a filter value, accepting the same aliases as
    /// normalization. `None` when the value is not a known status.
    fn canonical_status(_filter: &str) -> Option<&'static str> {
        None
    }

    /// Whether the record passes the status filter.
    fn matches_status(&self, filter: &str) -> bool {
        let wanted = Self::canonical_status(filter).unwrap_or(filter);
        self.status_key().eq_ignore_ascii_case(wanted)
    }

    /// Whether a mutation echo carries a whole record rather than an id or a
    /// fragment. Wire DTOs default missing fields, so a bare `{"id": ..}`
    /// still normalizes.
    fn is_complete(&self) -> bool {
        !self.id().trim().is_empty() && !self.display_name().trim().is_empty()
    }

    /// Case-insensitive substring match; `needle` is already lower-cased.
    fn matches_search(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Prompt shown before a destructive or status-changing mutation.
    fn confirm_prompt(&self, kind: MutationKind) -> ConfirmPrompt {
        let name = self.display_name();
        let (title, message) = match kind {
            MutationKind::Delete => (
                format!("Delete {}", Self::LABEL),
                format!("Delete {} '{name}'? This cannot be undone.", Self::LABEL),
            ),
            MutationKind::ToggleStatus => (
                format!("Change {} status", Self::LABEL),
                format!(
                    "Mark {} '{name}' as {}?",
                    Self::LABEL,
                    self.toggled_status()
                ),
            ),
            MutationKind::Create | MutationKind::Update => (
                format!("Save {}", Self::LABEL),
                format!("Save changes to {} '{name}'?", Self::LABEL),
            ),
        };
        ConfirmPrompt {
            kind,
            target_id: self.id().to_string(),
            title,
            message,
        }
    }

    /// Build a record from one wire element.
    ///
    /// # Errors
    /// Returns a description of the first field that failed to normalize.
    fn normalize(value: Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|err| err.to_string())
    }
}

/// Pull the record array out of an envelope's `data`.
///
/// Accepts `data.<plural_key>` or a bare array; missing data is an empty
/// collection. One bad element fails the whole collection.
///
/// # Errors
/// Returns [`ApiError::MalformedResponse`] for any other shape or when an
/// element fails normalization.
pub fn extract_collection<R: Resource>(data: Option<Value>) -> Result<Vec<R>, ApiError> {
    let items = match data {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut map)) => match map.remove(R::PLURAL_KEY) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => return Ok(Vec::new()),
            _ => {
                return Err(ApiError::MalformedResponse(format!(
                    "expected an array under data.{}",
                    R::PLURAL_KEY
                )));
            }
        },
        Some(_) => {
            return Err(ApiError::MalformedResponse(format!(
                "expected {} as an array",
                R::PLURAL_KEY
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            R::normalize(item).map_err(|reason| {
                ApiError::MalformedResponse(format!("{} #{index}: {reason}", R::LABEL))
            })
        })
        .collect()
}

/// Pull a single echoed record out of a mutation response, if there is a
/// complete one.
pub(crate) fn extract_record<R: Resource>(data: Option<Value>) -> Option<R> {
    let record = match data? {
        Value::Object(mut map) => match map.remove(R::LABEL) {
            Some(inner @ Value::Object(_)) => R::normalize(inner).ok(),
            _ => R::normalize(Value::Object(map)).ok(),
        },
        _ => None,
    }?;
    record.is_complete().then_some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storedesk_models::{Admin, Vendor};

    #[test]
    fn accepts_wrapped_and_bare_arrays() {
        let wrapped = extract_collection::<Vendor>(Some(json!({
            "vendors": [{"id": 1, "businessName": "Acme", "email": "a@x.io", "isBlocked": false}]
        })))
        .expect("wrapped");
        let bare = extract_collection::<Vendor>(Some(json!([
            {"id": "1", "business_name": "Acme", "email": "a@x.io", "is_blocked": false}
        ])))
        .expect("bare");
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped[0].id, "1");
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(extract_collection::<Admin>(None).expect("none").is_empty());
        assert!(
            extract_collection::<Admin>(Some(json!({"admins": null})))
                .expect("null")
                .is_empty()
        );
    }

    #[test]
    fn one_bad_element_fails_the_load() {
        let err = extract_collection::<Admin>(Some(json!([
            {"id": "a", "name": "Ada", "email": "ada@x.io", "status": "active"},
            {"id": "b", "name": "Bob", "email": "bob@x.io", "status": "on-vacation"}
        ])))
        .expect_err("unknown status");
        assert!(matches!(err, ApiError::MalformedResponse(message) if message.starts_with("admin #1")));
    }

    #[test]
    fn scalar_data_is_malformed() {
        assert!(matches!(
            extract_collection::<Admin>(Some(json!("nope"))),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn echoed_record_may_be_wrapped_by_label() {
        let record = extract_record::<Admin>(Some(json!({
            "admin": {"id": 7, "name": "Ada", "email": "ada@x.io", "status": "active"}
        })));
        assert_eq!(record.map(|admin| admin.id), Some("7".to_string()));
        assert!(extract_record::<Admin>(Some(json!({"deleted": true}))).is_none());
    }

    #[test]
    fn id_only_echo_is_not_a_record() {
        assert!(extract_record::<Admin>(Some(json!({"id": "A"}))).is_none());
        assert!(extract_record::<Admin>(Some(json!({"admin": {"id": 7}}))).is_none());
        assert!(extract_record::<Vendor>(Some(json!({"id": 3, "isBlocked": true}))).is_none());
    }
}
