//! Normalization failures raised while mapping wire payloads onto records.

use thiserror::Error;

/// A wire payload could not be mapped onto a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A status-like field carried a value outside the known set.
    #[error("unknown {field} value '{value}'")]
    UnknownValue {
        /// Wire field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// A required field was absent or empty.
    #[error("missing field '{field}'")]
    MissingField {
        /// Wire field name.
        field: &'static str,
    },
}
