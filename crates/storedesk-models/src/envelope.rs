//! The `{ success, data?, message? }` envelope every admin endpoint answers with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback message when the server rejects a request without explaining why.
pub const DEFAULT_REJECTION: &str = "request rejected";

/// Response envelope shared by every admin endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the server accepted the request.
    pub success: bool,
    /// Payload on success. Shape varies per endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable explanation, mostly present on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful envelope with no payload (typical for deletes).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// Rejected envelope carrying a server message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Split the envelope into its payload or the rejection message.
    ///
    /// # Errors
    /// Returns the server message (or [`DEFAULT_REJECTION`]) when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_carries_server_message() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "message": "not found"}))
                .expect("envelope");
        assert_eq!(envelope.into_result(), Err("not found".to_string()));
    }

    #[test]
    fn rejection_without_message_uses_default() {
        let envelope: Envelope = serde_json::from_value(json!({"success": false, "message": " "}))
            .expect("envelope");
        assert_eq!(envelope.into_result(), Err(DEFAULT_REJECTION.to_string()));
    }

    #[test]
    fn success_without_data_is_empty() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true})).expect("envelope");
        assert_eq!(envelope.into_result(), Ok(None));
    }
}
