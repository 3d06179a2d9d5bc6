//! Error taxonomy for admin API calls.

use thiserror::Error;

/// Coarse classification used by presentation layers to pick an affordance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No session token was available.
    AuthMissing,
    /// No response was received.
    NetworkError,
    /// The server answered with a non-2xx status or `success: false`.
    ServerRejected,
    /// The response did not match the expected envelope.
    MalformedResponse,
}

/// Failure of a single admin API call. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No token was available; the request never left the client.
    #[error("not signed in: no session token available")]
    AuthMissing,
    /// Transport-level failure (connect, timeout, reset).
    #[error("network error: {0}")]
    Network(String),
    /// The server refused the request.
    #[error("{message}")]
    ServerRejected {
        /// HTTP status when the rejection came from a non-2xx response.
        status: Option<u16>,
        /// Server-supplied explanation.
        message: String,
    },
    /// The response body did not match the envelope or record shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// Rejection carried by a well-formed `success: false` envelope.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::ServerRejected {
            status: None,
            message: message.into(),
        }
    }

    /// Discriminant for callers that branch on the failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthMissing => ErrorKind::AuthMissing,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::ServerRejected { .. } => ErrorKind::ServerRejected,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Single human-readable line for error banners.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_shown_verbatim() {
        let err = ApiError::rejected("not found");
        assert_eq!(err.user_message(), "not found");
        assert_eq!(err.kind(), ErrorKind::ServerRejected);
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(ApiError::AuthMissing.kind(), ErrorKind::AuthMissing);
        assert_eq!(
            ApiError::Network("reset".into()).kind(),
            ErrorKind::NetworkError
        );
        assert_eq!(
            ApiError::MalformedResponse("eof".into()).kind(),
            ErrorKind::MalformedResponse
        );
    }
}
