//! The request/response contract controllers depend on.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use storedesk_models::Envelope;

use crate::error::ApiError;

/// HTTP verbs the admin API uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a collection or record.
    Get,
    /// Create a record.
    Post,
    /// Replace fields on a record.
    Put,
    /// Patch fields on a record.
    Patch,
    /// Remove a record.
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Authenticated request issuer.
///
/// Implementations must not retry, and must return well-formed
/// `success: false` bodies as `Ok` envelopes rather than errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method path` with an optional JSON body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Envelope, ApiError>;
}
