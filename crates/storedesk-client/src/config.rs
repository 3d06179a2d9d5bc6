//! Client configuration and its validation.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/admin";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL failed to parse.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl {
        /// Raw input.
        value: String,
        /// Parser explanation.
        reason: String,
    },
    /// Base URL used a scheme other than http/https.
    #[error("unsupported API URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme {
        /// Offending scheme.
        scheme: String,
    },
    /// Timeout of zero seconds.
    #[error("timeout must be at least one second")]
    InvalidTimeout,
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Validated connection settings for [`crate::RestClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Admin API root; resource paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Validate raw settings.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the URL does not parse, is not http(s), or
    /// the timeout is zero.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let parsed = base_url
            .trim()
            .parse::<Url>()
            .map_err(|err| ConfigError::InvalidUrl {
                value: base_url.to_string(),
                reason: err.to_string(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            base_url: parsed,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Absolute URL for a resource path, keeping any path prefix on the base.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_prefix() {
        let config = ClientConfig::new("https://shop.example.com/api/admin/", 5).expect("config");
        assert_eq!(
            config.endpoint("/vendors/12"),
            "https://shop.example.com/api/admin/vendors/12"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert_eq!(
            ClientConfig::new("ftp://example.com", 5),
            Err(ConfigError::UnsupportedScheme {
                scheme: "ftp".into()
            })
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        assert_eq!(
            ClientConfig::new(DEFAULT_API_URL, 0),
            Err(ConfigError::InvalidTimeout)
        );
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(matches!(
            ClientConfig::new("not a url", 5),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
