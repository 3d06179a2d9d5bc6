//! `reqwest`-backed [`Transport`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use storedesk_models::Envelope;
use uuid::Uuid;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::token::TokenSource;
use crate::transport::{Method, Transport};

/// Header carrying a per-request correlation id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Authenticated JSON client for the admin API.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenSource>,
}

impl RestClient {
    /// Build a client for `config`, reading tokens from `tokens`.
    ///
    /// # Errors
    /// Returns [`ConfigError::HttpClient`] if the TLS/HTTP stack fails to initialise.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

const fn verb(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Envelope, ApiError> {
        let Some(token) = self.tokens.token() else {
            tracing::warn!(%method, path, "no session token; request not sent");
            return Err(ApiError::AuthMissing);
        };

        let url = self.config.endpoint(path);
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%method, %url, request_id = %request_id, "sending admin API request");

        let mut builder = self
            .http
            .request(verb(method), &url)
            .bearer_auth(token)
            .header(HEADER_REQUEST_ID, &request_id);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            tracing::warn!(%method, %url, request_id = %request_id, error = %err, "admin API unreachable");
            ApiError::Network(err.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if !status.is_success() {
            let err = classify_rejection(status, &bytes);
            tracing::warn!(%method, %url, request_id = %request_id, status = status.as_u16(), error = %err, "admin API rejected request");
            return Err(err);
        }

        let envelope = parse_envelope(&bytes)?;
        tracing::debug!(
            %method,
            %url,
            request_id = %request_id,
            status = status.as_u16(),
            success = envelope.success,
            "admin API responded"
        );
        Ok(envelope)
    }
}

/// Decode a 2xx body. An empty body is treated as success without data.
fn parse_envelope(bytes: &[u8]) -> Result<Envelope, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Envelope::empty());
    }
    serde_json::from_slice::<Envelope>(bytes)
        .map_err(|err| ApiError::MalformedResponse(err.to_string()))
}

#[derive(Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a non-2xx response into [`ApiError::ServerRejected`], preferring the
/// server's `message` field, then the raw body text.
fn classify_rejection(status: StatusCode, bytes: &[u8]) -> ApiError {
    let body_text = String::from_utf8_lossy(bytes).trim().to_string();
    let structured = serde_json::from_slice::<RejectionBody>(bytes)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());

    let message = structured.unwrap_or_else(|| {
        if body_text.is_empty() || body_text.starts_with('{') {
            format!("request failed with status {status}")
        } else {
            body_text
        }
    });

    ApiError::ServerRejected {
        status: Some(status.as_u16()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use httpmock::Method as MockMethod;
    use httpmock::MockServer;
    use serde_json::json;

    use super::{RestClient, classify_rejection, parse_envelope};
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::token::StaticToken;
    use crate::transport::{Method, Transport};

    fn client(base: &str, token: StaticToken) -> Result<RestClient> {
        let config = ClientConfig::new(base, 5)?;
        Ok(RestClient::new(config, Arc::new(token))?)
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_request_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(MockMethod::GET)
                .path("/api/admin/vendors")
                .header("authorization", "Bearer secret")
                .header_exists("x-request-id");
            then.status(200)
                .json_body(json!({"success": true, "data": {"vendors": []}}));
        });

        let rest = client(&server.url("/api/admin"), StaticToken::new("secret"))?;
        let envelope = rest.request(Method::Get, "/vendors", None).await?;

        mock.assert();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!({"vendors": []})));
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_sends_nothing() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let rest = client(&server.base_url(), StaticToken::absent())?;
        let err = rest
            .request(Method::Delete, "/vendors/1", None)
            .await
            .expect_err("must fail");

        assert_eq!(err, ApiError::AuthMissing);
        mock.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn sends_json_body_on_writes() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(MockMethod::PUT)
                .path("/vendors/7")
                .json_body(json!({"is_blocked": true}));
            then.status(200).json_body(json!({"success": true}));
        });

        let rest = client(&server.base_url(), StaticToken::new("t"))?;
        let body = json!({"is_blocked": true});
        let envelope = rest.request(Method::Put, "/vendors/7", Some(&body)).await?;

        mock.assert();
        assert!(envelope.success);
        assert_eq!(envelope.data, None);
        Ok(())
    }

    #[tokio::test]
    async fn not_found_uses_server_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(MockMethod::DELETE).path("/categories/9");
            then.status(404)
                .json_body(json!({"success": false, "message": "not found"}));
        });

        let rest = client(&server.base_url(), StaticToken::new("t"))?;
        let err = rest
            .request(Method::Delete, "/categories/9", None)
            .await
            .expect_err("404 must fail");

        assert_eq!(
            err,
            ApiError::ServerRejected {
                status: Some(404),
                message: "not found".into()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn success_false_on_200_is_returned_as_envelope() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(MockMethod::POST).path("/coupons");
            then.status(200)
                .json_body(json!({"success": false, "message": "code already exists"}));
        });

        let rest = client(&server.base_url(), StaticToken::new("t"))?;
        let envelope = rest
            .request(Method::Post, "/coupons", Some(&json!({"code": "X"})))
            .await?;

        assert_eq!(
            envelope.into_result(),
            Err("code already exists".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(MockMethod::GET).path("/faqs");
            then.status(200).body("<html>oops</html>");
        });

        let rest = client(&server.base_url(), StaticToken::new("t"))?;
        let err = rest
            .request(Method::Get, "/faqs", None)
            .await
            .expect_err("garbage must fail");

        assert!(matches!(err, ApiError::MalformedResponse(_)));
        Ok(())
    }

    #[tokio::test]
    async fn no_content_counts_as_success() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(MockMethod::DELETE).path("/banners/3");
            then.status(204);
        });

        let rest = client(&server.base_url(), StaticToken::new("t"))?;
        let envelope = rest.request(Method::Delete, "/banners/3", None).await?;

        assert!(envelope.success);
        assert_eq!(envelope.data, None);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() -> Result<()> {
        let rest = client("http://127.0.0.1:9", StaticToken::new("t"))?;
        let err = rest
            .request(Method::Get, "/admins", None)
            .await
            .expect_err("closed port must fail");
        assert!(matches!(err, ApiError::Network(_)));
        Ok(())
    }

    #[test]
    fn rejection_falls_back_to_body_text_then_status() {
        let text = classify_rejection(reqwest::StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(text.user_message(), "upstream down");

        let empty = classify_rejection(reqwest::StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert_eq!(
            empty.user_message(),
            "request failed with status 500 Internal Server Error"
        );
    }

    #[test]
    fn whitespace_body_is_empty_success() {
        let envelope = parse_envelope(b"  \n").expect("empty body");
        assert!(envelope.success);
    }
}
