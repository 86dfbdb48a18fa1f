//! HTTP client with bearer injection and envelope unwrapping.

use crate::error::{ApiError, ApiResult};
use crate::normalize::normalize_error_message;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of the current access token, if one is held.
///
/// Implemented by the token vault; the client itself never touches token
/// storage.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// HTTP client for the Meridian backend API.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            token_provider: None,
        }
    }

    /// Attach a token provider. Requests carry `Authorization: Bearer
    /// <token>` whenever the provider yields a token.
    pub fn with_token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Build the full URL for an endpoint path.
    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::GET, path, None, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> ApiResult<T> {
        self.execute(Method::POST, path, Some(body), None).await
    }

    /// Execute a request against the backend.
    ///
    /// Success bodies wrapped as `{data: <payload>}` are unwrapped one
    /// level; callers always receive the inner payload. Failure bodies go
    /// through the error normalizer and surface as [`ApiError::Backend`]
    /// with status and raw body preserved.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> ApiResult<T> {
        let url = self.endpoint_url(path);

        debug!(method = %method, url = %url, "Executing API request");

        let mut request = self
            .http_client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(provider) = &self.token_provider {
            if let Some(token) = provider.access_token() {
                request = request.bearer_auth(token);
            }
        }

        // Caller headers land last and may override Content-Type
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(backend_error(status, &text));
        }

        let value: Value = serde_json::from_str(&text)?;
        Ok(serde_json::from_value(unwrap_envelope(value))?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Build the canonical error for a non-success response.
fn backend_error(status: StatusCode, text: &str) -> ApiError {
    // An undecodable error body is treated as an empty object
    let body: Value =
        serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Default::default()));
    let message = normalize_error_message(
        &body,
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
    );

    warn!(status = %status, message = %message, "API request failed");

    ApiError::Backend {
        status: status.as_u16(),
        message,
        body,
    }
}

/// Unwrap a single `{data: ...}` envelope level. Never recurses.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
