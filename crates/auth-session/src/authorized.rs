//! Authenticated request wrapper with transparent refresh.

use crate::vault::TokenVault;
use api_client::{ApiClient, ApiResult, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// An [`ApiClient`] bound to a [`TokenVault`].
///
/// Refreshes proactively when the stored access token is expired, and
/// retries exactly once after an unexpected 401. A failed refresh
/// surfaces the original error; the vault has already cleared the
/// session by then.
#[derive(Debug, Clone)]
pub struct AuthorizedApi {
    api: ApiClient,
    vault: TokenVault,
}

impl AuthorizedApi {
    pub fn new(base_url: impl Into<String>, vault: TokenVault) -> Self {
        let api = ApiClient::new(base_url).with_token_provider(Arc::new(vault.clone()));
        Self { api, vault }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> ApiResult<T> {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<T> {
        if self.vault.is_expired() && self.vault.refresh_token().is_some() {
            debug!("Access token expired, refreshing before request");
            self.vault.refresh().await;
        }

        match self.api.execute(method.clone(), path, body, None).await {
            Err(error) if error.is_unauthorized() => {
                debug!("Request returned 401, attempting token refresh");
                match self.vault.refresh().await {
                    Some(_) => self.api.execute(method, path, body, None).await,
                    None => Err(error),
                }
            }
            other => other,
        }
    }
}
