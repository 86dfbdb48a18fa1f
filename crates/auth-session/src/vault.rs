//! Token persistence and refresh.

use crate::grant::{SessionGrant, TokenRecord};
use api_client::{AccessTokenProvider, ApiClient};
use client_storage::{StateStore, StorageKeys, StorageResult};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const REFRESH_ENDPOINT: &str = "/api/v1/auth/refresh-token";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

/// Owns the persisted token pair and the refresh path.
///
/// Cheap to clone; all clones share one store handle and one in-flight
/// refresh slot, so concurrent callers coalesce onto a single network
/// request.
#[derive(Clone)]
pub struct TokenVault {
    inner: Arc<VaultInner>,
}

struct VaultInner {
    store: Arc<dyn StateStore>,
    api: ApiClient,
    in_flight: Mutex<Option<Shared<BoxFuture<'static, Option<String>>>>>,
}

impl TokenVault {
    /// Create a vault over the given store, refreshing against the given
    /// API base URL. The vault's own client carries no bearer token; the
    /// refresh endpoint authenticates by refresh token alone.
    pub fn new(store: Arc<dyn StateStore>, base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(VaultInner {
                store,
                api: ApiClient::new(base_url),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Persist a token pair. Both tokens land in one record so a partial
    /// write can never leave them mismatched.
    pub fn set_tokens(
        &self,
        access_token: String,
        refresh_token: String,
        expires_in: i64,
    ) -> StorageResult<()> {
        self.inner
            .persist(&TokenRecord::new(access_token, refresh_token, expires_in))
    }

    /// Persist the token pair from a session grant.
    pub fn store_grant(&self, grant: &SessionGrant) -> StorageResult<()> {
        self.inner.persist(&TokenRecord::from_grant(grant))
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.record().map(|record| record.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.record().map(|record| record.refresh_token)
    }

    /// True when no usable access token is held.
    pub fn is_expired(&self) -> bool {
        match self.inner.record() {
            Some(record) => record.is_expired(),
            None => true,
        }
    }

    /// Drop the stored token pair.
    pub fn clear_tokens(&self) -> StorageResult<()> {
        self.inner.store.delete(StorageKeys::SESSION_TOKENS)?;
        info!("Session tokens cleared");
        Ok(())
    }

    /// Exchange the stored refresh token for a fresh pair.
    ///
    /// Returns the new access token, or `None` when no refresh token is
    /// held or the exchange fails. A failed exchange clears the stored
    /// pair; the caller must re-authenticate. Concurrent calls share one
    /// network request.
    pub async fn refresh(&self) -> Option<String> {
        let shared = {
            let mut in_flight = self.inner.in_flight.lock().unwrap();
            match in_flight.as_ref() {
                Some(existing) => {
                    debug!("Joining in-flight token refresh");
                    existing.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    let fut = async move {
                        let result = inner.do_refresh().await;
                        inner.in_flight.lock().unwrap().take();
                        result
                    }
                    .boxed()
                    .shared();
                    *in_flight = Some(fut.clone());
                    fut
                }
            }
        };
        shared.await
    }
}

impl VaultInner {
    fn record(&self) -> Option<TokenRecord> {
        let raw = match self.store.get(StorageKeys::SESSION_TOKENS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(error = %error, "Failed to read session tokens");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(error = %error, "Stored session tokens are corrupt");
                None
            }
        }
    }

    fn persist(&self, record: &TokenRecord) -> StorageResult<()> {
        let raw = serde_json::to_string(record)
            .map_err(|e| client_storage::StorageError::Encoding(e.to_string()))?;
        self.store.set(StorageKeys::SESSION_TOKENS, &raw)
    }

    async fn do_refresh(&self) -> Option<String> {
        let record = self.record()?;
        if record.refresh_token.is_empty() {
            return None;
        }

        debug!("Refreshing access token");
        let response: Result<RefreshResponse, _> = self
            .api
            .post(
                REFRESH_ENDPOINT,
                &json!({ "refresh_token": record.refresh_token }),
            )
            .await;

        match response {
            Ok(tokens) => {
                let new_record = TokenRecord::new(
                    tokens.access_token.clone(),
                    tokens.refresh_token,
                    tokens.expires_in,
                );
                if let Err(error) = self.persist(&new_record) {
                    warn!(error = %error, "Failed to persist refreshed tokens");
                    let _ = self.store.delete(StorageKeys::SESSION_TOKENS);
                    return None;
                }
                info!("Access token refreshed");
                Some(tokens.access_token)
            }
            Err(error) => {
                warn!(error = %error, "Token refresh failed, clearing session");
                if let Err(error) = self.store.delete(StorageKeys::SESSION_TOKENS) {
                    warn!(error = %error, "Failed to clear session tokens");
                }
                None
            }
        }
    }
}

impl AccessTokenProvider for TokenVault {
    fn access_token(&self) -> Option<String> {
        TokenVault::access_token(self)
    }
}

impl std::fmt::Debug for TokenVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVault")
            .field("has_tokens", &self.inner.record().is_some())
            .finish_non_exhaustive()
    }
}
