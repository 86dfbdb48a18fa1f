//! Session credential shapes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Leeway applied when judging expiry, so a token is refreshed shortly
/// before the backend would reject it.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Credentials issued by the backend when a session is established,
/// either through login or a completed password reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionGrant {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Value,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// The persisted token pair. Stored and cleared as one record so the two
/// tokens can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
}

impl TokenRecord {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        let expires_at = Utc::now() + Duration::seconds(expires_in);
        Self {
            access_token,
            refresh_token,
            expires_at: expires_at.to_rfc3339(),
        }
    }

    pub fn from_grant(grant: &SessionGrant) -> Self {
        Self::new(
            grant.access_token.clone(),
            grant.refresh_token.clone(),
            grant.expires_in,
        )
    }

    /// True when the access token is expired or within the skew window.
    /// An unparseable timestamp counts as expired.
    pub fn is_expired(&self) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => {
                let remaining = expires_at.with_timezone(&Utc) - Utc::now();
                remaining.num_seconds() < EXPIRY_SKEW_SECONDS
            }
            Err(_) => true,
        }
    }
}
