//! Canonical API error type.

use serde_json::Value;
use thiserror::Error;

/// Canonical error produced by the request layer.
///
/// Every failure carries a non-empty user-facing message. Backend failures
/// preserve the HTTP status and the raw decoded body for callers that
/// branch on status.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-success HTTP status
    #[error("{message}")]
    Backend {
        status: u16,
        message: String,
        body: Value,
    },

    /// Request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Successful response with an undecodable body
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// User-facing message. Always non-empty.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status when the backend produced a response; absent for
    /// network-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401-class failures that may be recoverable by refreshing
    /// the access token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_error_exposes_status_and_message() {
        let error = ApiError::Backend {
            status: 422,
            message: "Invalid code".to_string(),
            body: json!({ "message": "Invalid code" }),
        };

        assert_eq!(error.status(), Some(422));
        assert_eq!(error.message(), "Invalid code");
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detection() {
        let error = ApiError::Backend {
            status: 401,
            message: "Unauthorized".to_string(),
            body: json!({}),
        };
        assert!(error.is_unauthorized());
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let json_error = serde_json::from_str::<Value>("not json").unwrap_err();
        let error = ApiError::Decode(json_error);
        assert_eq!(error.status(), None);
        assert!(!error.message().is_empty());
    }
}
