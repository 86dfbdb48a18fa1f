//! Error payload normalization.
//!
//! The backend is inconsistent about error shapes: flat `{message}`,
//! nested `{error: {message}}`, bare `{error: "..."}`, or any of those
//! wrapped one level under `{data: ...}`. Every shape is reduced to a
//! single non-empty string here.

use serde_json::Value;

/// Reduce an arbitrary decoded error body to one user-facing message.
///
/// Fallback chain, first usable string wins:
/// 1. `body.message`
/// 2. `body.error.message`
/// 3. `body.error` when it is itself a string
/// 4. the same three against `body.data` when that is an object
/// 5. `"HTTP <status>: <status_text>"`
///
/// The result is always a non-empty string, never an object.
pub fn normalize_error_message(body: &Value, status: u16, status_text: &str) -> String {
    extract_message(body)
        .or_else(|| {
            body.get("data")
                .filter(|data| data.is_object())
                .and_then(extract_message)
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", status, status_text))
}

fn extract_message(body: &Value) -> Option<String> {
    if let Some(message) = string_field(body.get("message")) {
        return Some(message);
    }

    match body.get("error") {
        Some(Value::Object(error)) => string_field(error.get("message")),
        Some(Value::String(error)) if !error.is_empty() => Some(error.clone()),
        _ => None,
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_message() {
        let body = json!({ "message": "Email not found" });
        assert_eq!(
            normalize_error_message(&body, 404, "Not Found"),
            "Email not found"
        );
    }

    #[test]
    fn test_nested_error_message() {
        let body = json!({ "error": { "message": "Invalid code" } });
        assert_eq!(
            normalize_error_message(&body, 422, "Unprocessable Entity"),
            "Invalid code"
        );
    }

    #[test]
    fn test_error_as_string() {
        let body = json!({ "error": "Token expired" });
        assert_eq!(
            normalize_error_message(&body, 401, "Unauthorized"),
            "Token expired"
        );
    }

    #[test]
    fn test_data_wrapped_message() {
        let body = json!({ "data": { "message": "Rate limited" } });
        assert_eq!(
            normalize_error_message(&body, 429, "Too Many Requests"),
            "Rate limited"
        );
    }

    #[test]
    fn test_data_wrapped_nested_error() {
        let body = json!({ "data": { "error": { "message": "Reset rejected" } } });
        assert_eq!(
            normalize_error_message(&body, 400, "Bad Request"),
            "Reset rejected"
        );
    }

    #[test]
    fn test_data_wrapped_error_string() {
        let body = json!({ "data": { "error": "Nope" } });
        assert_eq!(normalize_error_message(&body, 400, "Bad Request"), "Nope");
    }

    #[test]
    fn test_outer_message_wins_over_data() {
        let body = json!({ "message": "outer", "data": { "message": "inner" } });
        assert_eq!(normalize_error_message(&body, 400, "Bad Request"), "outer");
    }

    #[test]
    fn test_fallback_for_empty_object() {
        let body = json!({});
        assert_eq!(
            normalize_error_message(&body, 500, "Internal Server Error"),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn test_fallback_for_non_object_body() {
        assert_eq!(
            normalize_error_message(&json!("oops"), 502, "Bad Gateway"),
            "HTTP 502: Bad Gateway"
        );
        assert_eq!(
            normalize_error_message(&Value::Null, 502, "Bad Gateway"),
            "HTTP 502: Bad Gateway"
        );
        assert_eq!(
            normalize_error_message(&json!(42), 502, "Bad Gateway"),
            "HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn test_message_as_object_is_not_leaked() {
        // A nested object must never become the message
        let body = json!({ "message": { "code": 7 } });
        assert_eq!(
            normalize_error_message(&body, 500, "Internal Server Error"),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn test_empty_string_message_falls_through() {
        let body = json!({ "message": "", "error": "real message" });
        assert_eq!(
            normalize_error_message(&body, 400, "Bad Request"),
            "real message"
        );
    }

    #[test]
    fn test_data_as_non_object_is_ignored() {
        let body = json!({ "data": "not an object" });
        assert_eq!(
            normalize_error_message(&body, 400, "Bad Request"),
            "HTTP 400: Bad Request"
        );
    }

    #[test]
    fn test_no_double_data_unwrapping() {
        // Only one level of envelope unwrapping
        let body = json!({ "data": { "data": { "message": "too deep" } } });
        assert_eq!(
            normalize_error_message(&body, 400, "Bad Request"),
            "HTTP 400: Bad Request"
        );
    }

    #[test]
    fn test_result_is_never_empty() {
        let bodies = [
            json!({}),
            json!({ "message": "" }),
            json!({ "error": "" }),
            json!({ "error": {} }),
            json!([1, 2, 3]),
            Value::Null,
        ];
        for body in bodies {
            let message = normalize_error_message(&body, 500, "Internal Server Error");
            assert!(!message.is_empty());
        }
    }
}
