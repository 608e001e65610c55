//! Human-readable message extraction from heterogeneous error values.
//!
//! Backends report failures in many shapes: typed Rust errors, plain text
//! bodies, JSON strings, and JSON objects with a `message` field (often
//! nested under `error`). Every call site that needs a message for the user
//! goes through [`to_error_message`].

use serde_json::Value;

/// Message used when nothing readable can be extracted.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

const MAX_NESTING: usize = 4;

/// A borrowed error value of unknown shape.
#[derive(Debug, Clone, Copy)]
pub enum ErrorPayload<'a> {
    /// A native error value.
    Native(&'a (dyn std::error::Error + 'a)),
    /// Plain text, possibly containing a JSON document.
    Text(&'a str),
    /// An already parsed JSON value.
    Json(&'a Value),
}

/// Extracts a message from an error value.
///
/// Type tests run in order: native error, string, object exposing a
/// `message` field (directly or under `error`), then the fallback.
pub fn to_error_message(payload: ErrorPayload<'_>) -> String {
    let extracted = match payload {
        ErrorPayload::Native(err) => non_empty(err.to_string()),
        ErrorPayload::Text(text) => message_from_text(text),
        ErrorPayload::Json(value) => message_from_json(value, 0),
    };
    extracted.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}

fn message_from_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('"') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(message) = message_from_json(&value, 0) {
                return Some(message);
            }
        }
    }
    non_empty(trimmed.to_string())
}

fn message_from_json(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_NESTING {
        return None;
    }
    match value {
        Value::String(text) => non_empty(text.trim().to_string()),
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message") {
                if let Some(message) = non_empty(message.trim().to_string()) {
                    return Some(match map.get("status").and_then(Value::as_str) {
                        Some(status) if !status.is_empty() => format!("{status}: {message}"),
                        _ => message,
                    });
                }
            }
            map.get("error")
                .and_then(|inner| message_from_json(inner, depth + 1))
        }
        _ => None,
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_error() {
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "backend timed out");
        assert_eq!(
            to_error_message(ErrorPayload::Native(&err)),
            "backend timed out"
        );
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(
            to_error_message(ErrorPayload::Text("  quota exceeded \n")),
            "quota exceeded"
        );
    }

    #[test]
    fn test_object_with_message() {
        let value = json!({ "message": "bad request" });
        assert_eq!(to_error_message(ErrorPayload::Json(&value)), "bad request");
    }

    #[test]
    fn test_nested_error_object_in_text() {
        let body = r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            to_error_message(ErrorPayload::Text(body)),
            "RESOURCE_EXHAUSTED: Resource exhausted"
        );
    }

    #[test]
    fn test_fallback() {
        let value = json!({ "code": 500 });
        assert_eq!(
            to_error_message(ErrorPayload::Json(&value)),
            UNKNOWN_ERROR_MESSAGE
        );
        assert_eq!(to_error_message(ErrorPayload::Text("   ")), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(
            to_error_message(ErrorPayload::Json(&json!(42))),
            UNKNOWN_ERROR_MESSAGE
        );
    }
}
