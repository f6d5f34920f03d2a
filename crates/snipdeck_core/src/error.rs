//! Error taxonomy for remote store operations.
use thiserror::Error;

/// Failure reported by a snippet store.
///
/// Values are cheap to clone so they can travel inside controller events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connectivity failure or transport timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The payload was rejected (empty required fields or malformed body).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A success response whose body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured base URL cannot address the collection.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl StoreError {
    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label used in log fields and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "transport",
            StoreError::Server { .. } => "server",
            StoreError::Validation(_) => "validation",
            StoreError::InvalidResponse(_) => "invalid_response",
            StoreError::InvalidBaseUrl(_) => "invalid_base_url",
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Prefers a JSON `error` or `message` field, then the raw body, then the
/// status' canonical reason when the body is blank.
pub fn error_message_for_body(canonical_reason: Option<&str>, body: &str) -> String {
    if body.trim().is_empty() {
        return canonical_reason.unwrap_or("Request failed").to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let field = value
            .get("error")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("message").and_then(|v| v.as_str()));
        if let Some(message) = field {
            return message.to_string();
        }
    }

    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::{error_message_for_body, StoreError};

    #[test]
    fn error_message_matrix_covers_json_reason_and_passthrough() {
        let cases = [
            (Some("Not Found"), r#"{"error":"Not found"}"#, "Not found"),
            (Some("Bad Request"), r#"{"message":"title required"}"#, "title required"),
            (Some("Bad Request"), "   ", "Bad Request"),
            (None, "", "Request failed"),
            (Some("Internal Server Error"), "raw failure body", "raw failure body"),
            (Some("Internal Server Error"), r#"{"code":7}"#, r#"{"code":7}"#),
        ];

        for (reason, body, expected) in cases {
            assert_eq!(error_message_for_body(reason, body), expected);
        }
    }

    #[test]
    fn status_is_only_reported_for_server_errors() {
        let server = StoreError::Server {
            status: 404,
            message: "Not found".to_string(),
        };
        assert_eq!(server.status(), Some(404));
        assert_eq!(server.kind(), "server");
        assert_eq!(StoreError::Transport("refused".into()).status(), None);
        assert_eq!(StoreError::Validation("empty".into()).kind(), "validation");
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = StoreError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (500): boom");
    }
}
