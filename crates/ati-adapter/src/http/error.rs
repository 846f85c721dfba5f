/*
[INPUT]:  Error sources (HTTP, API, serialization, I/O)
[OUTPUT]: Structured error types with human-readable messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Shown when neither the response body nor the transport error carries usable text.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Main error type for the ATI adapter
#[derive(Error, Debug)]
pub enum AtiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-2xx response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Session credential was rejected
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AtiError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AtiError::Unauthorized { .. })
    }

    /// Build the error for a non-2xx response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
        });

        if status == StatusCode::UNAUTHORIZED {
            return AtiError::Unauthorized { message };
        }
        AtiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Best-effort text suitable for an inline error notification.
    pub fn user_message(&self) -> String {
        let message = match self {
            AtiError::Api { message, .. } | AtiError::Unauthorized { message } => message.clone(),
            AtiError::InvalidResponse(message) | AtiError::Config(message) => message.clone(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Extract a message from an error response body.
///
/// The backend routes answer failures with `{ "msg": ... }`; upstream
/// services sometimes use `message` or `error` instead. Plain-text bodies are
/// used as-is.
pub fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["msg", "message", "error"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(|field| match field {
                serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
                serde_json::Value::Object(inner) => inner
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
                _ => None,
            }),
        Err(_) => Some(body.to_string()),
    }
}

/// Result type alias for ATI operations
pub type Result<T> = std::result::Result<T, AtiError>;
