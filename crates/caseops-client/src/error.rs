//! Normalized backend errors.
//!
//! Hides reqwest details behind a small set of categories and exposes the two
//! candidate texts used when picking the operator-facing message.

use caseops_core::error::derive_error_message;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Non-2xx response. `server_message` is the body's `message` field, if any.
    #[error("request failed with status code {status}")]
    Status {
        status: u16,
        server_message: Option<String>,
    },

    /// Connection refused, timeout, TLS failure and similar.
    #[error("{message}")]
    Transport { message: String },

    /// A 2xx body that is not the expected JSON document.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Local file access while uploading or saving.
    #[error("{message}")]
    Io { message: String },
}

impl BackendError {
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }

    /// Message shown to the operator for this failure.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let transport = self.to_string();
        derive_error_message(self.server_message(), Some(&transport), fallback)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Pull the `message` field out of an error body. Anything else is ignored.
#[must_use]
pub fn extract_server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{extract_server_message, BackendError};

    #[test]
    fn server_message_is_first_tier() {
        let err = BackendError::Status {
            status: 400,
            server_message: Some("No document numbers provided".into()),
        };
        assert_eq!(
            err.user_message("Failed to move case to cp returning"),
            "No document numbers provided"
        );
    }

    #[test]
    fn status_without_body_uses_transport_text() {
        let err = BackendError::Status {
            status: 500,
            server_message: None,
        };
        assert_eq!(
            err.user_message("Failed to process cases"),
            "request failed with status code 500"
        );
    }

    #[test]
    fn empty_transport_text_falls_back() {
        let err = BackendError::Transport {
            message: String::new(),
        };
        assert_eq!(
            err.user_message("Failed to process MRT cases"),
            "Failed to process MRT cases"
        );
    }

    #[test]
    fn message_extraction_ignores_other_shapes() {
        assert_eq!(
            extract_server_message(br#"{"message":" bad input ","status":400}"#).as_deref(),
            Some("bad input")
        );
        assert_eq!(extract_server_message(br#"{"message":""}"#), None);
        assert_eq!(extract_server_message(br#"{"error":"x"}"#), None);
        assert_eq!(extract_server_message(b"<html>502</html>"), None);
        assert_eq!(extract_server_message(br#"{"message":42}"#), None);
    }
}
