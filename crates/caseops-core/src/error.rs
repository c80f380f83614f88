//! Local validation failures and the user-facing error message policy.

/// Input problems detected before any network call is made.
///
/// The display text is shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a CSV file first")]
    NoFileSelected,
    #[error("Please select a CSV file")]
    NotCsv { name: String },
    #[error("Please select an action first")]
    NoActionSelected,
    #[error("Please enter at least one document number")]
    NoDocumentNumbers,
    #[error("an operation is already running for this panel")]
    AlreadyLoading,
}

/// Pick the message shown for a failed operation.
///
/// Prefers the server-supplied `message`, then the transport error text, then
/// the operation's fixed fallback. Blank candidates are skipped so the banner
/// is never empty.
#[must_use]
pub fn derive_error_message(
    server_message: Option<&str>,
    transport_message: Option<&str>,
    fallback: &str,
) -> String {
    [server_message, transport_message]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::{derive_error_message, ValidationError};

    #[test]
    fn server_message_wins() {
        assert_eq!(
            derive_error_message(Some("No document numbers provided"), Some("500"), "fallback"),
            "No document numbers provided"
        );
    }

    #[test]
    fn transport_text_is_second_tier() {
        assert_eq!(
            derive_error_message(None, Some("connection refused"), "fallback"),
            "connection refused"
        );
        assert_eq!(
            derive_error_message(Some("  "), Some("connection refused"), "fallback"),
            "connection refused"
        );
    }

    #[test]
    fn fallback_is_last_resort() {
        assert_eq!(
            derive_error_message(None, Some(""), "Failed to process MRT cases"),
            "Failed to process MRT cases"
        );
        assert_eq!(derive_error_message(None, None, "x"), "x");
    }

    #[test]
    fn validation_messages_are_operator_text() {
        assert_eq!(
            ValidationError::NoFileSelected.to_string(),
            "Please select a CSV file first"
        );
        assert_eq!(
            ValidationError::NotCsv {
                name: "report.xlsx".into()
            }
            .to_string(),
            "Please select a CSV file"
        );
        assert_eq!(
            ValidationError::NoDocumentNumbers.to_string(),
            "Please enter at least one document number"
        );
    }
}
