//! Error types for the request tracker.

use thiserror::Error;

use crate::request::RequestId;

/// Shorthand used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, CommdeskError>;

/// Everything that can go wrong while submitting, triaging or evaluating.
#[derive(Error, Debug)]
pub enum CommdeskError {
    /// No request with this id in the store
    #[error("No request with id {0}")]
    RequestNotFound(RequestId),

    /// The request's current status does not allow the action
    #[error("Request {0} is '{1}' but the action needs '{2}'")]
    InvalidState(RequestId, String, String),

    /// Form input the user must correct before retrying
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// The remote backend answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The remote backend could not be reached
    #[error("Backend unreachable: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A body could not be encoded or decoded as JSON
    #[error("Malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommdeskError {
    /// True for errors the user can fix by correcting input and retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, CommdeskError::ValidationError(_))
    }
}

/// Helpers for reading error payloads returned by the remote backend.
///
/// The backend reports failures as `{"message": "..."}`; anything else falls
/// back to a generic text carrying the status code.
pub mod server_errors {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    /// Extracts the server-provided message from an error body.
    pub fn server_message(status: u16, body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_message_field_is_used() {
            let message = server_message(422, r#"{"message":"Tipo inválido"}"#);
            assert_eq!(message, "Tipo inválido");
        }

        #[test]
        fn test_fallback_when_body_is_not_json() {
            let message = server_message(502, "<html>Bad Gateway</html>");
            assert_eq!(message, "Request failed with status 502");
        }

        #[test]
        fn test_fallback_when_message_missing_or_blank() {
            assert_eq!(
                server_message(500, r#"{"error":"boom"}"#),
                "Request failed with status 500"
            );
            assert_eq!(
                server_message(500, r#"{"message":"  "}"#),
                "Request failed with status 500"
            );
        }
    }
}
