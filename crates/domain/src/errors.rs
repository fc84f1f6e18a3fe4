//! Error types used throughout the importer

use thiserror::Error;

use crate::types::EntityKind;

/// Failure raised by a single SIS API operation.
///
/// This is a closed set so callers can match on the variant instead of
/// parsing messages. The `Display` output is what ends up in the status
/// column of the import report, so `NotFound(EntityKind::Room)` renders as
/// exactly `Room not found.`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SisError {
    /// A lookup returned zero matching entries
    #[error("{0} not found.")]
    NotFound(EntityKind),

    /// The server answered with a status the operation does not accept
    #[error("Request failed with status code: {status}{}", body_suffix(.body))]
    Transport { status: u16, body: String },

    /// The server answered, but not with the shape the operation expects
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No HTTP status available (connect failure, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The request could not be built from the supplied values
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SisError {
    /// HTTP status carried by a transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" - {trimmed}")
    }
}

/// Main error type for roombook
#[derive(Error, Debug, Clone)]
pub enum RoombookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secret error: {0}")]
    Secret(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Sis(#[from] SisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for roombook operations
pub type Result<T> = std::result::Result<T, RoombookError>;

/// Result type alias for SIS client operations
pub type SisResult<T> = std::result::Result<T, SisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_not_found_renders_exact_message() {
        assert_eq!(SisError::NotFound(EntityKind::Room).to_string(), "Room not found.");
    }

    #[test]
    fn transport_error_carries_status_and_body() {
        let err = SisError::Transport { status: 400, body: "{\"error\":\"bad\"}".into() };
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Request failed with status code: 400 - {\"error\":\"bad\"}"
        );
    }

    #[test]
    fn transport_error_without_body_has_no_suffix() {
        let err = SisError::Transport { status: 500, body: "  ".into() };
        assert_eq!(err.to_string(), "Request failed with status code: 500");
    }

    #[test]
    fn sis_errors_pass_through_transparently() {
        let err: RoombookError = SisError::Network("connection refused".into()).into();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
