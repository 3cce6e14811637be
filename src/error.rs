//! Error taxonomy for the dashboard client.
//!
//! Everything that can go wrong talking to the backend collapses into
//! [`ApiError`]. Views never crash on it: they print the message as a notice
//! and fall back to an empty state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The exchange failed below HTTP, e.g. a refused connection or a body
    /// cut off mid-read.
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("Invalid JSON from dashboard API: {0}")]
    Decode(String),

    /// A form failed client-side validation; the request was not sent.
    #[error("{0}")]
    Validation(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential store error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True only for an HTTP 404, the one status that route probing skips past.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback text for a status code when the server sent no message of its own.
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Request rejected by the server".to_string(),
        401 => "Session is invalid or expired".to_string(),
        403 => "User not authorized".to_string(),
        404 => "Dashboard endpoint not found".to_string(),
        s if s >= 500 => format!("Dashboard server error (HTTP {s})"),
        s => format!("Unexpected response from dashboard (HTTP {s})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_404_counts_as_not_found() {
        let missing = ApiError::Status {
            status: 404,
            message: status_message(404),
        };
        assert!(missing.is_not_found());

        let server = ApiError::Status {
            status: 500,
            message: status_message(500),
        };
        assert!(!server.is_not_found());
        assert!(!ApiError::Network("down".into()).is_not_found());
    }

    #[test]
    fn status_error_renders_code() {
        let err = ApiError::Status {
            status: 422,
            message: "Amount must be positive".into(),
        };
        assert_eq!(err.to_string(), "Amount must be positive (HTTP 422)");
        assert_eq!(
            status_message(503),
            "Dashboard server error (HTTP 503)".to_string()
        );
    }
}
