//! Fetch error types
//!
//! Every variant is a fetch failure as far as the dashboard is concerned;
//! the variants only exist so logs say what actually went wrong.

use thiserror::Error;

/// Message shown to the user for any fetch failure
pub const FETCH_FAILURE_MESSAGE: &str = "Could not connect to the backend";

/// Errors that can occur while fetching samples
#[derive(Error, Debug)]
pub enum FetchError {
    /// Source did not answer in time
    #[error("Request timeout")]
    Timeout,

    /// Connection refused or host unreachable
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Source answered with a non-success status
    #[error("Source error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not a valid samples document
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Fixed user-facing message, independent of the cause
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILURE_MESSAGE
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            status: 503,
            message: "No hay conexión a InfluxDB".to_string(),
        };
        assert_eq!(err.to_string(), "Source error 503: No hay conexión a InfluxDB");
        assert_eq!(FetchError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_user_message_is_fixed() {
        let errors = [
            FetchError::Timeout,
            FetchError::Unavailable("connection refused".into()),
            FetchError::Decode("missing field `datos`".into()),
        ];

        for err in errors {
            assert_eq!(err.user_message(), FETCH_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
