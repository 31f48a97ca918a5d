//! Error types for the TopstepX client library.

use thiserror::Error;

/// Message used when a failed envelope carries no `errorMessage`.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// The main error type for all TopstepX client operations.
///
/// Envelope-level failures (the server answered, but with `success: false` or a
/// non-zero `errorCode`) map to one of the four domain kinds. Transport failures,
/// including non-2xx HTTP statuses, are passed through untranslated.
#[derive(Error, Debug)]
pub enum TopstepError {
    /// The login exchange failed.
    #[error("Authentication error: {0}")]
    Authentication(ApiError),

    /// A generic resource request (accounts, contracts, trades) failed.
    #[error("TopstepX API error: {0}")]
    Api(ApiError),

    /// An order operation failed.
    #[error("Order error: {0}")]
    Order(ApiError),

    /// A position operation failed.
    #[error("Position error: {0}")]
    Position(ApiError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The bearer token could not be used as a header value.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Missing required credentials
    #[error("Missing credentials: environment variable {variable} is not set")]
    MissingCredentials {
        /// Name of the variable that was not found
        variable: String,
    },
}

impl TopstepError {
    /// The server-supplied error details, for envelope-level failures.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            TopstepError::Authentication(e)
            | TopstepError::Api(e)
            | TopstepError::Order(e)
            | TopstepError::Position(e) => Some(e),
            _ => None,
        }
    }

    /// The server-supplied numeric error code, if any.
    pub fn error_code(&self) -> Option<i32> {
        self.api_error().and_then(|e| e.code)
    }

    /// The domain kind of an envelope-level failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TopstepError::Authentication(_) => Some(ErrorKind::Authentication),
            TopstepError::Api(_) => Some(ErrorKind::Api),
            TopstepError::Order(_) => Some(ErrorKind::Order),
            TopstepError::Position(_) => Some(ErrorKind::Position),
            _ => None,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, TopstepError::Authentication(_))
    }

    /// Check if the transport reported an HTTP error status.
    pub fn http_status(&self) -> Option<reqwest::StatusCode> {
        match self {
            TopstepError::Http(e) => e.status(),
            TopstepError::HttpMiddleware(reqwest_middleware::Error::Reqwest(e)) => e.status(),
            _ => None,
        }
    }
}

/// Error details returned by the TopstepX API in a failed response envelope.
///
/// Codes are opaque: the API does not publish a catalog, so no meaning is
/// attached to individual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable message (`errorMessage`, or "Unknown error")
    pub message: String,
    /// The `errorCode` field, when present
    pub code: Option<i32>,
}

impl ApiError {
    /// Create a new API error from message and code.
    pub fn new(message: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Build from the raw envelope fields, defaulting the message.
    pub fn from_envelope(message: Option<String>, code: Option<i32>) -> Self {
        Self::new(
            message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            code,
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Which domain error a failed envelope is reported as.
///
/// Each endpoint picks the kind matching its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Login failures
    Authentication,
    /// Accounts, contracts and trade search
    Api,
    /// Order placement, search, cancel and modify
    Order,
    /// Position search and close
    Position,
}

impl ErrorKind {
    /// Wrap an [`ApiError`] in the matching [`TopstepError`] variant.
    pub fn into_error(self, error: ApiError) -> TopstepError {
        match self {
            ErrorKind::Authentication => TopstepError::Authentication(error),
            ErrorKind::Api => TopstepError::Api(error),
            ErrorKind::Order => TopstepError::Order(error),
            ErrorKind::Position => TopstepError::Position(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_defaults_message() {
        let error = ApiError::from_envelope(None, Some(12));
        assert_eq!(error.message, "Unknown error");
        assert_eq!(error.code, Some(12));
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new("insufficient margin", Some(3));
        assert_eq!(error.to_string(), "insufficient margin (code 3)");

        let error = ApiError::new("no code", None);
        assert_eq!(error.to_string(), "no code");
    }

    #[test]
    fn test_kind_round_trip() {
        let err = ErrorKind::Position.into_error(ApiError::new("closed", Some(1)));
        assert!(matches!(err, TopstepError::Position(_)));
        assert_eq!(err.kind(), Some(ErrorKind::Position));
        assert_eq!(err.error_code(), Some(1));
        assert_eq!(err.api_error().map(|e| e.message.as_str()), Some("closed"));
    }

    #[test]
    fn test_transport_errors_have_no_api_error() {
        let err = TopstepError::InvalidToken("bad".to_string());
        assert!(err.api_error().is_none());
        assert!(err.kind().is_none());
        assert!(!err.is_authentication());
    }
}
