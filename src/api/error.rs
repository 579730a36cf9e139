//! Failure taxonomy for assistant-service calls.

use thiserror::Error;

/// What went wrong with a request, decided once at the network
/// boundary.
///
/// The variants preserve the two channels the UI never conflates:
/// everything except [`ApiError::App`] is a transport failure (the
/// response could not be obtained or parsed); `App` is a well-formed
/// 2xx response whose body carries an `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached at all.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request timed out below the HTTP layer.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Non-2xx status; the body is ignored regardless of content.
    #[error("server returned HTTP {0}")]
    Status(u16),
    /// The response body was not the JSON the endpoint promises.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Business-logic failure reported by the server itself.
    #[error("{0}")]
    App(String),
    /// Any other transport-level failure reqwest reports.
    #[error("request failed: {0}")]
    Other(String),
}

impl ApiError {
    /// Classify a failed reqwest call. Runs exactly once per failure;
    /// consumers match on the variant instead of inspecting message
    /// text.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }

    /// True for every variant except a server-reported application
    /// error.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::App(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_displays_literal_message() {
        let err = ApiError::App("No API key configured".into());
        assert_eq!(err.to_string(), "No API key configured");
    }

    #[test]
    fn test_status_error_display() {
        assert_eq!(ApiError::Status(503).to_string(), "server returned HTTP 503");
    }

    #[test]
    fn test_transport_split() {
        assert!(ApiError::Status(500).is_transport());
        assert!(ApiError::Decode("eof".into()).is_transport());
        assert!(ApiError::Connect("refused".into()).is_transport());
        assert!(!ApiError::App("bad query".into()).is_transport());
    }
}
