//! Error types for page fetches and redirect probes.
//!
//! Every network failure is converted into a [`CheckError`] at the point of
//! the call. Nothing here is ever raised past the detector: a failed primary
//! fetch ends the run with a negative verdict, and a failed probe only fails
//! the heuristic that issued it.

use serde::Serialize;
use thiserror::Error;

/// Classification of a transport-level failure.
///
/// # Example
///
/// ```rust
/// use drupal_probe::TransportErrorKind;
///
/// assert_eq!(TransportErrorKind::Timeout.description(), "Request timed out");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// The connect or total timeout elapsed.
    Timeout,

    /// DNS resolution, TCP connect or TLS handshake failed.
    Connect,

    /// The HTTP client could not be constructed.
    Build,

    /// Any other failure while sending the request or reading the body.
    Other,
}

impl TransportErrorKind {
    /// Human-readable description of the failure class.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "Request timed out",
            Self::Connect => "Connection failed",
            Self::Build => "HTTP client could not be built",
            Self::Other => "Transport error",
        }
    }
}

/// A single failed exchange reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .kind.description())]
pub struct TransportError {
    /// What kind of failure occurred.
    pub kind: TransportErrorKind,
    /// Message from the underlying client.
    pub message: String,
}

impl TransportError {
    /// Create a transport error of the given kind.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_builder() {
            TransportErrorKind::Build
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}

/// Errors recorded while checking a target.
///
/// # Example
///
/// ```rust
/// use drupal_probe::CheckError;
///
/// let error = CheckError::BadResponse {
///     url: "https://example.com/".to_string(),
///     status: 503,
/// };
/// assert_eq!(error.code(), 503);
/// assert_eq!(error.description(), "Server returned an error status");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckError {
    /// DNS, connect, TLS or timeout failure. No response was received.
    #[error("Transport failure for {url}: {message}")]
    Transport {
        /// URL that was being requested.
        url: String,
        /// Failure class.
        kind: TransportErrorKind,
        /// Message from the underlying client.
        message: String,
    },

    /// The server answered, but the terminal status was not acceptable.
    #[error("Bad response from {url}: HTTP {status}")]
    BadResponse {
        /// URL of the failing response.
        url: String,
        /// Status code of the failing response.
        status: u16,
    },

    /// The request could not be completed and no usable response exists.
    #[error("Request to {url} failed: {message}")]
    Request {
        /// URL that was being requested.
        url: String,
        /// What went wrong.
        message: String,
    },
}

impl CheckError {
    pub(crate) fn transport(url: &str, err: TransportError) -> Self {
        Self::Transport {
            url: url.to_string(),
            kind: err.kind,
            message: err.message,
        }
    }

    pub(crate) fn request(url: &str, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Human-readable description of the error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport { kind, .. } => kind.description(),
            Self::BadResponse { .. } => "Server returned an error status",
            Self::Request { .. } => "Request failed",
        }
    }

    /// Raw status code tied to the error, or `0` when no response was involved.
    pub fn code(&self) -> u16 {
        match self {
            Self::BadResponse { status, .. } => *status,
            _ => 0,
        }
    }

    /// URL the error refers to.
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::BadResponse { url, .. } | Self::Request { url, .. } => {
                url
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_descriptions() {
        assert_eq!(TransportErrorKind::Timeout.description(), "Request timed out");
        assert_eq!(TransportErrorKind::Connect.description(), "Connection failed");
        assert_eq!(
            TransportErrorKind::Build.description(),
            "HTTP client could not be built"
        );
        assert_eq!(TransportErrorKind::Other.description(), "Transport error");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
        assert_eq!(err.to_string(), "Connection failed: connection refused");
    }

    #[test]
    fn test_check_error_from_transport() {
        let err = CheckError::transport(
            "http://127.0.0.1:1/",
            TransportError::new(TransportErrorKind::Timeout, "deadline elapsed"),
        );
        assert_eq!(err.code(), 0);
        assert_eq!(err.url(), "http://127.0.0.1:1/");
        assert_eq!(err.description(), "Request timed out");
        assert!(matches!(
            err,
            CheckError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_response_code_and_display() {
        let err = CheckError::BadResponse {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(err.code(), 404);
        assert_eq!(
            err.to_string(),
            "Bad response from https://example.com/missing: HTTP 404"
        );
    }

    #[test]
    fn test_request_error_has_no_code() {
        let err = CheckError::request("ftp://example.com/", "unsupported scheme `ftp`");
        assert_eq!(err.code(), 0);
        assert_eq!(err.description(), "Request failed");
    }

    #[test]
    fn test_check_error_serializes_tagged() {
        let err = CheckError::BadResponse {
            url: "https://example.com/".to_string(),
            status: 500,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "bad_response");
        assert_eq!(json["status"], 500);
    }
}
