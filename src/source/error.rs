//! Error type for status fetches.

use thiserror::Error;

/// A failed status fetch.
///
/// Every transport, timeout, HTTP, or decoding problem is normalized into one
/// of these variants. The `Display` output is the message shown in the
/// panel's error banner and recorded in the call log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body was not a usable status payload.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Local I/O failure (file-backed fetchers).
    #[error("Read error: {0}")]
    Io(String),
}

impl FetchError {
    /// The human-readable message for this error.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(FetchError::Timeout.message(), "Request timed out");
        assert_eq!(
            FetchError::Http("API returned status 503".into()).message(),
            "HTTP request failed: API returned status 503"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let fetch_err = FetchError::from(err);
        assert!(matches!(fetch_err, FetchError::Parse(_)));
        assert!(fetch_err.message().starts_with("Failed to parse response"));
    }
}
