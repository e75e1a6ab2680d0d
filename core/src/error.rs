//! Error types for the clinic API client.
//!
//! # Design
//! Every failure surfaces as an `ApiError`; nothing in the client recovers on
//! its own. `Display` output is the user-facing message, so screens can show
//! `error.to_string()` directly. `Server` carries the backend's `detail` text
//! verbatim when there is one.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the executor and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response arrived before the configured deadline.
    #[error(
        "Unable to reach the server: no response after {} seconds. Please try again.",
        .timeout.as_secs_f64()
    )]
    Timeout { timeout: Duration },

    /// The transport failed before any HTTP response was received.
    #[error(
        "Unable to connect to the server at {base_url}. Please check that:\n\
         1. the backend server is running\n\
         2. the server address is correct\n\
         3. this device is on the same network as the server"
    )]
    Network {
        base_url: String,
        #[source]
        source: TransportError,
    },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 2xx response body could not be decoded into the expected type.
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// A list response was neither an array nor an object with a `data` array.
    #[error("unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// Input rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("token storage failed: {0}")]
    TokenStore(#[from] TokenStoreError),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Build a `Server` error, falling back to a generic status message.
    pub fn server(status: u16, detail: Option<String>) -> Self {
        let message = detail.unwrap_or_else(|| format!("Server error: {status}"));
        ApiError::Server { status, message }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// HTTP status of a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Low-level failure reported by a `Transport` (DNS, refused connection,
/// reset, unreadable body).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Failure reading or writing the token store.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failure resolving `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer number of milliseconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_prefers_detail() {
        let err = ApiError::server(404, Some("Not found".to_string()));
        assert_eq!(err.to_string(), "Not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn server_error_without_detail_names_status() {
        let err = ApiError::server(500, None);
        assert_eq!(err.to_string(), "Server error: 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn network_error_lists_three_hints() {
        let err = ApiError::Network {
            base_url: "http://10.0.2.2:8000".to_string(),
            source: TransportError("connection refused".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("http://10.0.2.2:8000"));
        assert!(message.contains("1. the backend server is running"));
        assert!(message.contains("2. the server address is correct"));
        assert!(message.contains("3. this device is on the same network"));
    }

    #[test]
    fn timeout_message_names_seconds() {
        let err = ApiError::Timeout {
            timeout: Duration::from_millis(15_000),
        };
        assert!(err.to_string().contains("15 seconds"));
        assert_eq!(err.status(), None);
    }
}
