// Harness error types
use thiserror::Error;

/// Why a single request produced no usable data.
///
/// All variants are absorbed by the executor and reported on the console.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A response arrived with a non-success status
    #[error("HTTP {status}")]
    Http { status: u16, body: String },

    /// No response was obtainable (refused, unresolvable, timed out)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Anything else while building, sending or decoding
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RequestError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        RequestError::Http {
            status,
            body: body.into(),
        }
    }

    pub fn connection(reason: impl Into<String>) -> Self {
        RequestError::Connection(reason.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        RequestError::Unexpected(message.into())
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::connection("timed out")
        } else if err.is_builder() {
            RequestError::unexpected(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_redirect() {
            RequestError::connection(root_cause(&err))
        } else {
            RequestError::unexpected(err.to_string())
        }
    }
}

/// Why a credential set's sweep was skipped
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    #[error("Login Failed (request did not complete successfully)")]
    RequestFailed,

    #[error("Login Failed (server did not report success)")]
    Rejected,

    #[error("Missing Token (login succeeded but no token was returned)")]
    MissingToken,
}

/// Innermost message of an error chain, e.g. "Connection refused (os error 111)"
pub fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
