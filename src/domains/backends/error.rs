//! Backend-specific error types.

use thiserror::Error;

/// Result type for backend client operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while talking to the book API or the Ollama API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be read.
    #[error("request to {backend} failed: {source}")]
    Unavailable {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code.
    #[error("{backend} responded with status {status}")]
    Status {
        backend: &'static str,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response from {backend}: {message}")]
    Decode {
        backend: &'static str,
        message: String,
    },

    /// A request URL could not be built from the configured base address.
    #[error("invalid URL for {backend}: {message}")]
    InvalidUrl {
        backend: &'static str,
        message: String,
    },
}

impl BackendError {
    /// Create an "unavailable" error from a transport failure.
    pub fn unavailable(backend: &'static str, source: reqwest::Error) -> Self {
        Self::Unavailable { backend, source }
    }

    /// Create a "status" error.
    pub fn status(backend: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Status { backend, status }
    }

    /// Create a "decode" error.
    pub fn decode(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            backend,
            message: message.into(),
        }
    }

    /// Create an "invalid URL" error.
    pub fn invalid_url(backend: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            backend,
            message: message.into(),
        }
    }

    /// Name of the backend that produced this error.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Unavailable { backend, .. }
            | Self::Status { backend, .. }
            | Self::Decode { backend, .. }
            | Self::InvalidUrl { backend, .. } => backend,
        }
    }
}
