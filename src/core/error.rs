//! Error types and handling for the gateway.
//!
//! Tool invocations never surface these to callers (the dispatcher renders
//! failures as text); they cover startup and transport failures.

use thiserror::Error;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// The shared backend HTTP client could not be built.
    #[error("Backend error: {0}")]
    Backend(#[from] crate::domains::backends::BackendError),

    /// A transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}
