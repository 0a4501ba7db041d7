//! Tool-specific error types.

use thiserror::Error;

use crate::domains::backends::BackendError;

/// Result type for tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A required parameter is absent or could not be converted.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A result could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "missing parameter" error.
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
