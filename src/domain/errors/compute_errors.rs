use thiserror::Error;

use super::ErrorClass;

/// Errors raised while talking to the compute API
#[derive(Debug, Clone, Error)]
pub enum ComputeError {
    #[error("Credentials error: {message}")]
    Credentials { message: String },

    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Compute API unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },

    #[error("Compute API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid response from compute API: {message}")]
    InvalidResponse { message: String },
}

impl ComputeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ComputeError::Credentials { .. }
            | ComputeError::Unauthenticated { .. }
            | ComputeError::PermissionDenied { .. } => ErrorClass::Authentication,
            ComputeError::Unavailable { .. } => ErrorClass::Transient,
            ComputeError::Api { .. }
            | ComputeError::Transport { .. }
            | ComputeError::InvalidResponse { .. } => ErrorClass::Unexpected,
        }
    }
}

/// Result type for compute operations
pub type ComputeResult<T> = Result<T, ComputeError>;
