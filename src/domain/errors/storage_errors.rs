use super::ErrorClass;
use crate::domain::value_objects::ObjectKey;

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// Credentials missing, rejected or lacking permission
    AccessDenied { operation: String, message: String },

    /// Backend stayed unavailable after the client's retries
    Unavailable { message: String },

    /// Validation error
    ValidationError { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl StorageError {
    /// Place this error in the sweep failure taxonomy
    pub fn class(&self) -> ErrorClass {
        match self {
            StorageError::AccessDenied { .. } => ErrorClass::Authentication,
            StorageError::Unavailable { .. } => ErrorClass::Transient,
            StorageError::ObjectNotFound { .. }
            | StorageError::ValidationError { .. }
            | StorageError::InfrastructureError { .. } => ErrorClass::Unexpected,
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::AccessDenied { operation, message } => {
                write!(f, "Access denied for operation '{}': {}", operation, message)
            }
            StorageError::Unavailable { message } => {
                write!(f, "Storage backend unavailable: {}", message)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
