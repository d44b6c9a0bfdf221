use crate::domain::{errors::StorageError, value_objects::ObjectKey};

/// Map an `object_store` error raised during `operation` into the domain
/// error, keeping the authentication / transient / other split.
pub fn map_store_error(operation: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { path, .. } => match ObjectKey::new(path.clone()) {
            Ok(key) => StorageError::ObjectNotFound { key },
            Err(_) => StorageError::ValidationError {
                message: format!("Invalid object path from store: {}", path),
            },
        },
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            operation: operation.to_string(),
            message: err.to_string(),
        },
        _ if looks_unavailable(&err) => StorageError::Unavailable {
            message: format!("Failed to {}: {}", operation, err),
        },
        _ => StorageError::InfrastructureError {
            message: format!("Failed to {}: {}", operation, err),
            source: Some(err.to_string()),
        },
    }
}

/// The client retries 503s itself; once it gives up the status only survives
/// in the rendered error chain.
fn looks_unavailable(err: &object_store::Error) -> bool {
    let mut rendered = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        source = inner.source();
    }
    rendered.contains("503") || rendered.contains("Service Unavailable")
}

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        map_store_error("access object store", err)
    }
}
