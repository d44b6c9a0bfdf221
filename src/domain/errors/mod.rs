mod compute_errors;
mod storage_errors;
mod validation_errors;

pub use compute_errors::*;
pub use storage_errors::*;
pub use validation_errors::*;

/// Coarse failure classes shared by both sweeps.
///
/// Authentication and unexpected failures abort a run. Transient failures are
/// retried by the transport layer first and only surface here once the retry
/// budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Authentication,
    Transient,
    Unexpected,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Authentication => write!(f, "authentication"),
            ErrorClass::Transient => write!(f, "transient"),
            ErrorClass::Unexpected => write!(f, "unexpected"),
        }
    }
}
