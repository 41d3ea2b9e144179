//! Shared error type across visitlens crates.

use thiserror::Error;

/// Stable error codes (used in logs and HTTP responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Counter increment below zero.
    NegativeIncrement,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::NegativeIncrement => "NEGATIVE_INCREMENT",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VisitLensError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum VisitLensError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("counter {metric} cannot be decremented (amount={amount})")]
    NegativeIncrement { metric: String, amount: i64 },
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl VisitLensError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            VisitLensError::BadRequest(_) => ErrorCode::BadRequest,
            VisitLensError::NegativeIncrement { .. } => ErrorCode::NegativeIncrement,
            VisitLensError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            VisitLensError::Internal(_) => ErrorCode::Internal,
        }
    }
}
