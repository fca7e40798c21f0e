//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Machine-readable error code carried by every [`DomainError`].
///
/// The string forms are part of the client-facing contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidData,
    StockProblem,
    NotFound,
    StoreError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidData => "invalid_data",
            ErrorCode::StockProblem => "stock_problem",
            ErrorCode::NotFound => "not_found",
            ErrorCode::StoreError => "store_error",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Each variant maps to exactly one [`ErrorCode`]; the payload is the
/// human-readable message returned to callers verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Structural problem with the request: malformed id, bad quantity,
    /// unknown product reference, duplicate product name.
    #[error("{0}")]
    InvalidData(String),

    /// A line item asks for more than the product has in stock.
    #[error("{0}")]
    StockProblem(String),

    /// A well-formed sale id that matches no record.
    #[error("{0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn stock_problem(msg: impl Into<String>) -> Self {
        Self::StockProblem(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InvalidData(_) => ErrorCode::InvalidData,
            DomainError::StockProblem(_) => ErrorCode::StockProblem,
            DomainError::NotFound(_) => ErrorCode::NotFound,
            DomainError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// Message without the variant prefix added by `Display` for store errors.
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidData(m)
            | DomainError::StockProblem(m)
            | DomainError::NotFound(m)
            | DomainError::Store(m) => m,
        }
    }
}

/// Failure reported by a repository implementation.
///
/// These are infrastructure errors (connectivity, serialization), as opposed
/// to the business outcomes modelled by [`DomainError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("corrupt document {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Result type returned by repositories.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Store(err.to_string())
    }
}
