//! Error types for receipt operations.

use crate::refresh::RefreshError;
use crate::validator::ValidationError;
use thiserror::Error;

/// Errors surfaced by receipt fetch and verify operations.
///
/// Every error is terminal for the current call; the caller decides
/// whether to try again (e.g. with a forced refresh).
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// No readable receipt exists after every applicable refresh attempt.
    #[error("no receipt data found")]
    NoReceiptData,

    /// The refresh collaborator reported failure; the cause is preserved.
    #[error("receipt refresh failed: {0}")]
    Network(#[from] RefreshError),

    /// The validator rejected the receipt; passed through verbatim.
    #[error("receipt validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type for receipt operations.
pub type ReceiptResult<T> = Result<T, ReceiptError>;
