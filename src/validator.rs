//! Receipt validation capability.
//!
//! Defines the interface for checking a receipt's authenticity and
//! content. The verifier passes the encoded receipt through unchanged
//! and never inspects the validator's result.

use async_trait::async_trait;
use thiserror::Error;

/// Structured purchase information returned by a validator.
///
/// Opaque at this boundary; typically the decoded receipt JSON.
pub type ReceiptInfo = serde_json::Value;

/// Status codes reported by a receipt verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The receipt is valid.
    Valid,
    /// The service could not read the submitted JSON.
    JsonNotReadable,
    /// The receipt data was malformed or missing.
    MalformedOrMissingData,
    /// The receipt could not be authenticated.
    AuthenticationFailed,
    /// The shared secret does not match.
    SecretNotMatching,
    /// The verification service is temporarily unavailable.
    ServerUnavailable,
    /// The subscription in the receipt has expired.
    SubscriptionExpired,
    /// A test receipt was sent to the production service.
    TestReceipt,
    /// A production receipt was sent to the test service.
    ProductionReceipt,
    /// A status code this crate does not recognize.
    Unknown(i64),
}

impl ReceiptStatus {
    /// Maps a raw service status code to its meaning.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Valid,
            21000 => Self::JsonNotReadable,
            21002 => Self::MalformedOrMissingData,
            21003 => Self::AuthenticationFailed,
            21004 => Self::SecretNotMatching,
            21005 => Self::ServerUnavailable,
            21006 => Self::SubscriptionExpired,
            21007 => Self::TestReceipt,
            21008 => Self::ProductionReceipt,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw service status code.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Valid => 0,
            Self::JsonNotReadable => 21000,
            Self::MalformedOrMissingData => 21002,
            Self::AuthenticationFailed => 21003,
            Self::SecretNotMatching => 21004,
            Self::ServerUnavailable => 21005,
            Self::SubscriptionExpired => 21006,
            Self::TestReceipt => 21007,
            Self::ProductionReceipt => 21008,
            Self::Unknown(code) => *code,
        }
    }

    /// Returns true if this status means the receipt is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validator-reported failures.
///
/// The verifier surfaces these verbatim; it neither interprets nor
/// wraps them further.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The validation request could not reach the service.
    #[error("network error: {0}")]
    Network(String),

    /// The service response was not valid JSON or was missing fields.
    #[error("invalid response JSON: {0}")]
    InvalidJson(String),

    /// The service rejected the receipt.
    #[error("receipt invalid (status {})", .status.code())]
    Invalid {
        /// The status the service reported.
        status: ReceiptStatus,
    },

    /// Any other validator-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Checks a receipt's authenticity and returns structured purchase
/// information.
///
/// Implementations must resolve exactly once; the call may complete on
/// any thread — the verifier guarantees its own caller observes the
/// result on the caller's context.
#[async_trait]
pub trait ReceiptValidator: Send + Sync {
    /// Validates the base64-encoded receipt.
    async fn validate(&self, encoded_receipt: &str) -> Result<ReceiptInfo, ValidationError>;
}
