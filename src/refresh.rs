//! Receipt refresh capability.
//!
//! Defines the interface for re-fetching the receipt from its issuing
//! authority, allowing the verifier to work with any transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Failure cause reported by a receipt refresher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The refresh request could not reach the issuing authority.
    #[error("network error: {0}")]
    Network(String),

    /// The refresh request timed out.
    #[error("refresh request timed out")]
    Timeout,

    /// The refresh request was cancelled before completing.
    #[error("refresh request cancelled")]
    Cancelled,
}

/// Optional receipt properties forwarded with a refresh request
/// (e.g. sandbox hints for the issuing authority).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOptions {
    /// Authority-specific receipt properties.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl RefreshOptions {
    /// Adds one receipt property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Re-fetches the receipt from its issuing authority.
///
/// Implementations must resolve exactly once, eventually, with either
/// success or a failure cause. Writing the refreshed receipt to storage
/// is the implementation's job; the verifier re-reads storage after the
/// call resolves. Retry and timeout policy, if any, live inside the
/// implementation.
#[async_trait]
pub trait ReceiptRefresher: Send + Sync {
    /// Performs one refresh of the receipt.
    async fn refresh(&self, options: Option<&RefreshOptions>) -> Result<(), RefreshError>;
}
