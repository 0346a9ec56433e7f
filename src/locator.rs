//! Receipt location and encoding.
//!
//! The locator resolves the raw receipt blob from a configurable path on
//! disk. It is a pure read: absence, an unreadable file, and an empty
//! file all report "no data" — the caller decides whether that warrants
//! a refresh.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves the current receipt bytes from persistent storage.
#[derive(Debug, Clone)]
pub struct ReceiptLocator {
    path: PathBuf,
}

impl ReceiptLocator {
    /// Creates a locator for the receipt at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the platform-default receipt path
    /// (`<data_dir>/purchasekit/receipt`), or `None` if no data
    /// directory is known for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("purchasekit").join("receipt"))
    }

    /// Returns the path this locator reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw receipt bytes, or `None` when no readable,
    /// non-empty receipt exists. Transient read failures are treated
    /// identically to "not present"; no retries happen here.
    #[must_use]
    pub fn current_receipt_bytes(&self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => {
                debug!("receipt at {} is empty, treating as absent", self.path.display());
                None
            }
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("receipt not readable at {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// The base64 encoding of the raw receipt bytes, ready for handoff to a
/// validator. Constructed transiently on each fetch; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedReceipt(String);

impl EncodedReceipt {
    /// Encodes raw receipt bytes with standard base64.
    #[must_use]
    pub fn encode(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    /// Returns the encoded receipt as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the receipt, returning the encoded string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
