//! Receipt fetch/verify orchestration.
//!
//! `ReceiptVerifier` decides when the cached receipt is good enough and
//! when to refresh, tracks the in-flight refresh, and translates
//! refresh/validation outcomes into [`ReceiptError`] variants. The
//! refresh and validation collaborators are injected per call so tests
//! can substitute doubles.

use crate::error::{ReceiptError, ReceiptResult};
use crate::locator::{EncodedReceipt, ReceiptLocator};
use crate::refresh::{ReceiptRefresher, RefreshOptions};
use crate::validator::{ReceiptInfo, ReceiptValidator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

static NEXT_REFRESH_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight refresh operation.
#[derive(Debug, Clone, Copy)]
pub struct RefreshToken {
    id: u64,
    started_at: Instant,
}

impl RefreshToken {
    fn next() -> Self {
        Self {
            id: NEXT_REFRESH_ID.fetch_add(1, Ordering::Relaxed),
            started_at: Instant::now(),
        }
    }

    /// Returns the token's sequence id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns when the refresh started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Orchestrates receipt lookup, refresh, and validation.
pub struct ReceiptVerifier {
    locator: ReceiptLocator,
    refresh_options: Option<RefreshOptions>,
    /// The only shared mutable state: the token of the refresh that is
    /// currently in flight, if any.
    active_refresh: Mutex<Option<RefreshToken>>,
}

impl ReceiptVerifier {
    /// Creates a verifier reading receipts through the given locator.
    pub fn new(locator: ReceiptLocator) -> Self {
        Self {
            locator,
            refresh_options: None,
            active_refresh: Mutex::new(None),
        }
    }

    /// Creates a verifier that forwards the given options on every
    /// refresh request.
    pub fn with_refresh_options(locator: ReceiptLocator, options: RefreshOptions) -> Self {
        Self {
            locator,
            refresh_options: Some(options),
            active_refresh: Mutex::new(None),
        }
    }

    /// Returns the locator this verifier reads receipts through.
    pub fn locator(&self) -> &ReceiptLocator {
        &self.locator
    }

    /// Returns true while a refresh is in flight.
    pub async fn refresh_in_flight(&self) -> bool {
        self.active_refresh.lock().await.is_some()
    }

    /// Returns the token of the refresh currently in flight, if any.
    pub async fn active_refresh(&self) -> Option<RefreshToken> {
        *self.active_refresh.lock().await
    }

    /// Fetches the current receipt in encoded form.
    ///
    /// If a readable receipt exists and `force_refresh` is false, it is
    /// returned immediately with zero refresher calls. Otherwise one
    /// refresh is run to completion and the receipt is re-read from
    /// storage strictly afterward.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NoReceiptData`] when no readable receipt
    /// exists after the refresh, or [`ReceiptError::Network`] carrying
    /// the refresher's failure cause.
    pub async fn fetch_receipt(
        &self,
        force_refresh: bool,
        refresher: &dyn ReceiptRefresher,
    ) -> ReceiptResult<EncodedReceipt> {
        if !force_refresh {
            if let Some(bytes) = self.locator.current_receipt_bytes() {
                debug!("using stored receipt ({} bytes)", bytes.len());
                return Ok(EncodedReceipt::encode(&bytes));
            }
        }

        let token = RefreshToken::next();
        debug!("starting receipt refresh #{} (force={})", token.id, force_refresh);

        // Overlapping calls each run their own refresh; the tracked
        // token is simply replaced (see DESIGN.md).
        *self.active_refresh.lock().await = Some(token);

        let outcome = refresher.refresh(self.refresh_options.as_ref()).await;

        // Cleared unconditionally, success or error, before any result
        // handling, so no stale token survives the operation.
        *self.active_refresh.lock().await = None;

        match outcome {
            Ok(()) => match self.locator.current_receipt_bytes() {
                Some(bytes) => {
                    info!("refresh #{} yielded a receipt ({} bytes)", token.id, bytes.len());
                    Ok(EncodedReceipt::encode(&bytes))
                }
                None => {
                    warn!("refresh #{} succeeded but no readable receipt on disk", token.id);
                    Err(ReceiptError::NoReceiptData)
                }
            },
            Err(e) => {
                warn!("refresh #{} failed: {}", token.id, e);
                Err(ReceiptError::Network(e))
            }
        }
    }

    /// Fetches the receipt, then hands it to the validator.
    ///
    /// Any fetch error short-circuits: a missing or unrefreshable
    /// receipt is never sent to the validator. Completion is always
    /// observed at the caller's await point, regardless of which thread
    /// the validator finished on.
    ///
    /// # Errors
    ///
    /// Returns the fetch error kinds of [`Self::fetch_receipt`], or
    /// [`ReceiptError::Validation`] passing the validator's failure
    /// through verbatim.
    pub async fn verify_receipt(
        &self,
        validator: &dyn ReceiptValidator,
        force_refresh: bool,
        refresher: &dyn ReceiptRefresher,
    ) -> ReceiptResult<ReceiptInfo> {
        let encoded = self.fetch_receipt(force_refresh, refresher).await?;
        let info = validator.validate(encoded.as_str()).await?;
        debug!("receipt validated");
        Ok(info)
    }
}
