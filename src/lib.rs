//! Purchase receipt fetching and verification.
//!
//! This crate handles:
//! - Locating the locally stored, signed purchase receipt on disk
//! - Refreshing the receipt from its issuing authority when missing or forced
//! - Handing the encoded receipt to a pluggable validator
//!
//! # Design Principles
//!
//! - **Storage is the source of truth**: the receipt is re-read from disk
//!   on every fetch, never cached in memory
//! - **Refresh only when needed**: a readable receipt short-circuits the
//!   fetch with zero network activity unless a refresh is forced
//! - **Injected collaborators**: the refresh and validation capabilities
//!   are traits passed in per call, so tests substitute doubles
//! - **Caller-context completion**: both entry points are `async fn`s;
//!   results are always observed at the caller's await point, no matter
//!   which thread a collaborator finished its work on
//!
//! # Flow
//!
//! `fetch_receipt` consults the locator; on a hit (and no forced refresh)
//! it returns the base64-encoded receipt immediately. Otherwise it runs
//! the injected [`ReceiptRefresher`] and re-reads the receipt afterward.
//! `verify_receipt` is `fetch_receipt` followed by the injected
//! [`ReceiptValidator`].

mod error;
mod locator;
mod refresh;
mod validator;
mod verifier;

pub use error::{ReceiptError, ReceiptResult};
pub use locator::{EncodedReceipt, ReceiptLocator};
pub use refresh::{ReceiptRefresher, RefreshError, RefreshOptions};
pub use validator::{ReceiptInfo, ReceiptStatus, ReceiptValidator, ValidationError};
pub use verifier::{ReceiptVerifier, RefreshToken};

#[cfg(feature = "online")]
mod remote;

#[cfg(feature = "online")]
pub use remote::{RemoteValidator, RemoteValidatorConfig, VerifyService};
