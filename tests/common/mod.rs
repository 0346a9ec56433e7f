//! Shared test helpers for receipt tests.

#![allow(dead_code)]

use async_trait::async_trait;
use purchasekit::{
    ReceiptInfo, ReceiptRefresher, ReceiptValidator, RefreshError, RefreshOptions, ValidationError,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tokio::sync::Notify;

/// A receipt path inside a temp dir; keeps the dir alive for the test.
pub struct TempReceipt {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Returns a fresh (not yet written) receipt path.
pub fn temp_receipt() -> TempReceipt {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("receipt");
    TempReceipt { dir, path }
}

pub fn write_receipt(path: &Path, bytes: &[u8]) {
    std::fs::write(path, bytes).unwrap();
}

/// What a `MockRefresher` does when invoked.
pub enum RefreshBehavior {
    /// Resolve successfully, optionally writing bytes to the receipt
    /// path just before resolving.
    Succeed(Option<Vec<u8>>),
    /// Resolve with the given failure cause.
    Fail(RefreshError),
}

/// Scripted refresher that counts invocations and records the options
/// it was handed.
pub struct MockRefresher {
    path: PathBuf,
    behavior: RefreshBehavior,
    calls: AtomicUsize,
    seen_options: Mutex<Vec<Option<RefreshOptions>>>,
}

impl MockRefresher {
    pub fn succeeding(path: impl Into<PathBuf>, bytes: Option<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            behavior: RefreshBehavior::Succeed(bytes),
            calls: AtomicUsize::new(0),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(path: impl Into<PathBuf>, cause: RefreshError) -> Self {
        Self {
            path: path.into(),
            behavior: RefreshBehavior::Fail(cause),
            calls: AtomicUsize::new(0),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_options(&self) -> Vec<Option<RefreshOptions>> {
        self.seen_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiptRefresher for MockRefresher {
    async fn refresh(&self, options: Option<&RefreshOptions>) -> Result<(), RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_options.lock().unwrap().push(options.cloned());
        match &self.behavior {
            RefreshBehavior::Succeed(Some(bytes)) => {
                std::fs::write(&self.path, bytes).unwrap();
                Ok(())
            }
            RefreshBehavior::Succeed(None) => Ok(()),
            RefreshBehavior::Fail(cause) => Err(cause.clone()),
        }
    }
}

/// Refresher that blocks until released, so tests can observe the
/// in-flight state deterministically.
pub struct GatedRefresher {
    path: PathBuf,
    bytes: Vec<u8>,
    started: Notify,
    release: Notify,
    calls: AtomicUsize,
}

impl GatedRefresher {
    pub fn new(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.to_vec(),
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Waits until a refresh call has started.
    pub async fn wait_until_started(&self) {
        self.started.notified().await;
    }

    /// Lets one blocked refresh call complete.
    pub fn release_one(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReceiptRefresher for GatedRefresher {
    async fn refresh(&self, _options: Option<&RefreshOptions>) -> Result<(), RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        std::fs::write(&self.path, &self.bytes).unwrap();
        Ok(())
    }
}

/// Scripted validator that counts invocations and records the encoded
/// receipts it was handed.
pub struct MockValidator {
    result: Mutex<Option<Result<ReceiptInfo, ValidationError>>>,
    calls: AtomicUsize,
    seen_receipts: Mutex<Vec<String>>,
}

impl MockValidator {
    pub fn succeeding(info: ReceiptInfo) -> Self {
        Self {
            result: Mutex::new(Some(Ok(info))),
            calls: AtomicUsize::new(0),
            seen_receipts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ValidationError) -> Self {
        Self {
            result: Mutex::new(Some(Err(error))),
            calls: AtomicUsize::new(0),
            seen_receipts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_receipts(&self) -> Vec<String> {
        self.seen_receipts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiptValidator for MockValidator {
    async fn validate(&self, encoded_receipt: &str) -> Result<ReceiptInfo, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_receipts
            .lock()
            .unwrap()
            .push(encoded_receipt.to_string());
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("validator invoked more than once")
    }
}

/// Validator that resolves from a foreign OS thread, for pinning down
/// where completion is observed.
pub struct ThreadedValidator {
    info: ReceiptInfo,
}

impl ThreadedValidator {
    pub fn new(info: ReceiptInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl ReceiptValidator for ThreadedValidator {
    async fn validate(&self, _encoded_receipt: &str) -> Result<ReceiptInfo, ValidationError> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let info = self.info.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            let _ = tx.send(info);
        });
        rx.await
            .map_err(|_| ValidationError::Other("validator thread dropped".to_string()))
    }
}

/// Standard base64 of the given bytes, for asserting encoded receipts.
pub fn base64_of(bytes: &[u8]) -> String {
    use base64::{Engine, engine::general_purpose::STANDARD};
    STANDARD.encode(bytes)
}
