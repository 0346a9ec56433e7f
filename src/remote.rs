//! Remote receipt validation over HTTPS.
//!
//! Posts the encoded receipt to the issuing authority's verification
//! endpoint and interprets the top-level `status` field of the JSON
//! response. Everything else in the response is passed through
//! untouched as [`ReceiptInfo`].

use crate::validator::{ReceiptInfo, ReceiptStatus, ReceiptValidator, ValidationError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Which verification endpoint to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyService {
    /// The production endpoint.
    Production,
    /// The sandbox endpoint (test purchases).
    Sandbox,
    /// A custom endpoint, e.g. a local mock server.
    Custom(String),
}

impl VerifyService {
    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Production => "https://buy.itunes.apple.com/verifyReceipt",
            Self::Sandbox => "https://sandbox.itunes.apple.com/verifyReceipt",
            Self::Custom(url) => url,
        }
    }
}

/// Configuration for [`RemoteValidator`].
#[derive(Debug, Clone)]
pub struct RemoteValidatorConfig {
    /// The verification endpoint.
    pub service: VerifyService,
    /// Shared secret; only needed for receipts containing auto-renewable
    /// subscriptions.
    pub shared_secret: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RemoteValidatorConfig {
    fn default() -> Self {
        Self {
            service: VerifyService::Production,
            shared_secret: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "receipt-data")]
    receipt_data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

/// Validates receipts against a remote verification service.
pub struct RemoteValidator {
    config: RemoteValidatorConfig,
    client: Client,
}

impl RemoteValidator {
    /// Creates a validator for the configured service.
    pub fn new(config: RemoteValidatorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    /// Returns the configured service.
    #[must_use]
    pub fn service(&self) -> &VerifyService {
        &self.config.service
    }
}

#[async_trait]
impl ReceiptValidator for RemoteValidator {
    async fn validate(&self, encoded_receipt: &str) -> Result<ReceiptInfo, ValidationError> {
        let request = VerifyRequest {
            receipt_data: encoded_receipt,
            password: self.config.shared_secret.as_deref(),
        };

        let response = self
            .client
            .post(self.config.service.url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ValidationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ValidationError::Network(format!(
                "verification service returned HTTP {}",
                response.status()
            )));
        }

        let body: ReceiptInfo = response
            .json()
            .await
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        let code = body
            .get("status")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                ValidationError::InvalidJson("response missing numeric `status` field".to_string())
            })?;

        debug!("verification service returned status {}", code);

        let status = ReceiptStatus::from_code(code);
        if !status.is_valid() {
            return Err(ValidationError::Invalid { status });
        }

        Ok(body)
    }
}
