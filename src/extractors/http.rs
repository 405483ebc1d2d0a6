//! HTTP extraction service client.
//!
//! The PDF is sent as the raw request body (`Content-Type: application/pdf`).
//! The service answers with JSON:
//!
//! ```json
//! { "success": true, "message": "Extracted 5 skills" }
//! ```
//!
//! `succeeded` is accepted in place of `success`. A non-2xx status is an
//! [`ExtractorError::Status`] carrying the (truncated) response body.

use crate::error::{ExtractorError, IntakeError};
use crate::pipeline::extract::Extractor;
use crate::types::{BinaryPayload, ExtractionResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in [`ExtractorError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(alias = "succeeded")]
    success: bool,
    #[serde(default)]
    message: String,
}

/// Submits payloads to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpExtractor {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, IntakeError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IntakeError::ExtractorNotConfigured {
                extractor: "http".to_string(),
                hint: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, payload: &BinaryPayload) -> Result<ExtractionResult, ExtractorError> {
        debug!("POST {} ({} bytes)", self.endpoint, payload.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/pdf")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ExtractorError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
                body.push('\u{2026}');
            }
            return Err(ExtractorError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ExtractorError::InvalidResponse(e.to_string()))?;

        Ok(ExtractionResult {
            succeeded: body.success,
            message: body.message,
        })
    }
}
