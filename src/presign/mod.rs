//! Signed datasheet URLs
//!
//! The viewer never talks to object storage directly. It asks a
//! [`SignedUrlProvider`] for a time-limited link to a storage key:
//!
//! - [`HttpSignedUrlProvider`] calls `GET /api/presigned-url` on the server
//! - [`sigv4::S3Presigner`] is what that endpoint uses to mint the URL
//! - `crate::demo::DemoUrlProvider` fakes links in demo mode

pub mod sigv4;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifetime of a presigned URL unless configured otherwise
pub const DEFAULT_EXPIRES_SECS: u64 = 3600;

/// Route served by the presign endpoint
pub const PRESIGN_PATH: &str = "/api/presigned-url";

/// Success body: `{"url": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedUrlBody {
    pub url: String,
}

/// Failure body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Returns a time-boxed download URL for a private object
#[async_trait]
pub trait SignedUrlProvider: Send + Sync {
    async fn signed_url(&self, file_path: &str) -> Result<String>;
}

/// Client for the presign endpoint
pub struct HttpSignedUrlProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSignedUrlProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create presign HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, file_path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, PRESIGN_PATH))
            .query(&[("filePath", file_path)])
    }
}

#[async_trait]
impl SignedUrlProvider for HttpSignedUrlProvider {
    async fn signed_url(&self, file_path: &str) -> Result<String> {
        let response = self
            .request(file_path)
            .send()
            .await
            .context("Presign request failed")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read presign response")?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.trim().to_string());
            anyhow::bail!("presign endpoint returned {status}: {reason}");
        }

        let parsed: PresignedUrlBody =
            serde_json::from_str(&body).context("Presign response is not {url}")?;
        Ok(parsed.url)
    }
}
