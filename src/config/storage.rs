//! Object storage configuration for datasheet PDFs
//!
//! Credentials come from the environment only; the file carries the
//! non-secret bucket coordinates.

use serde::Deserialize;

use crate::presign::DEFAULT_EXPIRES_SECS;

/// S3 bucket settings used by the presigned URL endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// S3-compatible endpoint (path-style addressing)
    pub endpoint: Option<String>,
    /// Lifetime of minted URLs
    pub expires_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            bucket: String::new(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            endpoint: None,
            expires_secs: DEFAULT_EXPIRES_SECS,
        }
    }
}

/// Storage settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileStorage {
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub expires_secs: Option<u64>,
}

impl StorageConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileStorage>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            region: file.region.unwrap_or(defaults.region),
            bucket: file.bucket.unwrap_or(defaults.bucket),
            endpoint: file.endpoint.filter(|e| !e.is_empty()),
            expires_secs: file.expires_secs.unwrap_or(defaults.expires_secs),
            ..defaults
        }
    }

    /// Whether enough is set to attempt signing
    pub fn has_credentials(&self) -> bool {
        self.access_key_id.as_deref().is_some_and(|k| !k.is_empty())
            && self
                .secret_access_key
                .as_deref()
                .is_some_and(|k| !k.is_empty())
    }
}
