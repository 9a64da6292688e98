//! Catalog configuration: which backend serves part data

use serde::Deserialize;
use std::path::PathBuf;

/// Catalog backend selection
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogBackend {
    /// Supabase / PostgREST (default)
    #[default]
    Supabase,
    /// Local SQLite mirror
    Sqlite,
}

impl CatalogBackend {
    /// Parse backend string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sqlite" | "local" => Self::Sqlite,
            _ => Self::Supabase,
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supabase => "supabase",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,
    /// Supabase project URL
    pub supabase_url: String,
    /// Supabase anon key (environment only, never written to the file)
    pub supabase_key: Option<String>,
    /// SQLite mirror location
    pub db_path: PathBuf,
    /// Per-request timeout for the hosted backend
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::Supabase,
            supabase_url: String::new(),
            supabase_key: None,
            db_path: PathBuf::from("./data/catalog.db"),
            timeout_secs: 15,
        }
    }
}

/// Catalog settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCatalog {
    pub backend: Option<String>,
    pub supabase_url: Option<String>,
    pub db_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileCatalog>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            backend: file
                .backend
                .map(|s| CatalogBackend::from_str(&s))
                .unwrap_or(defaults.backend),
            supabase_url: file.supabase_url.unwrap_or(defaults.supabase_url),
            supabase_key: None,
            db_path: file.db_path.map(PathBuf::from).unwrap_or(defaults.db_path),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}
