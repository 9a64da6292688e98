//! Configuration for the viewer and the presign server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/sheetview/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Secrets (Supabase key, AWS credentials) are read from the environment only.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod catalog;
mod logging;
mod serialization;
mod storage;


pub use catalog::{CatalogBackend, CatalogConfig, FileCatalog};
pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use storage::{FileStorage, StorageConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:3000";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the presign server binds to
    pub bind_addr: SocketAddr,

    /// Base URL the viewer asks for signed URLs (defaults to the local server)
    pub presign_url: String,

    /// Whether to enable the TUI (disabled = headless server only)
    pub enable_tui: bool,

    /// Demo mode: in-memory catalog and fake signed URLs
    pub demo_mode: bool,

    /// Palette name: "dark" or "light"
    pub theme: String,

    pub catalog: CatalogConfig,

    pub storage: StorageConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let bind_addr = SocketAddr::from(([127, 0, 0, 1], 3000));
        Self {
            bind_addr,
            presign_url: format!("http://{bind_addr}"),
            enable_tui: true,
            demo_mode: false,
            theme: "dark".to_string(),
            catalog: CatalogConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub presign_url: Option<String>,
    pub theme: Option<String>,

    /// Optional [catalog] section
    pub catalog: Option<FileCatalog>,

    /// Optional [storage] section
    pub storage: Option<FileStorage>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Truthy runtime flag ("1" or "true")
fn flag(value: Option<String>) -> bool {
    value
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl Config {
    /// Get the config file path: ~/.config/sheetview/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("sheetview").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that exists but cannot be read or parsed is an error rather
    /// than a silent fallback to defaults.
    pub(crate) fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file_config(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Bind address: env > file > default
        let bind_raw = env("SHEETVIEW_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .with_context(|| format!("Invalid bind address `{bind_raw}`"))?;

        // Presign endpoint: env > file > the local server
        let presign_url = env("SHEETVIEW_PRESIGN_URL")
            .or(file.presign_url)
            .unwrap_or_else(|| format!("http://{bind_addr}"))
            .trim_end_matches('/')
            .to_string();

        // Runtime flags: env only
        let enable_tui = !flag(env("SHEETVIEW_NO_TUI"));
        let demo_mode = flag(env("SHEETVIEW_DEMO"));

        let theme = env("SHEETVIEW_THEME")
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let mut catalog = CatalogConfig::from_file(file.catalog);
        if let Some(url) = env("SUPABASE_URL") {
            catalog.supabase_url = url;
        }
        catalog.supabase_key = env("SUPABASE_ANON_KEY").filter(|k| !k.is_empty());
        // An explicit database path selects the local mirror
        if let Some(path) = env("SHEETVIEW_DB_PATH") {
            catalog.db_path = PathBuf::from(path);
            catalog.backend = CatalogBackend::Sqlite;
        }

        let mut storage = StorageConfig::from_file(file.storage);
        if let Some(region) = env("AWS_REGION") {
            storage.region = region;
        }
        if let Some(bucket) = env("S3_BUCKET_NAME") {
            storage.bucket = bucket;
        }
        if let Some(endpoint) = env("S3_ENDPOINT").filter(|e| !e.is_empty()) {
            storage.endpoint = Some(endpoint);
        }
        storage.access_key_id = env("AWS_ACCESS_KEY_ID");
        storage.secret_access_key = env("AWS_SECRET_ACCESS_KEY");
        storage.session_token = env("AWS_SESSION_TOKEN");

        let logging = LoggingConfig::from_file(file.logging);

        Ok(Self {
            bind_addr,
            presign_url,
            enable_tui,
            demo_mode,
            theme,
            catalog,
            storage,
            logging,
        })
    }
}
