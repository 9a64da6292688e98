//! `[logging]` settings: filter level and the optional JSON log file
//!
//! The TUI never writes logs to the terminal, so the file is the only
//! persistent record of loader chains and signing failures.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, RollingFileAppender};

/// When the log file starts a new segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the lifetime of the install
    Never,
}

impl LogRotation {
    /// Unknown names rotate daily
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn appender(self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => rolling::hourly(dir, prefix),
            Self::Daily => rolling::daily(dir, prefix),
            Self::Never => rolling::never(dir, prefix),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level for sheetview's own targets
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// `sheetview` -> `sheetview.2026-10-19`
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "sheetview".to_string(),
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map_or(defaults.file_dir, PathBuf::from),
            file_rotation: file
                .file_rotation
                .map_or(defaults.file_rotation, |s| LogRotation::from_str(&s)),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }

    /// Filter used when RUST_LOG is unset; the web stack stays quiet
    pub fn default_filter(&self) -> String {
        format!("sheetview={},tower_http=warn,axum=warn,hyper=warn", self.level)
    }

    /// Background writer for the log file, or None when disabled or the
    /// directory cannot be created. The guard must outlive the subscriber.
    pub fn file_writer(&self) -> Option<(NonBlocking, WorkerGuard)> {
        if !self.file_enabled {
            return None;
        }
        if let Err(e) = std::fs::create_dir_all(&self.file_dir) {
            // Logging is not up yet
            eprintln!(
                "Warning: could not create log directory {}: {}",
                self.file_dir.display(),
                e
            );
            return None;
        }
        let appender = self.file_rotation.appender(&self.file_dir, &self.file_prefix);
        Some(tracing_appender::non_blocking(appender))
    }
}
