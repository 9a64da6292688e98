//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        format!(
            r#"# sheetview configuration

# Palette: dark, light
theme = "{theme}"

# Presigned URL server bind address
bind_addr = "{bind}"

# Where the viewer requests signed datasheet URLs
presign_url = "{presign_url}"

# ─────────────────────────────────────────────────────────────────────────────
# PART CATALOG
# ─────────────────────────────────────────────────────────────────────────────
# backend: supabase (hosted PostgREST) or sqlite (local mirror)
# The Supabase key is read from SUPABASE_ANON_KEY; SUPABASE_URL overrides the url.
# SHEETVIEW_DB_PATH selects the sqlite backend with that database.
[catalog]
backend = "{catalog_backend}"
supabase_url = "{supabase_url}"
db_path = "{db_path}"
timeout_secs = {timeout_secs}

# ─────────────────────────────────────────────────────────────────────────────
# DATASHEET STORAGE (S3)
# ─────────────────────────────────────────────────────────────────────────────
# Credentials come from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY /
# AWS_SESSION_TOKEN. AWS_REGION, S3_BUCKET_NAME and S3_ENDPOINT override below.
[storage]
region = "{region}"
bucket = "{bucket}"
{endpoint}expires_secs = {expires_secs}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            bind = self.bind_addr,
            presign_url = self.presign_url,
            catalog_backend = self.catalog.backend.as_str(),
            supabase_url = self.catalog.supabase_url,
            db_path = self.catalog.db_path.display(),
            timeout_secs = self.catalog.timeout_secs,
            region = self.storage.region,
            bucket = self.storage.bucket,
            endpoint = self
                .storage
                .endpoint
                .as_ref()
                .map(|e| format!("endpoint = \"{}\"\n", e))
                .unwrap_or_else(|| "# endpoint = \"http://localhost:9000\"  # MinIO, R2, ...\n".to_string()),
            expires_secs = self.storage.expires_secs,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
