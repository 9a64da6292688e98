// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults
// - catalog init: Create a local SQLite catalog, optionally with demo data

use crate::catalog::sqlite::SqliteCatalog;
use crate::config::{Config, VERSION};
use crate::demo;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};

/// sheetview - Datasheet and design-rule viewer for schematic parts
#[derive(Parser)]
#[command(name = "sheetview")]
#[command(version = VERSION)]
#[command(about = "Datasheet and design-rule viewer for schematic parts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
    /// Manage the local SQLite catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Create the catalog schema
    Init {
        /// Seed the catalog with the demo parts
        #[arg(long)]
        demo: bool,

        /// Database file (defaults to the configured db_path)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Handle CLI commands. Returns true if a command was handled (exit after).
pub fn handle_cli() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path()?;
            } else if show {
                handle_config_show()?;
            } else if reset {
                handle_config_reset()?;
            } else {
                // No flag provided, show help
                println!("Usage: sheetview config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(true)
        }
        Some(Commands::Catalog {
            action: CatalogAction::Init { demo, path },
        }) => {
            let path = match path {
                Some(path) => path,
                None => Config::from_env()?.catalog.db_path,
            };
            let parts = init_catalog(&path, demo)?;
            if demo {
                println!("Catalog created at {} with {} demo parts", path.display(), parts);
            } else {
                println!("Catalog created at {}", path.display());
            }
            Ok(true)
        }
        None => Ok(false), // No subcommand, run the viewer
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!("# Secrets are read from the environment and shown as set/unset");
    println!();
    println!("bind_addr = {:?}", config.bind_addr.to_string());
    println!("presign_url = {:?}", config.presign_url);
    println!("theme = {:?}", config.theme);
    println!("tui = {}", config.enable_tui);
    println!("demo = {}", config.demo_mode);
    println!();
    println!("[catalog]");
    println!("backend = {:?}", config.catalog.backend.as_str());
    println!("supabase_url = {:?}", config.catalog.supabase_url);
    println!("supabase_key = {}", set_or_unset(&config.catalog.supabase_key));
    println!("db_path = {:?}", config.catalog.db_path.display().to_string());
    println!("timeout_secs = {}", config.catalog.timeout_secs);
    println!();
    println!("[storage]");
    println!("region = {:?}", config.storage.region);
    println!("bucket = {:?}", config.storage.bucket);
    if let Some(endpoint) = &config.storage.endpoint {
        println!("endpoint = {:?}", endpoint);
    }
    println!("expires_secs = {}", config.storage.expires_secs);
    println!(
        "access_key_id = {}",
        set_or_unset(&config.storage.access_key_id)
    );
    println!(
        "secret_access_key = {}",
        set_or_unset(&config.storage.secret_access_key)
    );
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!(
        "file_dir = {:?}",
        config.logging.file_dir.display().to_string()
    );
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn set_or_unset(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "(set)",
        _ => "(unset)",
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::default()
        .save()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

/// Create the schema at `path`; with `demo`, also insert the demo parts.
/// Returns the number of parts inserted.
pub fn init_catalog(path: &Path, demo: bool) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("Failed to open catalog database {}", path.display()))?;
    SqliteCatalog::create_schema(&conn).context("Failed to create catalog schema")?;

    if !demo {
        return Ok(0);
    }

    let entries = demo::demo_entries();
    let tx = conn.transaction()?;
    for entry in &entries {
        SqliteCatalog::insert_part(&tx, &entry.part, entry.checklist_id, &entry.rules)
            .with_context(|| format!("Failed to insert demo part {}", entry.part.part_id))?;
    }
    tx.commit()?;

    tracing::debug!(parts = entries.len(), "Seeded demo catalog");
    Ok(entries.len())
}
