// sheetview - Datasheet and design-rule viewer for schematic parts
//
// Pick a part from the catalog and see its datasheet link, its design
// rules grouped by category and its pin table side by side.
//
// Architecture:
// - Catalog (Supabase/PostgREST, SQLite or in-memory): part, checklist and rule lookups
// - Presign server (axum): mints time-limited S3 links for datasheet PDFs
// - Viewer session: search, selection tokens, split pane, collapse state
// - Loader tasks: run the lookup chain per selection and report over mpsc
// - TUI (ratatui): renders the session and feeds input back into it

mod catalog;
mod cli;
mod config;
mod demo;
mod events;
mod logging;
mod presign;
mod server;
mod startup;
mod theme;
mod tui;
mod util;
mod viewer;

use anyhow::{Context, Result};
use catalog::postgrest::PostgrestCatalog;
use catalog::sqlite::SqliteCatalog;
use catalog::PartRepository;
use config::{CatalogBackend, Config};
use logging::{LogBuffer, TuiLogLayer};
use presign::{HttpSignedUrlProvider, SignedUrlProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viewer::DataLoader;

/// Loader results waiting for the UI
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config, catalog init)
    // If a command was handled, exit early
    if cli::handle_cli()? {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Load configuration first to determine TUI vs headless mode
    let config = Config::from_env()?;

    // Create log buffer for TUI mode
    let log_buffer = LogBuffer::new();

    // The guard must live until exit so file logs flush
    let _file_guard = init_logging(&config, &log_buffer);

    // Create shutdown channel for graceful server shutdown
    // This is a oneshot channel - it can only send one signal
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    // The presign server is skipped in demo mode (links are faked locally)
    let server_handle = if config.demo_mode {
        tracing::info!("Running in DEMO MODE - in-memory catalog, fake signed URLs");
        None
    } else {
        let server_config = config.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = server::start_server(server_config, shutdown_rx).await {
                tracing::error!("Presign server failed: {:#}", e);
            }
        }))
    };

    if config.enable_tui {
        let repo = build_repository(&config)?;
        let urls = build_url_provider(&config)?;
        let backend = repo.backend_name();

        // Print startup banner before the TUI takes the screen
        startup::print_startup(&config, backend);
        startup::log_startup(&config, backend);

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let loader = DataLoader::new(repo, urls, event_tx);

        tracing::info!("Starting TUI");
        if let Err(e) = tui::run_tui(event_rx, log_buffer, config, loader, backend).await {
            tracing::error!("TUI error: {:?}", e);
        }
    } else {
        let backend = backend_label(&config);
        startup::print_startup(&config, backend);
        startup::log_startup(&config, backend);

        tracing::info!("TUI disabled, running in headless mode");
        // In headless mode, just wait for Ctrl+C
        tokio::signal::ctrl_c().await?;
    }

    tracing::info!("Shutting down...");

    // Signal the server to shut down gracefully
    // If the send fails, the server has already stopped (which is fine)
    let _ = shutdown_tx.send(());
    if let Some(handle) = server_handle {
        let _ = handle.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing with conditional output
///
/// - TUI mode: capture logs to the buffer (prevents garbling the display)
/// - Headless mode: write logs to stdout
/// - File logging: optionally add a JSON layer with rotation
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_logging(config: &Config, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.default_filter().into());

    let (file_writer, guard) = config.logging.file_writer().unzip();

    // File layer uses JSON format for structured log parsing
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });
    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stdout_layer = (!config.enable_tui).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

/// Backend name shown when no repository is built
fn backend_label(config: &Config) -> &'static str {
    if config.demo_mode {
        "memory"
    } else {
        config.catalog.backend.as_str()
    }
}

/// Catalog backend for this run
fn build_repository(config: &Config) -> Result<Arc<dyn PartRepository>> {
    if config.demo_mode {
        return Ok(Arc::new(demo::demo_catalog()));
    }

    let catalog = &config.catalog;
    match catalog.backend {
        CatalogBackend::Supabase => {
            let key = catalog
                .supabase_key
                .as_deref()
                .context("SUPABASE_ANON_KEY is not set (or use SHEETVIEW_DB_PATH / SHEETVIEW_DEMO=1)")?;
            if catalog.supabase_url.is_empty() {
                anyhow::bail!("SUPABASE_URL is not set (or set [catalog].supabase_url)");
            }
            let repo = PostgrestCatalog::new(
                &catalog.supabase_url,
                key,
                Duration::from_secs(catalog.timeout_secs),
            )?;
            tracing::debug!("Catalog: Supabase at {}", catalog.supabase_url);
            Ok(Arc::new(repo))
        }
        CatalogBackend::Sqlite => {
            let repo = SqliteCatalog::open(&catalog.db_path)?;
            tracing::debug!("Catalog: SQLite at {}", catalog.db_path.display());
            Ok(Arc::new(repo))
        }
    }
}

/// Signed URL source for this run
fn build_url_provider(config: &Config) -> Result<Arc<dyn SignedUrlProvider>> {
    if config.demo_mode {
        return Ok(Arc::new(demo::DemoUrlProvider::new()));
    }
    let provider = HttpSignedUrlProvider::new(
        &config.presign_url,
        Duration::from_secs(config.catalog.timeout_secs),
    )?;
    tracing::debug!("Signed URLs from {}", provider.base_url());
    Ok(Arc::new(provider))
}
