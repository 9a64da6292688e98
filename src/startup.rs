// Startup module - displays banner and component status
//
// Printed before the TUI takes over the screen (or in headless mode):
// - Version info and branding
// - Configuration file status
// - Catalog backend, presign endpoint and run mode

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Component status for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// How this run was started
pub fn mode_label(config: &Config) -> &'static str {
    match (config.demo_mode, config.enable_tui) {
        (true, _) => "demo",
        (false, true) => "tui",
        (false, false) => "headless",
    }
}

/// Status of each component based on config and the chosen backend
fn get_module_status(config: &Config, backend: &str) -> Vec<ModuleStatus> {
    let server = !config.demo_mode;
    vec![
        ModuleStatus {
            name: "catalog",
            enabled: true,
            description: format!("{backend} backend"),
        },
        ModuleStatus {
            name: "server",
            enabled: server,
            description: if server {
                format!("presign API on {}", config.bind_addr)
            } else {
                "not started in demo mode".to_string()
            },
        },
        ModuleStatus {
            name: "signing",
            enabled: server && config.storage.has_credentials(),
            description: if config.storage.bucket.is_empty() {
                "no bucket configured".to_string()
            } else {
                format!("s3://{} ({})", config.storage.bucket, config.storage.region)
            },
        },
        ModuleStatus {
            name: "tui",
            enabled: config.enable_tui,
            description: "Terminal interface".to_string(),
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: config.logging.file_dir.display().to_string(),
        },
    ]
}

/// Print the startup banner
pub fn print_startup(config: &Config, backend: &str) {
    use colors::*;

    // Banner
    println!();
    println!("  {BOLD}{CYAN}sheetview{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Datasheets and design rules for schematic parts{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    println!("  {DIM}Components...{RESET}");
    for module in &get_module_status(config, backend) {
        print_module_status(module);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Signed URLs from {BOLD}{}{RESET}",
        if config.demo_mode {
            "demo provider"
        } else {
            config.presign_url.as_str()
        }
    );
    match mode_label(config) {
        "demo" => {
            println!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(in-memory catalog){RESET}")
        }
        "headless" => println!("  {MAGENTA}▸{RESET} Headless mode {DIM}(Ctrl+C to stop){RESET}"),
        _ => {}
    }
    println!();
}

/// Print a single component's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<10}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Write the startup summary to the log (visible in the TUI logs panel)
pub fn log_startup(config: &Config, backend: &str) {
    tracing::info!("═══════════════════════════════════");
    tracing::info!("  📑 SHEETVIEW v{}", VERSION);
    tracing::info!("═══════════════════════════════════");

    for module in &get_module_status(config, backend) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    tracing::info!(mode = mode_label(config), "Ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_mode_wins_over_headless() {
        let mut config = Config::default();
        assert_eq!(mode_label(&config), "tui");
        config.enable_tui = false;
        assert_eq!(mode_label(&config), "headless");
        config.demo_mode = true;
        assert_eq!(mode_label(&config), "demo");
    }

    #[test]
    fn server_is_off_in_demo_mode() {
        let mut config = Config::default();
        config.demo_mode = true;
        let modules = get_module_status(&config, "memory");
        let server = modules.iter().find(|m| m.name == "server").unwrap();
        assert!(!server.enabled);
        assert_eq!(modules[0].description, "memory backend");
    }
}
