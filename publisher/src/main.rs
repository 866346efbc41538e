//! sitepub - Entry Point
//!
//! Publishes site pages edited in SiteHub to a GitHub repository and reports
//! their GitHub Pages deployment status.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use secrecy::SecretString;
use sitepub::app::options::AppOptions;
use sitepub::app::run::run;
use sitepub::filesys::file::File;
use sitepub::logs::{init_logging, LogOptions};
use sitepub::storage::layout::StorageLayout;
use sitepub::storage::settings::Settings;
use sitepub::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return;
    }

    // Locate the settings file
    let explicit_config = cli_args.get("config").map(PathBuf::from);
    let (layout, settings_file) = match &explicit_config {
        Some(path) => {
            let base_dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            (StorageLayout::new(base_dir), File::new(path.clone()))
        }
        None => {
            let layout = StorageLayout::default();
            let settings_file = layout.settings_file();
            (layout, settings_file)
        }
    };

    let mut settings = if settings_file.exists().await {
        match settings_file.read_json::<Settings>().await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!(
                    "Unable to read settings file {}: {}",
                    settings_file.path().display(),
                    e
                );
                return;
            }
        }
    } else if explicit_config.is_some() {
        eprintln!("Settings file {} not found", settings_file.path().display());
        return;
    } else {
        Settings::default()
    };

    // Command line overrides
    if let Some(host) = cli_args.get("host") {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli_args.get("port") {
        match port.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => {
                eprintln!("Invalid port: {}", port);
                return;
            }
        }
    }
    if let Some(level) = cli_args.get("log-level") {
        match level.parse() {
            Ok(level) => settings.log_level = level,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        }
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.json_logs,
        log_dir: settings.log_to_file.then(|| layout.logs_dir()),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let token = env::var(&settings.github.token_env)
        .ok()
        .filter(|t| !t.is_empty())
        .map(SecretString::from);

    let options = match AppOptions::from_settings(&settings, token) {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid settings: {}", e);
            return;
        }
    };

    info!("Running sitepub {} with options: {:?}", version.version, options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run sitepub: {e}");
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, shutting down...");
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Ctrl+C received, shutting down...");
                    }
                }
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
