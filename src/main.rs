//! Charger Directory
//!
//! REST service for EV charging stations managed by their owners.
//! Reads configuration from a TOML file (~/.config/charger-directory/config.toml,
//! or the path in `CHARGERS_CONFIG`).

use charger_directory::config::LoggingSection;
use charger_directory::server::{ServerHandle, ServerOptions};
use charger_directory::{default_config_path, AppConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSection) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = default_config_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_tracing(&LoggingSection::default());
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config: app_cfg,
        auto_migrate: true,
    })
    .await
    .map_err(|e| {
        error!("Failed to start: {}", e);
        e
    })?;

    handle.install_signal_handler();
    info!("Server started. Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    Ok(())
}
