//! Payroll Engine HTTP server.
//!
//! Environment:
//! - `PAYROLL_CONFIG_DIR`: configuration directory (default `./config/payroll`)
//! - `PAYROLL_BIND`: listen address (default `127.0.0.1:8080`)
//! - `PAYROLL_LOG_JSON`: `true` for JSON log lines
//! - `RUST_LOG`: log filter (default `info`)

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/payroll";
const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing(env_bool("PAYROLL_LOG_JSON", false));

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind = std::env::var("PAYROLL_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let loader = ConfigLoader::load(&config_dir).map_err(|e| e.to_string())?;
    info!(
        config_dir = %config_dir,
        workers = loader.engine().workers,
        upsert_attempts = loader.engine().upsert_attempts,
        batch_timeout_ms = loader.engine().batch_timeout_ms,
        "Configuration loaded"
    );

    let app = create_router(AppState::in_memory(loader.config()));
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("bind {} failed: {}", bind, e))?;
    info!(address = %bind, "Payroll engine listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {}", e))?;

    info!("Payroll engine stopped");
    Ok(())
}
