//! Storefront Server: customer, product and order CRUD over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::path::PathBuf;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use storefront_api::{AppState, build_app};
use storefront_core::config::{AppConfig, DatabaseConfig, LogFormat};
use storefront_core::error::AppError;
use storefront_database::{DatabasePool, run_migrations};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STOREFRONT_ENV").unwrap_or_else(|_| "production".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter_directives()));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Starting Storefront"
    );

    create_database_directory(&config.database).await?;

    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let addr = config.server.bind_address();
    let grace = config.server.shutdown_grace();
    let state = AppState::new(config, db.clone());
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Storefront server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, draining connections...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace_elapsed = async move {
        let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = grace_elapsed => {
            warn!(grace_seconds = grace.as_secs(), "Grace period elapsed with requests in flight");
        }
    }

    db.close().await;
    info!("Storefront server shut down gracefully");
    Ok(())
}

/// Create the directory holding a file-backed database.
async fn create_database_directory(config: &DatabaseConfig) -> Result<(), AppError> {
    if config.is_in_memory() {
        return Ok(());
    }
    let Some(dir) = database_directory(&config.url) else {
        return Ok(());
    };

    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::internal(format!("Failed to create dir '{}': {e}", dir.display()))
    })
}

fn database_directory(url: &str) -> Option<PathBuf> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    PathBuf::from(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(PathBuf::from)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_directory() {
        assert_eq!(
            database_directory("sqlite://data/storefront.db"),
            Some(PathBuf::from("data"))
        );
        assert_eq!(
            database_directory("sqlite:/var/lib/store/db.sqlite?mode=rwc"),
            Some(PathBuf::from("/var/lib/store"))
        );
        assert_eq!(database_directory("sqlite://storefront.db"), None);
    }
}
