//! Commerce API Binary
//!
//! Starts the REST server for users, products and orders.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin commerce-api
//! ```
//!
//! # Environment Variables
//!
//! - `COMMERCE_CONFIG`: Path to the YAML config (default: `config.yaml`)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//!
//! Any `${VAR}` referenced from the config file is read from the environment
//! after `.env` has been loaded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use commerce_api::config::{Config, load_config};
use commerce_api::telemetry::init_tracing;
use commerce_api::{AppState, CommerceStore, Container, InMemoryStore, SqliteStore, create_router};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_failure = load_dotenv();

    let config_path = std::env::var("COMMERCE_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    init_tracing(&config.observability.logging);
    if let Some((path, err)) = dotenv_failure {
        tracing::warn!(path = %path.display(), error = %err, "Failed to load .env file");
    }
    tracing::info!(
        backend = %config.persistence.backend,
        address = %config.server.socket_address(),
        "Starting Commerce API"
    );

    if config.persistence.is_memory() {
        let store = Arc::new(InMemoryStore::new());
        serve(&config, Arc::clone(&store)).await?;
    } else {
        let store = Arc::new(
            SqliteStore::connect(
                &config.persistence.database_url,
                config.persistence.max_connections,
            )
            .await
            .context("failed to open the SQLite store")?,
        );
        let result = serve(&config, Arc::clone(&store)).await;
        store.close().await;
        result?;
    }

    tracing::info!("Commerce API stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
///
/// Returns the path and error of an `.env` file that was found but failed to
/// load, so it can be logged once tracing is up.
fn load_dotenv() -> Option<(PathBuf, dotenvy::Error)> {
    if dotenvy::dotenv().is_ok() {
        return None;
    }
    let cwd = std::env::current_dir().ok()?;
    load_dotenv_from_ancestors(&cwd)
}

fn load_dotenv_from_ancestors(start: &Path) -> Option<(PathBuf, dotenvy::Error)> {
    let mut dir = start;
    while let Some(parent) = dir.parent() {
        let env_path = parent.join(".env");
        if env_path.exists() {
            return dotenvy::from_path(&env_path).err().map(|err| (env_path, err));
        }
        dir = parent;
    }
    None
}

/// Wire the router around `store` and serve until a shutdown signal arrives.
async fn serve<S: CommerceStore>(config: &Config, store: Arc<S>) -> anyhow::Result<()> {
    let container = Container::new(store);
    let state = AppState::from_container(
        &container,
        config.pagination,
        env!("CARGO_PKG_VERSION"),
    );
    let app = create_router(state);

    let address = config.server.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
