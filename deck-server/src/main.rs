//! swipedeck-server binary entry point.
//!
//! Usage:
//! ```bash
//! swipedeck-server --config server.toml
//! swipedeck-server --config server.toml --seed
//! swipedeck-server --help
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swipedeck_server::config::Config;
use swipedeck_server::http::{build_router, health};
use swipedeck_server::seed;
use swipedeck_server::server::PeopleServer;
use swipedeck_server::storage::SqliteStorage;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// REST backend for the swipedeck people feed.
#[derive(Parser, Debug)]
#[command(name = "swipedeck-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply if it is absent)
    #[arg(long, short, default_value = "server.toml")]
    config: PathBuf,

    /// Insert the demo people if the database is empty
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    health::init_start_time();

    let storage = SqliteStorage::new(&config.storage.database)
        .await
        .with_context(|| format!("Failed to open database {:?}", config.storage.database))?;

    if cli.seed {
        seed::seed_if_empty(&storage, &config.seed)
            .await
            .context("Failed to seed demo people")?;
    }

    let bind_address = config.server.bind_address.clone();
    let server = Arc::new(PeopleServer::new(config, storage));
    let app = build_router(server);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!(%bind_address, version = env!("CARGO_PKG_VERSION"), "swipedeck-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("swipedeck-server stopped");
    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let config = Config::from_file(path)?;
        info!(?path, "Loaded configuration");
        Ok(config)
    } else {
        info!(?path, "No configuration file, using defaults");
        Ok(Config::default())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
