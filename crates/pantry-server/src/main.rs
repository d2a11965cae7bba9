//! # pantry-server
//!
//! HTTP API for a personal food inventory.
//!
//! This binary provides:
//! - **Accounts** with salted password hashes and bearer-token sessions
//! - **Inventory** CRUD scoped to the signed-in user
//! - **Status engine** that marks stale items expired before every dashboard
//!   and drives the donate / cancel / consume transitions
//! - **SQLite storage** via `pantry-store`

mod api;
mod auth;
mod config;
mod error;

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pantry_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pantry_server=debug")),
        )
        .init();

    info!("Starting pantry server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    if let Some(date) = config.fixed_date {
        warn!(%date, "Clock pinned; expiry rules use a fixed date");
    }

    // -----------------------------------------------------------------------
    // 3. Open the database (runs pending migrations)
    // -----------------------------------------------------------------------
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    match db.path() {
        Some(path) => info!(path = %path.display(), "Database ready"),
        None => info!("Database ready (in memory)"),
    }

    let http_addr = config.http_addr;
    let app_state = AppState::new(db, config);

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Hourly purge of expired sessions
    let state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let purged = state
                .db()
                .map_err(|e| e.to_string())
                .and_then(|db| db.purge_expired_sessions(Utc::now()).map_err(|e| e.to_string()));
            match purged {
                Ok(0) => {}
                Ok(n) => info!(count = n, "Purged expired sessions"),
                Err(e) => warn!(error = %e, "Session purge failed"),
            }
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
