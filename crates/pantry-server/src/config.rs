//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use pantry_shared::constants::{
    DEFAULT_HTTP_PORT, DEFAULT_SESSION_TTL_HOURS, EXPIRING_WINDOW_DAYS, MAX_EXPIRING_WINDOW_DAYS,
    MAX_SESSION_TTL_HOURS,
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: the platform data directory (see `Database::new`).
    pub database_path: Option<PathBuf>,

    /// How long a login session stays valid.
    /// Env: `SESSION_TTL_HOURS`
    /// Default: `336` (two weeks)
    pub session_ttl_hours: i64,

    /// Days ahead of today that count as "expiring soon".
    /// Env: `EXPIRING_WINDOW_DAYS`
    /// Default: `3`
    pub expiring_window_days: i64,

    /// Whether `/api/signup` accepts new accounts.
    /// Env: `REGISTRATION_OPEN` (true/false)
    /// Default: `true`
    pub registration_open: bool,

    /// Human-readable name for this instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Pantry"`
    pub instance_name: String,

    /// Pin "today" instead of reading the local clock. Useful for demos.
    /// Env: `PANTRY_FIXED_DATE` (YYYY-MM-DD)
    /// Default: unset
    pub fixed_date: Option<NaiveDate>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            expiring_window_days: EXPIRING_WINDOW_DAYS,
            registration_open: true,
            instance_name: "Pantry".to_string(),
            fixed_date: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = get("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(path) = get("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(val) = get("SESSION_TTL_HOURS") {
            match val.parse::<i64>() {
                Ok(hours) if hours > MAX_SESSION_TTL_HOURS => {
                    tracing::warn!(
                        value = %val,
                        max = MAX_SESSION_TTL_HOURS,
                        "SESSION_TTL_HOURS too large, capping"
                    );
                    config.session_ttl_hours = MAX_SESSION_TTL_HOURS;
                }
                Ok(hours) if hours > 0 => config.session_ttl_hours = hours,
                _ => tracing::warn!(value = %val, "Invalid SESSION_TTL_HOURS, using default"),
            }
        }

        if let Some(val) = get("EXPIRING_WINDOW_DAYS") {
            match val.parse::<i64>() {
                Ok(days) if days > MAX_EXPIRING_WINDOW_DAYS => {
                    tracing::warn!(
                        value = %val,
                        max = MAX_EXPIRING_WINDOW_DAYS,
                        "EXPIRING_WINDOW_DAYS too large, capping"
                    );
                    config.expiring_window_days = MAX_EXPIRING_WINDOW_DAYS;
                }
                Ok(days) if days >= 0 => config.expiring_window_days = days,
                _ => tracing::warn!(value = %val, "Invalid EXPIRING_WINDOW_DAYS, using default"),
            }
        }

        if let Some(val) = get("REGISTRATION_OPEN") {
            config.registration_open = val != "false" && val != "0";
        }

        if let Some(name) = get("INSTANCE_NAME") {
            config.instance_name = name;
        }

        if let Some(val) = get("PANTRY_FIXED_DATE") {
            match NaiveDate::parse_from_str(&val, "%Y-%m-%d") {
                Ok(date) => config.fixed_date = Some(date),
                Err(e) => {
                    tracing::warn!(value = %val, error = %e, "Invalid PANTRY_FIXED_DATE, ignoring")
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
