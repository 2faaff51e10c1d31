use wishdrop_core::badges::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RECENT_WINDOW_SECS};
use wishdrop_core::leaderboard::DEFAULT_LEADERBOARD_SIZE;

use crate::auth::jwt::JwtConfig;

/// Default interval between expiry sweeps.
const DEFAULT_EXPIRY_SWEEP_INTERVAL_SECS: u64 = 300;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after the server drains.
    pub shutdown_timeout_secs: u64,
    /// Entries per leaderboard ranking when the caller gives no `limit`.
    pub leaderboard_size: usize,
    /// Seconds between badge-grant polls.
    pub badge_poll_interval_secs: u64,
    /// Grants earned within this many seconds of a poll are considered new.
    pub badge_recent_window_secs: i64,
    /// Seconds between sweeps that expire overdue wishes.
    pub expiry_sweep_interval_secs: u64,
    /// Bearer-token verification settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `LEADERBOARD_SIZE`            | `10`                    |
    /// | `BADGE_POLL_INTERVAL_SECS`    | `30`                    |
    /// | `BADGE_RECENT_WINDOW_SECS`    | `60`                    |
    /// | `EXPIRY_SWEEP_INTERVAL_SECS`  | `300`                   |
    ///
    /// # Panics
    ///
    /// Panics on malformed values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            leaderboard_size: env_or("LEADERBOARD_SIZE", DEFAULT_LEADERBOARD_SIZE),
            badge_poll_interval_secs: env_or("BADGE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS),
            badge_recent_window_secs: env_or("BADGE_RECENT_WINDOW_SECS", DEFAULT_RECENT_WINDOW_SECS),
            expiry_sweep_interval_secs: env_or(
                "EXPIRY_SWEEP_INTERVAL_SECS",
                DEFAULT_EXPIRY_SWEEP_INTERVAL_SECS,
            ),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
