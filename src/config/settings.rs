//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DB_TIMEOUT_SECONDS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Per-operation bound for store calls
    pub db_timeout: Duration,
    /// Session lifetime; `None` keeps sessions until logout
    pub session_ttl: Option<chrono::Duration>,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("db_timeout", &self.db_timeout)
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            db_timeout: Duration::from_secs(DEFAULT_DB_TIMEOUT_SECONDS),
            session_ttl: None,
            cookie_secure: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            db_timeout: parse_var("DB_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.db_timeout),
            session_ttl: parse_var::<i64>("SESSION_TTL_HOURS").and_then(session_ttl_from_hours),
            cookie_secure: parse_var("COOKIE_SECURE").unwrap_or(defaults.cookie_secure),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Non-positive or unrepresentable lifetimes mean sessions never expire.
fn session_ttl_from_hours(hours: i64) -> Option<chrono::Duration> {
    if hours <= 0 {
        return None;
    }
    let ttl = chrono::Duration::try_hours(hours);
    if ttl.is_none() {
        tracing::warn!(hours, "SESSION_TTL_HOURS out of range, sessions will not expire");
    }
    ttl
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring unparseable configuration value");
            None
        }
    }
}
