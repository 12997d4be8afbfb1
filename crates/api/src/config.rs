//! Settings read from the environment once at startup.
//!
//! Every value has a development default except `JWT_SECRET`. A value that
//! is set but does not parse aborts startup.

use std::fmt::Display;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use crowdfund_core::types::Timestamp;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
const DEFAULT_ACCESS_TTL_MINS: i64 = 15;
const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after SIGINT / SIGTERM.
    pub shutdown_timeout_secs: u64,
    pub db_max_connections: u32,
    pub min_password_length: usize,
    pub tokens: TokenConfig,
}

/// Signing secret and lifetimes for access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub access_ttl_mins: i64,
    pub refresh_ttl_days: i64,
}

impl TokenConfig {
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `JWT_SECRET`              | required |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `15`     |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`      |
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        Self {
            secret,
            access_ttl_mins: env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_TTL_MINS),
            refresh_ttl_days: env_or("JWT_REFRESH_EXPIRY_DAYS", DEFAULT_REFRESH_TTL_DAYS),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_mins * 60
    }

    pub fn refresh_expires_at(&self, now: Timestamp) -> Timestamp {
        now + Duration::days(self.refresh_ttl_days)
    }
}

impl ServerConfig {
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `DB_MAX_CONNECTIONS`    | `20`                    |
    /// | `MIN_PASSWORD_LENGTH`   | `8`                     |
    ///
    /// Token settings are described on [`TokenConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: split_origins(&env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGIN.to_string())),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", crowdfund_db::DEFAULT_MAX_CONNECTIONS),
            min_password_length: env_or("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH),
            tokens: TokenConfig::from_env(),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Parse `key` from the environment, or fall back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse as `T`.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key}={raw:?} is not valid: {e}")),
        Err(_) => default,
    }
}

/// Comma-separated origins; blanks are dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
