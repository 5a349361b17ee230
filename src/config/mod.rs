//! Configuration module for the RoadTop backend.
//!
//! Loaded from environment variables (and `.env` when present). The bot token,
//! web app URL and signing secret have no defaults; startup fails without them.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const WEB_APP_URL: &str = "WEB_APP_URL";
pub const SECRET_KEY: &str = "SECRET_KEY";
pub const DB_PATH: &str = "ROADTOP_DB_PATH";
pub const STATIC_DIR: &str = "ROADTOP_STATIC_DIR";
pub const BIND_ADDR: &str = "ROADTOP_BIND_ADDR";
pub const LOG_LEVEL: &str = "ROADTOP_LOG_LEVEL";

/// Log filter used when neither `RUST_LOG` nor `ROADTOP_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration problems detected at startup.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Telegram bot credential
    pub telegram_token: String,
    /// URL opened by the mini-app launch button
    pub web_app_url: Url,
    /// Secret mixed into issued tokens
    pub secret_key: String,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory holding index.html and the mini-app assets
    pub static_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment. `.env` is loaded by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let telegram_token = required(TELEGRAM_TOKEN)?;
        let secret_key = required(SECRET_KEY)?;

        let web_app_url = Url::parse(&required(WEB_APP_URL)?).map_err(|e| ConfigError::Invalid {
            key: WEB_APP_URL,
            reason: e.to_string(),
        })?;
        if !matches!(web_app_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: WEB_APP_URL,
                reason: format!("unsupported scheme '{}'", web_app_url.scheme()),
            });
        }

        let db_path = lookup(DB_PATH)
            .unwrap_or_else(|| "./roadtop.db".to_string())
            .into();

        let static_dir = lookup(STATIC_DIR)
            .unwrap_or_else(|| "./static".to_string())
            .into();

        let bind_addr = lookup(BIND_ADDR)
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: BIND_ADDR,
                reason: e.to_string(),
            })?;

        let log_level = lookup(LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            telegram_token,
            web_app_url,
            secret_key,
            db_path,
            static_dir,
            bind_addr,
            log_level,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("web_app_url", &self.web_app_url.as_str())
            .field("secret_key", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("static_dir", &self.static_dir)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .finish()
    }
}
