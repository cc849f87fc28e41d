use core::net::SocketAddr;
use core::time::Duration;
use std::path::PathBuf;

use anyhow::Context;

/// Default `SQLite` database, created next to the working directory if missing.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://attrition.db";

/// Default location of the model bundle.
pub const DEFAULT_MODEL_PATH: &str = "models/attrition_bundle.json";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Path to the model bundle loaded by the scorer at startup
    pub model_path: PathBuf,

    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Shared secret for the `X-API-Key` gate. Disabled when `None`.
    pub api_key: Option<String>,

    /// Upper bound on the time spent handling one HTTP request
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `DATABASE_URL`: `SQLite` connection string (default: `sqlite://attrition.db`)
    /// - `MODEL_PATH`: model bundle path (default: `models/attrition_bundle.json`)
    /// - `BIND_ADDR`: HTTP bind address (default: `0.0.0.0:8000`)
    /// - `API_KEY`: enables the API key gate when set and non-empty
    /// - `REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let model_path = lookup("MODEL_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from);

        let bind_addr = lookup("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let api_key = lookup("API_KEY").filter(|key| !key.trim().is_empty());

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url,
            model_path,
            bind_addr,
            api_key,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
