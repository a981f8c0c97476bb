//! Centralized configuration (environment variables + defaults).
//!
//! Read once at startup into an [`AppConfig`] that is handed to whoever needs it.

use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COUNTRIES_API_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_EXCHANGE_RATE_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Upper bound on any single external fetch.
pub const MAX_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub port: u16,
    pub countries_api_url: String,
    pub exchange_rate_api_url: String,
    pub fetch_timeout: Duration,
    pub cache_dir: PathBuf,
    pub gdp_multiplier_seed: Option<u64>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Postgres,
            database_url: None,
            database_max_connections: 10,
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            countries_api_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            exchange_rate_api_url: DEFAULT_EXCHANGE_RATE_API_URL.to_string(),
            fetch_timeout: MAX_FETCH_TIMEOUT,
            cache_dir: PathBuf::from("cache"),
            gdp_multiplier_seed: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let storage_backend = match get("STORAGE_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(anyhow!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'", other)),
        };

        // Database URL must be provided (no default) for safety.
        let database_url = get("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=postgres"));
        }

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?
                .max(1),
            None => defaults.database_max_connections,
        };

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().context("PORT must be a valid u16")?,
            None => defaults.port,
        };

        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v.parse::<u64>().context("FETCH_TIMEOUT_SECS must be a valid u64")?;
                Duration::from_secs(secs.max(1)).min(MAX_FETCH_TIMEOUT)
            }
            None => defaults.fetch_timeout,
        };

        let gdp_multiplier_seed = match get("GDP_MULTIPLIER_SEED") {
            Some(v) => Some(v.parse::<u64>().context("GDP_MULTIPLIER_SEED must be a valid u64")?),
            None => None,
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other)),
        };

        Ok(Self {
            storage_backend,
            database_url,
            database_max_connections,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            countries_api_url: get("COUNTRIES_API_URL").unwrap_or(defaults.countries_api_url),
            exchange_rate_api_url: get("EXCHANGE_RATE_API_URL")
                .unwrap_or(defaults.exchange_rate_api_url),
            fetch_timeout,
            cache_dir: get("CACHE_DIR").map(PathBuf::from).unwrap_or(defaults.cache_dir),
            gdp_multiplier_seed,
            log_format,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
