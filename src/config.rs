//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default base URL of the currency rate provider
pub const DEFAULT_RATES_API_URL: &str = "https://api.freecurrencyapi.com/";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL; the in-memory store is used when absent
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Apply migrations on startup
    pub database_auto_migrate: bool,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// SHA-256 hex digests of accepted API keys
    pub api_key_hashes: Vec<String>,

    /// Currency rate provider base URL
    pub rates_api_url: String,

    /// Currency rate provider API key
    pub rates_api_key: Option<String>,

    /// Timeout for a single rate lookup
    pub rates_api_timeout: Duration,
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name))
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Split a comma-separated list of hex digests, lower-casing each one
pub fn parse_key_hashes(raw: &str) -> Result<Vec<String>, ConfigError> {
    let hashes: Vec<String> = raw
        .split(',')
        .map(|hash| hash.trim().to_ascii_lowercase())
        .filter(|hash| !hash.is_empty())
        .collect();

    let valid = |hash: &String| hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit());
    if hashes.is_empty() || !hashes.iter().all(valid) {
        return Err(ConfigError::InvalidValue("API_KEY_HASHES"));
    }

    Ok(hashes)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = optional_var("DATABASE_URL");
        let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", "10")?;
        let database_auto_migrate = parse_var("DATABASE_AUTO_MIGRATE", "false")?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT", "3000")?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let api_key_hashes = env::var("API_KEY_HASHES")
            .map_err(|_| ConfigError::MissingEnv("API_KEY_HASHES"))
            .and_then(|raw| parse_key_hashes(&raw))?;

        let rates_api_url =
            env::var("RATES_API_URL").unwrap_or_else(|_| DEFAULT_RATES_API_URL.to_string());
        let rates_api_key = optional_var("RATES_API_KEY");
        let rates_api_timeout = Duration::from_secs(parse_var("RATES_API_TIMEOUT_SECS", "10")?);

        Ok(Self {
            database_url,
            database_max_connections,
            database_auto_migrate,
            host,
            port,
            environment,
            api_key_hashes,
            rates_api_url,
            rates_api_key,
            rates_api_timeout,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
