//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STORE_RATINGS_HOST` - Bind address (default: 127.0.0.1)
//! - `STORE_RATINGS_PORT` - Listen port (default: 3000)
//! - `STORE_RATINGS_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STORE_RATINGS_SEED_FILE` - JSON dataset to load instead of the demo data
//! - `STORE_RATINGS_SIMULATED_LATENCY_MS` - Delay before each mutation (default: 0)
//! - `STORE_RATINGS_SESSION_TTL_SECS` - Session inactivity expiry (default: 7 days)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; an `https` URL turns on secure cookies
    pub base_url: String,
    /// Dataset to load at startup; `None` loads the demo dataset
    pub seed_file: Option<PathBuf>,
    /// Artificial delay applied before mutating requests
    pub simulated_latency: Duration,
    /// Session inactivity expiry in seconds
    pub session_ttl_secs: i64,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            seed_file: None,
            simulated_latency: Duration::ZERO,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            sentry: SentryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("STORE_RATINGS_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("STORE_RATINGS_PORT", "3000")?;
        let base_url = get_env_or_default("STORE_RATINGS_BASE_URL", "http://localhost:3000");
        let seed_file = get_optional_env("STORE_RATINGS_SEED_FILE").map(PathBuf::from);
        let latency_ms: u64 = parse_env_or_default("STORE_RATINGS_SIMULATED_LATENCY_MS", "0")?;
        let session_ttl_secs: i64 = parse_env_or_default(
            "STORE_RATINGS_SESSION_TTL_SECS",
            &DEFAULT_SESSION_TTL_SECS.to_string(),
        )?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_RATINGS_SESSION_TTL_SECS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            seed_file,
            simulated_latency: Duration::from_millis(latency_ms),
            session_ttl_secs,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN")
                .filter(|dsn| !dsn.is_empty())
                .map(SecretString::from),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
