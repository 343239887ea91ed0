//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - only when persistence is `postgres`
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_PERSISTENCE` - `memory`, `file`, or `postgres` (default: memory)
//! - `STOREFRONT_DATA_DIR` - Directory for the `file` adapter (default: ./data)
//! - `STOREFRONT_MOCK_LATENCY_MS` - Delay of simulated API calls (default: 300)
//! - `STOREFRONT_OWNER_FIRST_LOGIN_REDIRECT` - Send new owners to store registration (default: false)
//! - `BACKEND_API_URL` - Base URL of the backend REST API (default: <http://127.0.0.1:8080>)
//! - `BACKEND_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Where client stores are persisted
    pub persistence: PersistenceConfig,
    /// Backend REST API
    pub backend: BackendConfig,
    /// Delay applied to simulated API calls
    pub mock_latency: Duration,
    /// Redirect owners without a store to registration on first login
    pub owner_first_login_redirect: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Persistence adapter selection.
#[derive(Debug, Clone)]
pub enum PersistenceConfig {
    /// Process memory.
    Memory,
    /// JSON files under a directory.
    File { data_dir: PathBuf },
    /// `PostgreSQL` (connection string contains a password).
    Postgres { database_url: SecretString },
}

impl PersistenceConfig {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL; role scopes (`/user`, `/owner`, `/admin`) are appended.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;
        let persistence = PersistenceConfig::from_env(&env)?;
        let backend = BackendConfig::from_env(&env)?;
        let mock_latency = Duration::from_millis(env.parse_or("STOREFRONT_MOCK_LATENCY_MS", "300")?);
        let owner_first_login_redirect =
            parse_bool(&env, "STOREFRONT_OWNER_FIRST_LOGIN_REDIRECT")?;

        Ok(Self {
            host,
            port,
            base_url,
            persistence,
            backend,
            mock_latency,
            owner_first_login_redirect,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl PersistenceConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        match env.or_default("STOREFRONT_PERSISTENCE", "memory").as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File {
                data_dir: PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", "./data")),
            }),
            "postgres" => Ok(Self::Postgres {
                database_url: get_database_url(env, "STOREFRONT_DATABASE_URL")?,
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PERSISTENCE".to_string(),
                format!("expected memory, file, or postgres (got '{other}')"),
            )),
        }
    }
}

impl BackendConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw = env.or_default("BACKEND_API_URL", "http://127.0.0.1:8080");
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_API_URL".to_string(), e.to_string()))?;
        let timeout = Duration::from_secs(env.parse_or("BACKEND_API_TIMEOUT_SECS", "10")?);
        Ok(Self { base_url, timeout })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source wrapper.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to a default string.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(env: &Env<'_>, primary_key: &str) -> Result<SecretString, ConfigError> {
    env.optional(primary_key)
        .or_else(|| env.optional("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`), default false.
fn parse_bool(env: &Env<'_>, key: &str) -> Result<bool, ConfigError> {
    match env.or_default(key, "false").to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean (got '{other}')"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOREFRONT_BASE_URL", "http://localhost:3000")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(matches!(config.persistence, PersistenceConfig::Memory));
        assert_eq!(config.backend.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.backend.timeout, Duration::from_secs(10));
        assert_eq!(config.mock_latency, Duration::from_millis(300));
        assert!(!config.owner_first_login_redirect);
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_file_persistence() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://brewline.kr"),
            ("STOREFRONT_PERSISTENCE", "file"),
            ("STOREFRONT_DATA_DIR", "/var/lib/brewline"),
        ])
        .unwrap();
        match &config.persistence {
            PersistenceConfig::File { data_dir } => {
                assert_eq!(data_dir, &PathBuf::from("/var/lib/brewline"));
            }
            other => panic!("unexpected persistence: {other:?}"),
        }
        assert!(config.is_secure());
    }

    #[test]
    fn test_postgres_persistence_falls_back_to_database_url() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("STOREFRONT_PERSISTENCE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/brewline"),
        ])
        .unwrap();
        match &config.persistence {
            PersistenceConfig::Postgres { database_url } => {
                assert_eq!(database_url.expose_secret(), "postgres://localhost/brewline");
            }
            other => panic!("unexpected persistence: {other:?}"),
        }
    }

    #[test]
    fn test_postgres_persistence_requires_url() {
        let err = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("STOREFRONT_PERSISTENCE", "postgres"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_values() {
        let base = ("STOREFRONT_BASE_URL", "http://localhost:3000");
        assert!(load(&[base, ("STOREFRONT_PORT", "eighty")]).is_err());
        assert!(load(&[base, ("STOREFRONT_PERSISTENCE", "redis")]).is_err());
        assert!(load(&[base, ("BACKEND_API_URL", "not a url")]).is_err());
        assert!(load(&[base, ("STOREFRONT_OWNER_FIRST_LOGIN_REDIRECT", "maybe")]).is_err());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("STOREFRONT_PERSISTENCE", "postgres"),
            ("STOREFRONT_DATABASE_URL", "postgres://brew:hunter2@db/brewline"),
        ])
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
