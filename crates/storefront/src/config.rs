//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the catalog service (e.g. <http://localhost:3333>)
//!
//! ## Optional
//! - `CATALOG_API_TOKEN` - Bearer token sent to the catalog service
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Product metadata cache TTL (default: 300, 0 disables the cache)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: .cart)
//! - `CART_NAMESPACE` - Storage key namespace (default: `RocketShoes`)
//! - `CART_HOST` - Bind address (default: 127.0.0.1)
//! - `CART_PORT` - Listen port (default: 4000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default storage namespace.
pub const DEFAULT_NAMESPACE: &str = "RocketShoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Cart persistence configuration
    pub storage: StorageConfig,
    /// IP address to bind the HTTP server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog service configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Time-to-live for cached product metadata
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Cart persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub dir: PathBuf,
    /// Namespace prefix of the cart key
    pub namespace: String,
}

impl CartConfig {
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

        let host = parse_env("CART_HOST", "127.0.0.1")?;
        let port = parse_env("CART_PORT", "4000")?;

        Ok(Self {
            catalog: CatalogConfig::from_env()?,
            storage: StorageConfig::from_env(),
            host,
            port,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Build a catalog configuration with default timeout and cache TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CATALOG_API_URL", base_url)?,
            api_token: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        })
    }

    /// Load catalog configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CATALOG_API_URL` is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CATALOG_API_URL")?;
        Ok(Self {
            base_url: parse_base_url("CATALOG_API_URL", &base_url)?,
            api_token: get_optional_env("CATALOG_API_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(parse_env("CATALOG_TIMEOUT_SECS", "10")?),
            cache_ttl: Duration::from_secs(parse_env("CATALOG_CACHE_TTL_SECS", "300")?),
        })
    }
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(get_env_or_default("CART_STORAGE_DIR", ".cart")),
            namespace: get_env_or_default("CART_NAMESPACE", DEFAULT_NAMESPACE),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".cart"),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
