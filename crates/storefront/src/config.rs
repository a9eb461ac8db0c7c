//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `PI_API_KEY` - Pi Platform API server key (from the Pi developer portal)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `PI_API_BASE_URL` - Pi Platform API base URL (default: <https://api.minepi.com>)
//! - `PI_SANDBOX` - Initialize the browser Pi SDK in sandbox mode (default: true)
//! - `CATALOG_PATH` - YAML restaurant catalog (default: built-in sample catalog)
//! - `STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `OFFLINE_CACHE_NAME` - Versioned offline cache name (default: foodpihub-v1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Pi Platform API endpoint.
pub const DEFAULT_PI_API_BASE_URL: &str = "https://api.minepi.com";

/// Default name of the offline asset cache. Bump the version to evict old assets.
pub const DEFAULT_OFFLINE_CACHE_NAME: &str = "foodpihub-v1";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
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
    /// Pi Platform API configuration
    pub pi: PiConfig,
    /// Restaurant catalog file; the built-in sample is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Name of the current offline asset cache
    pub offline_cache_name: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Pi Platform API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PiConfig {
    /// Base URL of the Pi Platform API
    pub api_base_url: String,
    /// Server API key, sent as `Authorization: Key <key>`
    pub api_key: SecretString,
    /// Whether the browser SDK runs against the Pi testnet sandbox
    pub sandbox: bool,
}

impl std::fmt::Debug for PiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[REDACTED]")
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let pi = PiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            pi,
            catalog_path: get_optional_env("CATALOG_PATH").map(PathBuf::from),
            static_dir: PathBuf::from(get_env_or_default(
                "STATIC_DIR",
                "crates/storefront/static",
            )),
            offline_cache_name: get_env_or_default(
                "OFFLINE_CACHE_NAME",
                DEFAULT_OFFLINE_CACHE_NAME,
            ),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl PiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let sandbox = parse_bool("PI_SANDBOX", &get_env_or_default("PI_SANDBOX", "true"))?;

        Ok(Self {
            api_base_url: get_env_or_default("PI_API_BASE_URL", DEFAULT_PI_API_BASE_URL),
            api_key: get_validated_secret("PI_API_KEY")?,
            sandbox,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random strings with high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the Pi developer portal."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
