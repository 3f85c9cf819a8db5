//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHECKOUT_API_BASE_URL` - Base URL of the order backend (e.g. `http://localhost:8080/api`)
//!
//! ## Optional
//! - `CHECKOUT_API_TOKEN` - Bearer token for the order backend
//! - `CHECKOUT_PRODUCT_LISTING_PATH` - Where to send the shopper after an order (default: /products)
//! - `CHECKOUT_CARD_YEAR_WINDOW` - Number of expiry years offered (default: 11)
//! - `CHECKOUT_REFERENCE_CACHE_TTL_SECS` - Country/region cache TTL, 0 disables (default: 300)
//! - `CHECKOUT_STRICT_BILLING_ZIP` - Apply the numeric rule to billing zip codes (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Order backend configuration
    pub api: OrderApiConfig,
    /// Path of the product listing view shown after a successful order
    pub product_listing_path: String,
    /// Number of card expiry years offered, starting at the current year
    pub card_year_window: u32,
    /// How long country and region lists stay cached
    pub reference_cache_ttl: Duration,
    /// Whether billing zip codes must be numeric like shipping zip codes
    pub strict_billing_zip: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Order backend configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct OrderApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for OrderApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OrderApiConfig {
    /// Create a configuration without a token.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    /// Build an endpoint URL by appending `path` to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))
    }
}

impl CheckoutConfig {
    /// Default navigation target after a successful order.
    pub const DEFAULT_PRODUCT_LISTING_PATH: &'static str = "/products";
    /// Default number of expiry years (current year plus ten).
    pub const DEFAULT_CARD_YEAR_WINDOW: u32 = 11;
    /// Default reference cache TTL.
    pub const DEFAULT_REFERENCE_CACHE_TTL: Duration = Duration::from_secs(300);

    /// Configuration with defaults for everything but the backend URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            api: OrderApiConfig::new(base_url),
            product_listing_path: Self::DEFAULT_PRODUCT_LISTING_PATH.to_string(),
            card_year_window: Self::DEFAULT_CARD_YEAR_WINDOW,
            reference_cache_ttl: Self::DEFAULT_REFERENCE_CACHE_TTL,
            strict_billing_zip: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = Url::parse(&get_required_env("CHECKOUT_API_BASE_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("CHECKOUT_API_BASE_URL".to_string(), e.to_string())
        })?;
        let token = get_optional_env("CHECKOUT_API_TOKEN")
            .map(|value| {
                validate_secret_strength(&value, "CHECKOUT_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let product_listing_path = get_env_or_default(
            "CHECKOUT_PRODUCT_LISTING_PATH",
            Self::DEFAULT_PRODUCT_LISTING_PATH,
        );
        if !product_listing_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "CHECKOUT_PRODUCT_LISTING_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        let card_year_window = parse_env(
            "CHECKOUT_CARD_YEAR_WINDOW",
            Self::DEFAULT_CARD_YEAR_WINDOW,
        )?;
        if card_year_window == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CHECKOUT_CARD_YEAR_WINDOW".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let reference_cache_ttl = Duration::from_secs(parse_env(
            "CHECKOUT_REFERENCE_CACHE_TTL_SECS",
            Self::DEFAULT_REFERENCE_CACHE_TTL.as_secs(),
        )?);
        let strict_billing_zip = parse_env("CHECKOUT_STRICT_BILLING_ZIP", false)?;

        Ok(Self {
            api: OrderApiConfig { base_url, token },
            product_listing_path,
            card_year_window,
            reference_cache_ttl,
            strict_billing_zip,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
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

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}
