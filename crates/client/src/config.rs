//! Suite configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BASE_URI` - ServeRest base URL (default: `https://serverest.dev`)
//! - `MAX_USERS_COUNT` - Users created per setup (default: 3)
//! - `MAX_PRODUCTS_COUNT` - Products created per setup (default: 6)
//! - `MAX_CARTS_COUNT` - Carts created per setup, one per user (default: 3)
//! - `MAX_PRODUCTS_PER_CART_COUNT` - Distinct products per cart (default: 3)
//! - `MAX_QUANTITY_PER_PRODUCT` - Units of each product per cart (default: 3)
//! - `FIXTURE_DATA_DIR` - Directory for generated JSON fixtures (default: `tests/data`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URI: &str = "https://serverest.dev";
const DEFAULT_FIXTURE_DIR: &str = "tests/data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How much test data a setup chain generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLimits {
    /// Users created (and logged in) per setup.
    pub max_users: usize,
    /// Products created per setup.
    pub max_products: usize,
    /// Carts created per setup. Only as many as there are users get created.
    pub max_carts: usize,
    /// Upper bound on distinct products in one cart.
    pub max_products_per_cart: usize,
    /// Upper bound on units of one product in one cart.
    pub max_quantity_per_product: u64,
}

impl Default for DataLimits {
    fn default() -> Self {
        Self {
            max_users: 3,
            max_products: 6,
            max_carts: 3,
            max_products_per_cart: 3,
            max_quantity_per_product: 3,
        }
    }
}

impl DataLimits {
    /// Load limits from a variable source, falling back to the defaults.
    fn from_source(source: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let limits = Self {
            max_users: parse_count(source, "MAX_USERS_COUNT", defaults.max_users)?,
            max_products: parse_count(source, "MAX_PRODUCTS_COUNT", defaults.max_products)?,
            max_carts: parse_count(source, "MAX_CARTS_COUNT", defaults.max_carts)?,
            max_products_per_cart: parse_count(
                source,
                "MAX_PRODUCTS_PER_CART_COUNT",
                defaults.max_products_per_cart,
            )?,
            max_quantity_per_product: parse_count(
                source,
                "MAX_QUANTITY_PER_PRODUCT",
                defaults.max_quantity_per_product,
            )?,
        };

        if limits.max_products_per_cart > limits.max_products {
            return Err(ConfigError::InvalidEnvVar(
                "MAX_PRODUCTS_PER_CART_COUNT".to_string(),
                format!(
                    "cannot exceed MAX_PRODUCTS_COUNT ({})",
                    limits.max_products
                ),
            ));
        }

        Ok(limits)
    }
}

/// Suite configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// ServeRest base URL
    pub base_url: Url,
    /// Test data volume
    pub limits: DataLimits,
    /// Directory generated fixture files are written to
    pub fixture_dir: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the limits are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_source(source: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_or_default(source, "BASE_URI", DEFAULT_BASE_URI))?;
        let limits = DataLimits::from_source(source)?;
        let fixture_dir = PathBuf::from(get_or_default(
            source,
            "FIXTURE_DATA_DIR",
            DEFAULT_FIXTURE_DIR,
        ));

        Ok(Self {
            base_url,
            limits,
            fixture_dir,
        })
    }

    /// Configuration pointing at `base_url` with default limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            limits: DataLimits::default(),
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(source: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    source(key).unwrap_or_else(|| default.to_string())
}

/// Parse a positive count, falling back to `default` when unset.
fn parse_count<T>(
    source: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = source(key) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if value == T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }

    Ok(value)
}

/// Parse the base URL, accepting only http and https.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("BASE_URI".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BASE_URI".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ApiConfig::from_source(&source(&[])).unwrap();

        assert_eq!(config.base_url.as_str(), "https://serverest.dev/");
        assert_eq!(config.limits, DataLimits::default());
        assert_eq!(config.limits.max_users, 3);
        assert_eq!(config.limits.max_products, 6);
        assert_eq!(config.fixture_dir, PathBuf::from("tests/data"));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_source(&source(&[
            ("BASE_URI", "http://localhost:3000"),
            ("MAX_USERS_COUNT", "5"),
            ("MAX_PRODUCTS_COUNT", "10"),
            ("MAX_CARTS_COUNT", "2"),
            ("MAX_PRODUCTS_PER_CART_COUNT", "4"),
            ("MAX_QUANTITY_PER_PRODUCT", " 7 "),
            ("FIXTURE_DATA_DIR", "/tmp/fixtures"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.limits.max_users, 5);
        assert_eq!(config.limits.max_products, 10);
        assert_eq!(config.limits.max_carts, 2);
        assert_eq!(config.limits.max_products_per_cart, 4);
        assert_eq!(config.limits.max_quantity_per_product, 7);
        assert_eq!(config.fixture_dir, PathBuf::from("/tmp/fixtures"));
    }

    #[test]
    fn test_invalid_count() {
        let err = ApiConfig::from_source(&source(&[("MAX_USERS_COUNT", "three")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MAX_USERS_COUNT"));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = ApiConfig::from_source(&source(&[("MAX_CARTS_COUNT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MAX_CARTS_COUNT"));
    }

    #[test]
    fn test_products_per_cart_cannot_exceed_products() {
        let err = ApiConfig::from_source(&source(&[
            ("MAX_PRODUCTS_COUNT", "2"),
            ("MAX_PRODUCTS_PER_CART_COUNT", "3"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MAX_PRODUCTS_PER_CART_COUNT")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiConfig::for_base_url("not a url").is_err());
        assert!(ApiConfig::for_base_url("ftp://serverest.dev").is_err());
        assert!(ApiConfig::for_base_url("http://127.0.0.1:8080").is_ok());
    }
}
