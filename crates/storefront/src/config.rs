//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults reproduce the demo store.
//!
//! - `TECHSTORE_SUBMIT_DELAY_MS` - Simulated payment latency (default: 3000)
//! - `TECHSTORE_ASSISTANT_DELAY_MS` - Simulated assistant latency (default: 1000)
//! - `TECHSTORE_DEFAULT_COUNTRY` - Fixed shipping country (default: México)
//! - `TECHSTORE_CURRENCY` - ISO 4217 code for all prices (default: MXN)
//! - `TECHSTORE_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 1000)
//! - `TECHSTORE_FLAT_SHIPPING` - Shipping fee below the threshold (default: 50)
//! - `TECHSTORE_TAX_RATE` - Sales tax rate as a fraction (default: 0.16)
//! - `TECHSTORE_AI_API_KEY` - Assistant API key; without it the assistant
//!   answers with its fallbacks

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use techstore_core::CurrencyCode;
use thiserror::Error;

use crate::cart::CartPricing;

const DEFAULT_SUBMIT_DELAY_MS: u64 = 3000;
const DEFAULT_ASSISTANT_DELAY_MS: u64 = 1000;
const DEFAULT_COUNTRY: &str = "México";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Checkout wizard settings
    pub checkout: CheckoutConfig,
    /// Cart shipping and tax rules
    pub pricing: CartPricing,
    /// Shopping assistant settings
    pub assistant: AssistantConfig,
}

/// Checkout wizard configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// How long the simulated payment processor takes
    pub submit_delay: Duration,
    /// Country every order ships to (not user-editable)
    pub default_country: String,
}

/// Shopping assistant configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AssistantConfig {
    /// Model API key (None = fallback answers only)
    pub api_key: Option<SecretString>,
    /// Simulated model latency
    pub latency: Duration,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("latency", &self.latency)
            .finish()
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            latency: Duration::from_millis(DEFAULT_ASSISTANT_DELAY_MS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CartPricing::default();

        let checkout = CheckoutConfig {
            submit_delay: Duration::from_millis(parse_or_default(
                &lookup,
                "TECHSTORE_SUBMIT_DELAY_MS",
                DEFAULT_SUBMIT_DELAY_MS,
            )?),
            default_country: lookup("TECHSTORE_DEFAULT_COUNTRY")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        };

        let currency = match lookup("TECHSTORE_CURRENCY") {
            Some(code) => parse_currency(&code)?,
            None => defaults.currency,
        };
        let tax_rate: Decimal = parse_or_default(&lookup, "TECHSTORE_TAX_RATE", defaults.tax_rate)?;
        if tax_rate.is_sign_negative() || tax_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "TECHSTORE_TAX_RATE".to_string(),
                format!("must be in [0, 1), got {tax_rate}"),
            ));
        }

        let pricing = CartPricing {
            currency,
            free_shipping_threshold: parse_or_default(
                &lookup,
                "TECHSTORE_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            flat_shipping: parse_or_default(
                &lookup,
                "TECHSTORE_FLAT_SHIPPING",
                defaults.flat_shipping,
            )?,
            tax_rate,
        };

        let api_key = match lookup("TECHSTORE_AI_API_KEY").filter(|v| !v.is_empty()) {
            Some(value) => {
                validate_secret_strength(&value, "TECHSTORE_AI_API_KEY")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        let assistant = AssistantConfig {
            api_key,
            latency: Duration::from_millis(parse_or_default(
                &lookup,
                "TECHSTORE_ASSISTANT_DELAY_MS",
                DEFAULT_ASSISTANT_DELAY_MS,
            )?),
        };

        Ok(Self {
            checkout,
            pricing,
            assistant,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_currency(code: &str) -> Result<CurrencyCode, ConfigError> {
    match code.trim().to_uppercase().as_str() {
        "MXN" => Ok(CurrencyCode::MXN),
        "USD" => Ok(CurrencyCode::USD),
        "EUR" => Ok(CurrencyCode::EUR),
        "GBP" => Ok(CurrencyCode::GBP),
        "CAD" => Ok(CurrencyCode::CAD),
        other => Err(ConfigError::InvalidEnvVar(
            "TECHSTORE_CURRENCY".to_string(),
            format!("unsupported currency {other}"),
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
    let len = s.chars().count() as f64;
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by your provider."
            ),
        ));
    }

    Ok(())
}
