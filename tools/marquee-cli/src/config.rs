//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marquee_commerce::cart::DEFAULT_CART_NAMESPACE;
use marquee_commerce::checkout::{ApiEndpoints, CheckoutSettings};
use serde::{Deserialize, Serialize};

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["marquee.toml", ".marquee.toml", "marquee.json"];

/// Environment variable that overrides `api.api_token`.
pub const API_TOKEN_ENV: &str = "MARQUEE_API_TOKEN";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Remote commerce API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Checkout settings.
    #[serde(default)]
    pub checkout: CheckoutSettings,

    /// Cart storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Find the nearest config file, walking up from `start`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// The API token, preferring the environment.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.api_token.clone())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Remote commerce API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://xyz.supabase.co`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Bearer token sent with every call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Function paths.
    #[serde(default)]
    pub endpoints: ApiEndpoints,
}

/// Cart storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cart record, relative to the working directory.
    #[serde(default = "default_storage_dir")]
    pub directory: String,

    /// Key namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_storage_dir() -> String {
    ".marquee".to_string()
}

fn default_namespace() -> String {
    DEFAULT_CART_NAMESPACE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_dir(),
            namespace: default_namespace(),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default marquee.toml config file.
pub fn generate_default_config(origin: &str) -> String {
    format!(
        r#"# Marquee storefront configuration

[api]
# base_url = "https://your-project.supabase.co"
# api_token = "..."   # or set {token_env}

[api.endpoints]
payment_config = "/functions/v1/payment-config"
create_checkout = "/functions/v1/create-checkout"
checkout_status = "/functions/v1/checkout-status"

[checkout]
origin = "{origin}"
success_path = "/payment-success"
failure_path = "/payment-failed"
currency = "USD"
rounding = "half_away_from_zero"

[storage]
directory = ".marquee"
namespace = "marquee"

[logging]
level = "warn"
format = "compact"
"#,
        origin = origin,
        token_env = API_TOKEN_ENV
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_commerce::{Currency, RoundingPolicy};

    #[test]
    fn test_default_config_parses() {
        let config: StorefrontConfig =
            toml::from_str(&generate_default_config("https://shop.example")).unwrap();
        assert_eq!(config.checkout.origin, "https://shop.example");
        assert_eq!(config.checkout.currency, Currency::USD);
        assert_eq!(config.checkout.rounding, RoundingPolicy::HalfAwayFromZero);
        assert_eq!(config.storage.namespace, "marquee");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_partial_config_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"

            [checkout]
            currency = "EUR"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.checkout.currency, Currency::EUR);
        assert_eq!(config.checkout.success_path, "/payment-success");
        assert_eq!(config.storage.directory, ".marquee");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_save_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let path = dir.path().join("marquee.json");
        let mut config = StorefrontConfig::default();
        config.storage.namespace = "shop-a".to_string();
        config.save(&path).unwrap();

        let found = StorefrontConfig::find(&nested).unwrap();
        assert_eq!(found, path);
        let loaded = StorefrontConfig::load(&found).unwrap();
        assert_eq!(loaded.storage.namespace, "shop-a");
    }
}
