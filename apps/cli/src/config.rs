//! # CLI Configuration
//!
//! Where the store lives and how money is shown.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     shopease --data ./shop.json ...                                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SHOPEASE_DATA_PATH=/srv/shop/shopease.json                         │
//! │     SHOPEASE_SHOP_NAME="Noor Boutique"                                 │
//! │     SHOPEASE_CURRENCY_SYMBOL="Rs "                                     │
//! │     SHOPEASE_LOW_STOCK_THRESHOLD=3                                     │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/shopease-pos/config.toml (Linux)                         │
//! │     ~/Library/Application Support/com.shopease.pos/config.toml (macOS) │
//! │     or the file given with --config                                    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! path = "/srv/shop/shopease.json"
//! pretty = true
//!
//! [shop]
//! name = "Noor Boutique"
//! currency_symbol = "Rs "
//! currency_decimals = 2
//! low_stock_threshold = 5
//! ```

use serde::{Deserialize, Serialize};
use shopease_core::{Money, DEFAULT_LOW_STOCK_THRESHOLD};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// File name of the document inside the platform data directory.
pub const DATA_FILE_NAME: &str = "shopease.json";

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Document file. Unset means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Write indented JSON.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: None,
            pretty: true,
        }
    }
}

// =============================================================================
// Shop Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Printed on receipts and reports.
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// Prefix for amounts, e.g. "Rs " or "$".
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places shown: 2, or 0 to round to whole units.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// Products strictly below this count are low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_shop_name() -> String {
    "ShopEase".to_string()
}

fn default_currency_symbol() -> String {
    "Rs ".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            name: default_shop_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub shop: ShopConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        info!(?path, "Loading config from file");
                        config = Self::from_toml(&contents)?;
                    }
                    Err(e) => warn!(?path, error = %e, "Config file unreadable, using defaults"),
                }
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.shop.name.trim().is_empty() {
            return Err(CliError::config("shop.name must not be empty"));
        }

        if !matches!(self.shop.currency_decimals, 0 | 2) {
            return Err(CliError::config(format!(
                "shop.currency_decimals must be 0 or 2, got {}",
                self.shop.currency_decimals
            )));
        }

        if self.shop.low_stock_threshold < 0 {
            return Err(CliError::config(
                "shop.low_stock_threshold must not be negative",
            ));
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(CliError::config("storage.path must not be empty"));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SHOPEASE_DATA_PATH") {
            debug!(path = %path, "Overriding data path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("SHOPEASE_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Some(symbol) = lookup("SHOPEASE_CURRENCY_SYMBOL") {
            self.shop.currency_symbol = symbol;
        }

        if let Some(threshold) = lookup("SHOPEASE_LOW_STOCK_THRESHOLD") {
            match threshold.trim().parse::<i64>() {
                Ok(t) => self.shop.low_stock_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring non-numeric low stock threshold"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shopease", "pos")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The document file to open: the configured path, else the platform
    /// data directory.
    pub fn data_path(&self) -> CliResult<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("com", "shopease", "pos")
            .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
            .ok_or_else(|| CliError::config("Could not determine app data directory"))
    }

    /// Replaces the data path (from `--data`).
    pub fn with_data_path(mut self, path: &Path) -> Self {
        self.storage.path = Some(path.to_path_buf());
        self
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Formats an amount with the shop's currency settings.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(1234)), "Rs 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor_units();
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.abs();

        let digits = if self.shop.currency_decimals == 0 {
            // Half away from zero
            ((abs + 50) / 100).to_string()
        } else {
            format!("{}.{:02}", abs / 100, abs % 100)
        };

        format!("{}{}{}", sign, self.shop.currency_symbol, digits)
    }
}
