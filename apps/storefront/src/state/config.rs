//! # Application Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`AQUA_*`)
//! 2. Config file (`aquastore.toml`)
//! 3. Defaults (this file)
//!
//! ## Config File Location
//! - **Linux**: `~/.config/aquastore/aquastore.toml`
//! - **macOS**: `~/Library/Application Support/com.aquastore.storefront/aquastore.toml`
//! - **Windows**: `%APPDATA%\aquastore\storefront\config\aquastore.toml`
//!
//! `AQUA_CONFIG` points at a different file.
//!
//! ## Example
//! ```toml
//! [storage]
//! database_path = "/var/lib/aquastore/aquastore.db"
//! connect_timeout_secs = 30
//!
//! [checkout]
//! conversion_rate_bps = 1000
//! ready_timeout_secs = 10
//!
//! [wallet]
//! destination = "EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t"
//! payment_timeout_secs = 60
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use aqua_core::validation::validate_conversion_rate_bps;
use aqua_core::{ConversionRate, ValidationError, DEFAULT_CONVERSION_RATE_BPS};
use aqua_wallet::{WalletConfig, WalletError};

const CONFIG_FILE_NAME: &str = "aquastore.toml";
const DATABASE_FILE_NAME: &str = "aquastore.db";

/// Configuration load/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid checkout configuration: {0}")]
    Checkout(#[from] ValidationError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Keep everything in memory (nothing survives a restart).
    #[serde(default)]
    pub in_memory: bool,

    /// How long opening the database may wait for a connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            in_memory: false,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl StorageSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// `[checkout]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Payment currency per token unit, in basis points.
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate_bps: u32,

    /// How long `initiate_checkout` waits for the wallet to become available.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
}

fn default_conversion_rate() -> u32 {
    DEFAULT_CONVERSION_RATE_BPS
}

fn default_ready_timeout() -> u64 {
    10
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            conversion_rate_bps: default_conversion_rate(),
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

impl CheckoutSettings {
    pub fn conversion_rate(&self) -> ConversionRate {
        ConversionRate::from_bps(self.conversion_rate_bps)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`aquastore.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("AQUA_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body without touching the environment.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_conversion_rate_bps(self.checkout.conversion_rate_bps)?;
        self.wallet.validate()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("AQUA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(rate) = std::env::var("AQUA_CONVERSION_RATE_BPS") {
            match rate.parse::<u32>() {
                Ok(bps) => self.checkout.conversion_rate_bps = bps,
                Err(_) => warn!(value = %rate, "Ignoring invalid AQUA_CONVERSION_RATE_BPS"),
            }
        }

        if let Ok(timeout) = std::env::var("AQUA_READY_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.checkout.ready_timeout_secs = secs;
            }
        }

        self.wallet.apply_env_overrides();
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "aquastore", "storefront")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The SQLite file to open, creating its directory if needed.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/com.aquastore.storefront/aquastore.db`
    /// - **Windows**: `%APPDATA%\aquastore\storefront\data\aquastore.db`
    /// - **Linux**: `~/.local/share/storefront/aquastore.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}
