//! # Wallet Configuration
//!
//! The `[wallet]` section of `aquastore.toml`.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AQUA_WALLET_DESTINATION=EQ...                                      │
//! │     AQUA_PAYMENT_TIMEOUT_SECS=30                                       │
//! │                                                                         │
//! │  2. TOML Config File ([wallet] section of aquastore.toml)              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     merchant address, 60 s timeout, 360 s validity, 100 TON demo       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [wallet]
//! destination = "EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t"
//! payment_timeout_secs = 60
//! validity_secs = 360
//! demo_balance = "100"
//! demo_latency_ms = 0
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use aqua_core::{PaymentAmount, DEFAULT_PAYMENT_DESTINATION};

use crate::address::validate_address;
use crate::error::{WalletError, WalletResult};

/// Wallet settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Merchant address receiving checkout payments.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// How long `pay` may wait for the wallet before failing with `Timeout`.
    #[serde(default = "default_payment_timeout")]
    pub payment_timeout_secs: u64,

    /// `validUntil` window of a transaction request.
    #[serde(default = "default_validity")]
    pub validity_secs: u64,

    /// Starting balance of the demo wallet, as a decimal TON string.
    #[serde(default = "default_demo_balance")]
    pub demo_balance: String,

    /// Simulated approval delay of the demo wallet.
    #[serde(default)]
    pub demo_latency_ms: u64,
}

fn default_destination() -> String {
    DEFAULT_PAYMENT_DESTINATION.to_string()
}

fn default_payment_timeout() -> u64 {
    60
}

fn default_validity() -> u64 {
    360
}

fn default_demo_balance() -> String {
    "100".to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            destination: default_destination(),
            payment_timeout_secs: default_payment_timeout(),
            validity_secs: default_validity(),
            demo_balance: default_demo_balance(),
            demo_latency_ms: 0,
        }
    }
}

impl WalletConfig {
    /// Validates the section.
    pub fn validate(&self) -> WalletResult<()> {
        validate_address(&self.destination)?;

        if self.payment_timeout_secs == 0 {
            return Err(WalletError::InvalidConfig(
                "payment_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.validity_secs == 0 {
            return Err(WalletError::InvalidConfig(
                "validity_secs must be greater than 0".into(),
            ));
        }

        self.demo_balance()?;
        Ok(())
    }

    /// Applies `AQUA_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(destination) = std::env::var("AQUA_WALLET_DESTINATION") {
            debug!(destination = %destination, "Overriding payment destination from environment");
            self.destination = destination;
        }

        if let Ok(timeout) = std::env::var("AQUA_PAYMENT_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.payment_timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid AQUA_PAYMENT_TIMEOUT_SECS"),
            }
        }

        if let Ok(validity) = std::env::var("AQUA_TX_VALIDITY_SECS") {
            if let Ok(v) = validity.parse::<u64>() {
                self.validity_secs = v;
            }
        }

        if let Ok(balance) = std::env::var("AQUA_DEMO_BALANCE") {
            self.demo_balance = balance;
        }
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_secs(self.payment_timeout_secs)
    }

    pub fn validity(&self) -> Duration {
        Duration::from_secs(self.validity_secs)
    }

    pub fn demo_latency(&self) -> Duration {
        Duration::from_millis(self.demo_latency_ms)
    }

    /// Parsed demo balance.
    pub fn demo_balance(&self) -> WalletResult<PaymentAmount> {
        self.demo_balance
            .parse()
            .map_err(|e| WalletError::InvalidConfig(format!("demo_balance: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WalletConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.validity(), Duration::from_secs(360));
        assert_eq!(config.demo_balance().unwrap(), PaymentAmount::from_hundredths(10_000));
    }

    #[test]
    fn test_config_validation() {
        let mut config = WalletConfig::default();

        config.destination = "nowhere".to_string();
        assert!(matches!(config.validate(), Err(WalletError::InvalidAddress(_))));

        config.destination = default_destination();
        config.payment_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.payment_timeout_secs = 5;
        config.demo_balance = "lots".to_string();
        assert!(matches!(config.validate(), Err(WalletError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WalletConfig = toml::from_str("payment_timeout_secs = 5").unwrap();
        assert_eq!(config.payment_timeout_secs, 5);
        assert_eq!(config.destination, DEFAULT_PAYMENT_DESTINATION);
        assert_eq!(config.validity_secs, 360);
    }
}
