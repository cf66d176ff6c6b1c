//! # Wallet Error Types
//!
//! Errors raised while configuring or connecting a wallet. Failures of an
//! actual payment are [`aqua_core::PaymentError`], because the engine passes
//! those through to the UI unchanged.

use thiserror::Error;

/// Result type alias for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Wallet configuration and connection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid `[wallet]` configuration.
    #[error("Invalid wallet configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Connection Errors
    // =========================================================================
    /// Address is neither a TON user-friendly nor an EVM address.
    ///
    /// ## When This Occurs
    /// - Typo in the configured destination
    /// - Connecting the demo wallet with a made-up address
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    /// A connection attempt while another wallet is connected.
    #[error("A wallet is already connected: {0}")]
    AlreadyConnected(String),
}
