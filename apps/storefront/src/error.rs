//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in AquaStore                              │
//! │                                                                         │
//! │  Presentation layer          Rust Backend                               │
//! │  ──────────────────          ────────────                               │
//! │                                                                         │
//! │  submit_payment()                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Wallet failed? ─── PaymentError::InsufficientBalance ──┐       │  │
//! │  │         │                                               │       │  │
//! │  │         ▼                                               ▼       │  │
//! │  │  Step wrong? ─── CoreError::InvalidStep ────────────── ApiError ►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_BALANCE",                                      │
//! │    "message": "Insufficient balance: need 0.45 TON, have 0.10 TON" }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use aqua_core::{CoreError, PaymentError};
use aqua_store::StoreError;
use aqua_wallet::WalletError;

use crate::state::ConfigError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// { "code": "EMPTY_CART", "message": "Cart is empty" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product, or product not in the cart
    NotFound,

    EmptyCart,

    /// No payment-capable wallet session
    NotAuthenticated,

    /// A payment is already being submitted
    AlreadyInProgress,

    /// Command not valid at the current checkout step (or no checkout)
    InvalidStep,

    /// Applied in memory but not saved
    PersistenceFailure,

    InsufficientBalance,

    WalletNotConnected,

    /// Declined by the user or wallet
    PaymentRejected,

    /// Timeout or transport failure
    PaymentFailed,

    ValidationError,

    ConfigError,

    StorageError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts engine errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::LineNotFound(_) => ErrorCode::NotFound,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::NotAuthenticated => ErrorCode::NotAuthenticated,
            CoreError::AlreadyInProgress => ErrorCode::AlreadyInProgress,
            CoreError::InvalidStep { .. } | CoreError::NoActiveCheckout => ErrorCode::InvalidStep,
            CoreError::PersistenceFailure(_) => ErrorCode::PersistenceFailure,
            CoreError::Payment(payment) => return ApiError::from(payment.clone()),
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Payment failures keep the collaborator's wording.
impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let code = match &err {
            PaymentError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            PaymentError::NotConnected => ErrorCode::WalletNotConnected,
            PaymentError::Rejected(_) => ErrorCode::PaymentRejected,
            PaymentError::Timeout(_) | PaymentError::Transport(_) => ErrorCode::PaymentFailed,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!(error = %err, "Storage operation failed");
        ApiError::new(ErrorCode::StorageError, "Storage operation failed")
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InvalidConfig(_) => ApiError::new(ErrorCode::ConfigError, err.to_string()),
            WalletError::InvalidAddress(_) => ApiError::validation(err.to_string()),
            WalletError::AlreadyConnected(_) => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
