//! # Error Types
//!
//! Domain-specific error types for aqua-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aqua-core errors (this file)                                          │
//! │  ├── CoreError        - Cart / checkout command failures               │
//! │  ├── PaymentError     - Payment collaborator failures (pass-through)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  aqua-store errors (separate crate)                                    │
//! │  └── StoreError       - Key-value storage failures                     │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the presentation layer sees (serialized)  │
//! │                                                                         │
//! │  Flow: ValidationError/PaymentError → CoreError → ApiError → UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, step, ...)
//! 3. Every failure is recoverable; none leaves the engine unusable

use thiserror::Error;

use crate::money::PaymentAmount;
use crate::types::{CheckoutStep, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout command errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The catalog cannot resolve the product.
    ///
    /// ## When This Occurs
    /// - `add_to_cart` with an id the catalog does not know
    /// - A stale product id arriving from a cached UI
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The cart has no line for the product.
    ///
    /// ## When This Occurs
    /// - `set_quantity` with a positive quantity for a product that was never
    ///   added. Quantities can only be set on existing lines.
    #[error("Product {0} is not in the cart")]
    LineNotFound(ProductId),

    /// Checkout requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The payment collaborator reports no payment-capable session.
    #[error("Connect a wallet before checking out")]
    NotAuthenticated,

    /// A payment is already being submitted.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Pay" ──► submit_payment() ──► awaiting wallet...
    ///      │
    ///      └── Click "Pay" again ──► AlreadyInProgress (no double charge)
    /// ```
    #[error("A payment is already in progress")]
    AlreadyInProgress,

    /// The command is not valid in the current checkout step.
    #[error("Checkout is at {actual:?}, expected {expected:?}")]
    InvalidStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    /// A checkout command was issued with no checkout session.
    #[error("No checkout in progress")]
    NoActiveCheckout,

    /// The mutation was applied in memory but could not be persisted.
    ///
    /// The in-memory state is NOT rolled back; the UI should show a
    /// non-blocking notice.
    #[error("Changes could not be saved: {0}")]
    PersistenceFailure(String),

    /// The payment collaborator failed; surfaced unchanged.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for both "unknown product" and "not in cart".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::ProductNotFound(_) | CoreError::LineNotFound(_))
    }
}

// =============================================================================
// Payment Error
// =============================================================================

/// Failures reported by the payment collaborator.
///
/// The engine never interprets these beyond "the payment did not happen";
/// they travel to the UI verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Wallet balance is lower than the amount to pay.
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        required: PaymentAmount,
        available: PaymentAmount,
    },

    /// No wallet is connected.
    #[error("Wallet not connected")]
    NotConnected,

    /// The user (or wallet) declined the transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The wallet did not answer within its timeout.
    #[error("Payment timed out after {0} seconds")]
    Timeout(u64),

    /// Bridge / RPC failure.
    #[error("Payment transport error: {0}")]
    Transport(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed wallet address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product id in a catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound(ProductId::new(42));
        assert_eq!(err.to_string(), "Product not found: 42");

        let err = CoreError::InvalidStep {
            expected: CheckoutStep::Payment,
            actual: CheckoutStep::Review,
        };
        assert_eq!(err.to_string(), "Checkout is at Review, expected Payment");
    }

    #[test]
    fn test_payment_error_is_transparent() {
        let err: CoreError = PaymentError::NotConnected.into();
        assert_eq!(err.to_string(), "Wallet not connected");
        assert!(matches!(err, CoreError::Payment(PaymentError::NotConnected)));
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = PaymentError::InsufficientBalance {
            required: PaymentAmount::from_hundredths(45),
            available: PaymentAmount::from_hundredths(10),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: need 0.45 TON, have 0.10 TON"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(CoreError::ProductNotFound(ProductId::new(1)).is_not_found());
        assert!(CoreError::LineNotFound(ProductId::new(1)).is_not_found());
        assert!(!CoreError::EmptyCart.is_not_found());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
