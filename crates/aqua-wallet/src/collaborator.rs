//! # Payment Collaborator
//!
//! What the checkout engine needs from a wallet.
//!
//! ## Call Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  initiate_checkout()                                                    │
//! │     └── until_available_within(timeout)                                 │
//! │     └── is_ready()?        no ──► NotAuthenticated                      │
//! │                                                                         │
//! │  submit_payment()                                                       │
//! │     └── pay(amount, destination)                                        │
//! │            ├── Ok(Receipt)         ──► Confirmation                     │
//! │            └── Err(PaymentError)   ──► stay at Payment, error to UI     │
//! │     └── session()          refreshed balance is persisted               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::time::Duration;

use aqua_core::{PaymentAmount, PaymentError, Receipt, WalletSession};

/// A wallet able to pay on the user's behalf.
#[async_trait]
pub trait PaymentCollaborator: Send + Sync {
    /// Waits for the wallet integration to load, at most `limit`.
    ///
    /// ## Returns
    /// `true` if it loaded in time.
    async fn until_available_within(&self, limit: Duration) -> bool;

    /// `true` when a payment-capable session exists.
    fn is_ready(&self) -> bool;

    /// The current session, if connected.
    fn session(&self) -> Option<WalletSession>;

    /// Pays `amount` to `destination`.
    ///
    /// ## Errors
    /// Every failure means no money moved. Timeouts are reported as
    /// [`PaymentError::Timeout`].
    async fn pay(&self, amount: PaymentAmount, destination: &str) -> Result<Receipt, PaymentError>;
}
