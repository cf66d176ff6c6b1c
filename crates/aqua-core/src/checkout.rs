//! # Checkout Session
//!
//! The modal checkout as a state machine over [`CheckoutStep`].
//!
//! ## Step Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout State Machine                               │
//! │                                                                         │
//! │   (none) ──begin()──────────► Review      cart snapshot + subtotals     │
//! │                                  │                                      │
//! │                         confirm_review(rate)                            │
//! │                                  ▼                                      │
//! │                               Payment     payment_amount fixed          │
//! │                                │    ▲                                   │
//! │                 complete(rcpt) │    └── payment failed: stay, retry     │
//! │                                ▼                                        │
//! │                            Confirmation   receipt recorded              │
//! │                                  │                                      │
//! │                           acknowledge()                                 │
//! │                                  ▼                                      │
//! │                               (none)                                    │
//! │                                                                         │
//! │   Any step ──cancel──► (none): the owner simply drops the session.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot taken at Review is authoritative: the amount charged is
//! derived from it, not from the live cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartEntry};
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::{ConversionRate, Money, PaymentAmount, TokenAmount};
use crate::types::{CheckoutStep, Receipt};

/// An in-progress checkout. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSession {
    #[ts(as = "String")]
    pub id: Uuid,

    pub step: CheckoutStep,

    /// Cart lines as they were when checkout began.
    pub lines: Vec<CartEntry>,

    pub subtotal: Money,

    pub token_subtotal: TokenAmount,

    /// Set on entering Payment.
    pub payment_amount: Option<PaymentAmount>,

    /// Set on entering Confirmation.
    pub receipt: Option<Receipt>,

    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Snapshots the cart and opens a session at Review.
    ///
    /// ## Errors
    /// - `EmptyCart` if the cart has no lines
    pub fn begin(cart: &Cart, catalog: &dyn Catalog, started_at: DateTime<Utc>) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let lines = cart.entries(catalog);
        let subtotal = lines.iter().map(|e| e.line_total).sum();
        let token_subtotal = lines.iter().map(|e| e.line_token_total).sum();

        Ok(CheckoutSession {
            id: Uuid::new_v4(),
            step: CheckoutStep::Review,
            lines,
            subtotal,
            token_subtotal,
            payment_amount: None,
            receipt: None,
            started_at,
        })
    }

    /// Review → Payment. Fixes the amount to charge from the snapshot.
    ///
    /// ## Returns
    /// The payment amount.
    pub fn confirm_review(&mut self, rate: ConversionRate) -> CoreResult<PaymentAmount> {
        self.expect_step(CheckoutStep::Review)?;

        let amount = rate.convert(self.token_subtotal)?;
        self.payment_amount = Some(amount);
        self.step = CheckoutStep::Payment;
        Ok(amount)
    }

    /// The amount to submit; only valid while at Payment.
    pub fn payable_amount(&self) -> CoreResult<PaymentAmount> {
        self.expect_step(CheckoutStep::Payment)?;
        // Entering Payment always sets the amount
        Ok(self.payment_amount.unwrap_or_default())
    }

    /// Payment → Confirmation with the collaborator's receipt.
    pub fn complete(&mut self, receipt: Receipt) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment)?;

        self.receipt = Some(receipt);
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }

    /// Validates that the session may be closed by acknowledgement.
    ///
    /// The caller discards the session after this returns `Ok`.
    pub fn acknowledge(&self) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Confirmation)
    }

    /// Fails with `InvalidStep` unless the session is at `expected`.
    pub fn expect_step(&self, expected: CheckoutStep) -> CoreResult<()> {
        if self.step != expected {
            return Err(CoreError::InvalidStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    /// Total units in the snapshot.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|e| e.quantity as u64).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
