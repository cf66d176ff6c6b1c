//! # Checkout Commands
//!
//! Drive the checkout modal through its three steps.
//!
//! ## Modal Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ① Review            ② Payment             ③ Confirmation               │
//! │  ──────────          ──────────            ──────────────               │
//! │  lines, subtotals    amount in TON         transaction id               │
//! │                                                                         │
//! │  initiate_checkout ─► confirm_review ─► submit_payment ─► acknowledge   │
//! │                                  ▲            │                         │
//! │                                  └─ failed ───┘ (stay on ②, retry)      │
//! │                                                                         │
//! │  cancel_checkout closes the modal from any step                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use aqua_core::{CheckoutSession, CheckoutStep, Receipt};

use crate::error::ApiError;
use crate::state::StoreEngine;

/// What the checkout modal renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// `None` when the modal is closed.
    pub step: Option<CheckoutStep>,
    /// 1-based step indicator.
    pub step_number: Option<u8>,
    pub session: Option<CheckoutSession>,
    /// `0.45 TON`, once the amount is fixed.
    pub amount_display: Option<String>,
    pub payment_in_flight: bool,
}

impl From<&StoreEngine> for CheckoutResponse {
    fn from(engine: &StoreEngine) -> Self {
        let session = engine.checkout();
        CheckoutResponse {
            step: session.as_ref().map(|s| s.step),
            step_number: session.as_ref().map(|s| s.step.number()),
            amount_display: session
                .as_ref()
                .and_then(|s| s.payment_amount)
                .map(|a| a.to_string()),
            payment_in_flight: engine.is_payment_in_flight(),
            session,
        }
    }
}

/// Result of a successful payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub receipt: Receipt,
    pub checkout: CheckoutResponse,
}

pub fn get_checkout(engine: &StoreEngine) -> CheckoutResponse {
    debug!("get_checkout command");
    CheckoutResponse::from(engine)
}

/// Opens the modal at Review. Fails with `EMPTY_CART` or `NOT_AUTHENTICATED`.
pub async fn initiate_checkout(engine: &StoreEngine) -> Result<CheckoutResponse, ApiError> {
    debug!("initiate_checkout command");
    engine.initiate_checkout().await?;
    Ok(CheckoutResponse::from(engine))
}

pub async fn confirm_review(engine: &StoreEngine) -> Result<CheckoutResponse, ApiError> {
    debug!("confirm_review command");
    engine.confirm_review().await?;
    Ok(CheckoutResponse::from(engine))
}

/// Pays through the wallet. Wallet failures keep their own error codes
/// (`INSUFFICIENT_BALANCE`, `PAYMENT_REJECTED`, ...).
pub async fn submit_payment(engine: &StoreEngine) -> Result<PaymentResponse, ApiError> {
    debug!("submit_payment command");
    let receipt = engine.submit_payment().await?;
    Ok(PaymentResponse {
        receipt,
        checkout: CheckoutResponse::from(engine),
    })
}

pub async fn acknowledge(engine: &StoreEngine) -> Result<CheckoutResponse, ApiError> {
    debug!("acknowledge command");
    engine.acknowledge().await?;
    Ok(CheckoutResponse::from(engine))
}

pub async fn cancel_checkout(engine: &StoreEngine) -> Result<CheckoutResponse, ApiError> {
    debug!("cancel_checkout command");
    engine.cancel_checkout().await?;
    Ok(CheckoutResponse::from(engine))
}
