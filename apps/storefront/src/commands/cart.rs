//! # Cart Commands
//!
//! Cart manipulation for the presentation layer.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────────┐   │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ Confirmation │   │
//! │  │  Cart    │     │          │     │  Modal   │     │ (cart empty) │   │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────────┘   │
//! │                        │                                                │
//! │                   add_to_cart                                           │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use aqua_core::{CartEntry, Money, ProductId, TokenAmount};

use crate::error::ApiError;
use crate::state::StoreEngine;

/// Cart totals, derived on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u64,
    pub subtotal: Money,
    pub token_subtotal: TokenAmount,
    /// `$289.98`
    pub subtotal_display: String,
    /// `14.50 AQCNX`
    pub token_subtotal_display: String,
}

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartEntry>,
    pub totals: CartTotals,
}

impl From<&StoreEngine> for CartResponse {
    fn from(engine: &StoreEngine) -> Self {
        let items = engine.get_cart();
        let subtotal: Money = items.iter().map(|e| e.line_total).sum();
        let token_subtotal: TokenAmount = items.iter().map(|e| e.line_token_total).sum();

        CartResponse {
            totals: CartTotals {
                item_count: items.iter().map(|e| u64::from(e.quantity)).sum(),
                subtotal,
                token_subtotal,
                subtotal_display: subtotal.to_string(),
                token_subtotal_display: token_subtotal.to_string(),
            },
            items,
        }
    }
}

/// Current cart contents.
pub fn get_cart(engine: &StoreEngine) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from(engine)
}

/// Adds one unit of a product.
///
/// ## Behavior
/// - Product already in cart: quantity increases by one
/// - Otherwise: appended as a new line with quantity 1
pub async fn add_to_cart(engine: &StoreEngine, product_id: u64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "add_to_cart command");
    engine.add_to_cart(ProductId::new(product_id)).await?;
    Ok(CartResponse::from(engine))
}

/// Sets a line's quantity.
///
/// ## Behavior
/// - Quantity 0 or less: removes the item
/// - Product not in cart: `NOT_FOUND`
pub async fn update_cart_item(
    engine: &StoreEngine,
    product_id: u64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, quantity, "update_cart_item command");
    engine.set_quantity(ProductId::new(product_id), quantity).await?;
    Ok(CartResponse::from(engine))
}

pub async fn remove_from_cart(engine: &StoreEngine, product_id: u64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "remove_from_cart command");
    engine.remove_from_cart(ProductId::new(product_id)).await?;
    Ok(CartResponse::from(engine))
}

pub async fn clear_cart(engine: &StoreEngine) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    engine.clear_cart().await?;
    Ok(CartResponse::from(engine))
}
