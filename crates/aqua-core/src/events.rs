//! # Store Events
//!
//! Emitted by the engine after every successful mutation. Persistence and
//! the presentation layer both consume this one stream.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::types::{CheckoutStep, ProductId, Theme, WalletSession};

/// A state change, carrying the new value of the affected aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
#[ts(export)]
pub enum StoreEvent {
    CartUpdated(Vec<CartLine>),
    WishlistUpdated(Vec<ProductId>),
    /// `None` when the checkout closed (acknowledged or cancelled).
    CheckoutStepChanged(Option<CheckoutStep>),
    /// `None` when the wallet disconnected.
    SessionUpdated(Option<WalletSession>),
    ThemeUpdated(Theme),
}

impl StoreEvent {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::CartUpdated(_) => "cart_updated",
            StoreEvent::WishlistUpdated(_) => "wishlist_updated",
            StoreEvent::CheckoutStepChanged(_) => "checkout_step_changed",
            StoreEvent::SessionUpdated(_) => "session_updated",
            StoreEvent::ThemeUpdated(_) => "theme_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = StoreEvent::CheckoutStepChanged(Some(CheckoutStep::Payment));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"checkoutStepChanged","payload":"payment"}"#);
        assert_eq!(event.kind(), "checkout_step_changed");
    }
}
