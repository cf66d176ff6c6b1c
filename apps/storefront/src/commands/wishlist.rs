//! Wishlist commands.

use serde::Serialize;
use tracing::debug;

use aqua_core::ProductId;

use crate::error::ApiError;
use crate::state::StoreEngine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    /// Ascending ids.
    pub product_ids: Vec<ProductId>,
    pub count: usize,
}

impl From<&StoreEngine> for WishlistResponse {
    fn from(engine: &StoreEngine) -> Self {
        let product_ids = engine.wishlist();
        WishlistResponse {
            count: product_ids.len(),
            product_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlistResponse {
    /// Membership after the toggle.
    pub wishlisted: bool,
    pub wishlist: WishlistResponse,
}

pub fn get_wishlist(engine: &StoreEngine) -> WishlistResponse {
    debug!("get_wishlist command");
    WishlistResponse::from(engine)
}

pub async fn toggle_wishlist(
    engine: &StoreEngine,
    product_id: u64,
) -> Result<ToggleWishlistResponse, ApiError> {
    debug!(product_id, "toggle_wishlist command");
    let wishlisted = engine.toggle_wishlist(ProductId::new(product_id)).await?;
    Ok(ToggleWishlistResponse {
        wishlisted,
        wishlist: WishlistResponse::from(engine),
    })
}
