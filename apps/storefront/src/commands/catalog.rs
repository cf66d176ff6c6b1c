//! # Catalog Commands
//!
//! Product grid queries.
//!
//! ## Usage
//! ```text
//! list_products(category: "electronics", search: "watch", sort: "price-low-high")
//!     │
//!     ▼
//! [ ProductCard { product, wishlisted, inCart, priceDisplay, tokenPriceDisplay } ]
//! ```

use serde::Serialize;
use tracing::debug;

use aqua_core::{Category, ListingQuery, Product, ProductId, SortOrder};

use crate::error::ApiError;
use crate::state::StoreEngine;

/// A product as the grid shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub product: Product,
    pub wishlisted: bool,
    /// Units of this product in the cart.
    pub in_cart: u32,
    /// `$89.99`
    pub price_display: String,
    /// `4.50 AQCNX`
    pub token_price_display: String,
}

impl ProductCard {
    fn new(engine: &StoreEngine, product: Product, cart_quantities: &[(ProductId, u32)]) -> Self {
        let in_cart = cart_quantities
            .iter()
            .find(|(id, _)| *id == product.id)
            .map_or(0, |(_, qty)| *qty);

        ProductCard {
            wishlisted: engine.is_wishlisted(product.id),
            in_cart,
            price_display: product.price().to_string(),
            token_price_display: product.token_price().to_string(),
            product,
        }
    }
}

fn cart_quantities(engine: &StoreEngine) -> Vec<(ProductId, u32)> {
    engine
        .get_cart()
        .into_iter()
        .map(|e| (e.product.id, e.quantity))
        .collect()
}

/// Builds a listing query from loosely-typed presentation input.
///
/// ## Arguments
/// * `category` - category slug, `"all"` or `None` for every category
/// * `search` - free text
/// * `sort` - `featured`, `price-low-high`, `price-high-low` or `popular`
pub fn parse_query(
    category: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
) -> Result<ListingQuery, ApiError> {
    let mut query = ListingQuery::default();

    if let Some(raw) = category.filter(|c| !c.trim().eq_ignore_ascii_case("all")) {
        let category: Category = raw.parse().map_err(|e: aqua_core::ValidationError| {
            ApiError::validation(e.to_string())
        })?;
        query = query.category(category);
    }

    if let Some(text) = search {
        query = query.search(text);
    }

    if let Some(raw) = sort {
        let sort: SortOrder = raw
            .parse()
            .map_err(|e: aqua_core::ValidationError| ApiError::validation(e.to_string()))?;
        query = query.sort(sort);
    }

    Ok(query)
}

pub fn list_products(
    engine: &StoreEngine,
    category: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
) -> Result<Vec<ProductCard>, ApiError> {
    debug!(?category, ?search, ?sort, "list_products command");

    let query = parse_query(category, search, sort)?;
    let quantities = cart_quantities(engine);

    Ok(engine
        .list_products(&query)?
        .into_iter()
        .map(|p| ProductCard::new(engine, p, &quantities))
        .collect())
}

pub fn get_product(engine: &StoreEngine, product_id: u64) -> Result<ProductCard, ApiError> {
    debug!(product_id, "get_product command");
    let product = engine.product(ProductId::new(product_id))?;
    Ok(ProductCard::new(engine, product, &cart_quantities(engine)))
}
