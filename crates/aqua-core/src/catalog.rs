//! # Catalog
//!
//! The read-only product provider and the pure listing transformations
//! (category filter, text search, sort) the storefront grid uses.
//!
//! ## Listing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog.products()                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search  "watch"  ──► title / description / category contains "watch"  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter  Electronics ──► category == electronics                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort    PriceLowHigh ──► stable sort by token price                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> (products themselves are never modified)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Category, Product, ProductId};
use crate::validation::{validate_product, validate_search_query, ValidationResult};

// =============================================================================
// Catalog Provider
// =============================================================================

/// Read-only product provider consumed by the engine.
pub trait Catalog: Send + Sync {
    /// Looks up a product by id.
    ///
    /// ## Returns
    /// - `Ok(Product)` when the catalog knows the id
    /// - `Err(CoreError::ProductNotFound)` otherwise
    fn resolve(&self, id: ProductId) -> CoreResult<Product>;

    /// Every product, in catalog ("featured") order.
    fn products(&self) -> Vec<Product>;
}

/// A catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from products, validating each one.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> ValidationResult<Self> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Adds a product.
    ///
    /// ## Errors
    /// - Any [`validate_product`] failure
    /// - `Duplicate` when the id is already present
    pub fn insert(&mut self, product: Product) -> ValidationResult<()> {
        validate_product(&product)?;

        if self.products.iter().any(|p| p.id == product.id) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id.to_string(),
            });
        }

        self.products.push(product);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The eight-product demo catalog the storefront ships with.
    pub fn sample() -> Self {
        let products = sample_products().into_iter().collect();
        InMemoryCatalog { products }
    }
}

impl Catalog for InMemoryCatalog {
    fn resolve(&self, id: ProductId) -> CoreResult<Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CoreError::ProductNotFound(id))
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: u64,
    title: &str,
    price_cents: i64,
    price_token: i64,
    category: Category,
    image: &str,
    rating_tenths: u8,
    review_count: u32,
    description: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        category,
        price_cents,
        price_token,
        rating_tenths,
        review_count,
        image_url: format!("https://images.unsplash.com/{}?w=400&h=400&fit=crop", image),
    }
}

fn sample_products() -> [Product; 8] {
    [
        sample(1, "Wireless Bluetooth Headphones", 8999, 450, Category::Electronics,
            "photo-1505740420928-5e560c06d30e", 45, 128,
            "Premium wireless headphones with noise cancellation and 30-hour battery life."),
        sample(2, "Organic Cotton T-Shirt", 2999, 150, Category::Fashion,
            "photo-1521572163474-6864f9cf17ab", 42, 89,
            "Comfortable organic cotton t-shirt in multiple colors and sizes."),
        sample(3, "Smart Fitness Watch", 19999, 1000, Category::Electronics,
            "photo-1523275335684-37898b6baf30", 47, 256,
            "Advanced fitness tracking with heart rate monitor and GPS functionality."),
        sample(4, "Gourmet Coffee Beans", 2499, 125, Category::Food,
            "photo-1559056199-641a0ac8b55e", 46, 73,
            "Premium single-origin coffee beans, freshly roasted to perfection."),
        sample(5, "Minimalist Desk Lamp", 7999, 400, Category::Home,
            "photo-1507473885765-e6ed057f782c", 43, 45,
            "Modern LED desk lamp with adjustable brightness and USB charging port."),
        sample(6, "Yoga Mat Premium", 4999, 250, Category::Sports,
            "photo-1544367567-0f2fcb009e0b", 44, 112,
            "Non-slip premium yoga mat with extra cushioning and carrying strap."),
        sample(7, "Programming Books Set", 14999, 750, Category::Books,
            "photo-1544716278-ca5e3f4abd8c", 48, 89,
            "Complete set of modern programming books covering latest technologies."),
        sample(8, "Smartphone Case", 1999, 100, Category::Electronics,
            "photo-1556656793-08538906a9f8", 41, 203,
            "Durable protective case with wireless charging compatibility."),
    ]
}

// =============================================================================
// Listing
// =============================================================================

/// Sort order for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first, by token price.
    PriceLowHigh,
    /// Most expensive first, by token price.
    PriceHighLow,
    /// Most reviewed first.
    Popular,
}

impl std::str::FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "featured" => Ok(SortOrder::Featured),
            "price-low-high" => Ok(SortOrder::PriceLowHigh),
            "price-high-low" => Ok(SortOrder::PriceHighLow),
            "popular" => Ok(SortOrder::Popular),
            other => Err(ValidationError::InvalidFormat {
                field: "sort".to_string(),
                reason: format!("unknown sort order '{}'", other),
            }),
        }
    }
}

/// What the product grid should show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// `None` shows every category.
    #[serde(default)]
    pub category: Option<Category>,

    /// Free-text search; empty matches everything.
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Applies a listing query to a product snapshot.
///
/// ## Errors
/// Only the search query is validated (length limit).
pub fn list(products: Vec<Product>, query: &ListingQuery) -> ValidationResult<Vec<Product>> {
    let needle = match &query.search {
        Some(raw) => validate_search_query(raw)?,
        None => String::new(),
    };

    let mut listed: Vec<Product> = products
        .into_iter()
        .filter(|p| query.category.map_or(true, |c| p.category == c))
        .filter(|p| needle.is_empty() || matches_search(p, &needle))
        .collect();

    // sort_by_key is stable, so ties keep catalog order
    match query.sort {
        SortOrder::Featured => {}
        SortOrder::PriceLowHigh => listed.sort_by_key(|p| p.price_token),
        SortOrder::PriceHighLow => listed.sort_by_key(|p| Reverse(p.price_token)),
        SortOrder::Popular => listed.sort_by_key(|p| Reverse(p.review_count)),
    }

    Ok(listed)
}

fn matches_search(product: &Product, needle: &str) -> bool {
    product.title.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.category.as_str().contains(needle)
}

// =============================================================================
// Unit Tests
// =============================================================================
