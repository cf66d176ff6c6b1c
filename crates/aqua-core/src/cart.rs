//! # Cart
//!
//! The shopping cart as pure data: an ordered list of product lines.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                 Method                  Line Change          │
//! │  ─────────                 ──────                  ───────────          │
//! │                                                                         │
//! │  "Add to Cart" ──────────► add(id) ──────────────► qty += 1 or push     │
//! │                                                                         │
//! │  "+" / "-" / typed qty ──► set_quantity(id, n) ──► qty = n (n ≤ 0: del) │
//! │                                                                         │
//! │  Trash icon ─────────────► remove(id) ───────────► line removed         │
//! │                                                                         │
//! │  Payment confirmed ──────► clear() ──────────────► no lines             │
//! │                                                                         │
//! │  Totals are derived from the catalog on every read, never stored.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has quantity ≥ 1
//! - Line order is the order products were first added

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TokenAmount};
use crate::types::{Product, ProductId};
use crate::validation::validate_quantity;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart line joined with its catalog product, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Money,
    pub line_token_total: TokenAmount,
}

impl CartEntry {
    fn new(product: Product, quantity: u32) -> Self {
        CartEntry {
            line_total: product.price().multiply_quantity(quantity),
            line_token_total: product.token_price().multiply_quantity(quantity),
            product,
            quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines, restoring the invariants.
    ///
    /// Duplicate ids are merged into the first occurrence and zero
    /// quantities are dropped, so hand-edited or stale storage can never
    /// produce an invalid cart.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.line_mut(line.product_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by 1
    /// - Product not in cart: new line with quantity 1 at the end
    ///
    /// ## Returns
    /// The line's new quantity.
    pub fn add(&mut self, product_id: ProductId) -> u32 {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine {
            product_id,
            quantity: 1,
        });
        1
    }

    /// Removes the product's line.
    ///
    /// ## Returns
    /// `true` if a line was removed; removing an absent product is not an error.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    /// Overwrites the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`Cart::remove`]
    /// - No line for the product: `LineNotFound`
    /// - Quantity beyond the line's range: `Validation`
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }

        let quantity = validate_quantity(quantity)?;
        let line = self
            .line_mut(product_id)
            .ok_or(CoreError::LineNotFound(product_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Drops lines whose product the catalog no longer knows.
    ///
    /// ## Returns
    /// The ids that were dropped.
    pub fn retain_resolvable(&mut self, catalog: &dyn Catalog) -> Vec<ProductId> {
        let mut dropped = Vec::new();
        self.lines.retain(|l| {
            let known = catalog.resolve(l.product_id).is_ok();
            if !known {
                dropped.push(l.product_id);
            }
            known
        });
        dropped
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines (the badge number).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| l.quantity as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joins every line with its product, in cart order.
    ///
    /// Lines the catalog cannot resolve are skipped.
    pub fn entries(&self, catalog: &dyn Catalog) -> Vec<CartEntry> {
        self.lines
            .iter()
            .filter_map(|l| {
                catalog
                    .resolve(l.product_id)
                    .ok()
                    .map(|product| CartEntry::new(product, l.quantity))
            })
            .collect()
    }

    /// Fiat subtotal: Σ quantity × unit price. Zero for an empty cart.
    pub fn subtotal(&self, catalog: &dyn Catalog) -> Money {
        self.entries(catalog).iter().map(|e| e.line_total).sum()
    }

    /// Token subtotal: Σ quantity × token price.
    pub fn token_subtotal(&self, catalog: &dyn Catalog) -> TokenAmount {
        self.entries(catalog).iter().map(|e| e.line_token_total).sum()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
