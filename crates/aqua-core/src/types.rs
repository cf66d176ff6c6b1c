//! # Domain Types
//!
//! Core domain types used throughout AquaStore.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  CheckoutStep   │   │  WalletSession  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Review         │   │  wallet_address │       │
//! │  │  title          │   │  Payment        │   │  balance        │       │
//! │  │  price_cents    │   │  Confirmation   │   │  wallet_type    │       │
//! │  │  price_token    │   └─────────────────┘   └─────────────────┘       │
//! │  │  category       │                                                   │
//! │  │  rating         │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │    Receipt      │   │     Theme       │       │
//! │                        │  transaction_id │   │  Light / Dark   │       │
//! │                        │  amount         │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, PaymentAmount, TokenAmount};

// =============================================================================
// Product Id
// =============================================================================

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Category
// =============================================================================

/// Product category used by the listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Category {
    Electronics,
    Fashion,
    Home,
    Sports,
    Books,
    Food,
    Beauty,
    Automotive,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Fashion,
        Category::Home,
        Category::Sports,
        Category::Books,
        Category::Food,
        Category::Beauty,
        Category::Automotive,
    ];

    /// The identifier used in filters and persisted data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Fashion => "fashion",
            Category::Home => "home",
            Category::Sports => "sports",
            Category::Books => "books",
            Category::Food => "food",
            Category::Beauty => "beauty",
            Category::Automotive => "automotive",
        }
    }

    /// Human-readable menu label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Home => "Home & Garden",
            Category::Sports => "Sports & Fitness",
            Category::Books => "Books & Media",
            Category::Food => "Food & Beverages",
            Category::Beauty => "Beauty & Health",
            Category::Automotive => "Automotive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::error::ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("unknown category '{}'", s),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product offered by the catalog. Read-only from the engine's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display title shown on the product card.
    pub title: String,

    pub description: String,

    pub category: Category,

    /// Fiat price in cents.
    pub price_cents: i64,

    /// Token price in hundredths of AQCNX (450 = 4.50 AQCNX).
    pub price_token: i64,

    /// Average rating in tenths of a star (45 = 4.5 stars).
    pub rating_tenths: u8,

    pub review_count: u32,

    pub image_url: String,
}

impl Product {
    /// Returns the fiat price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the token-denominated price.
    #[inline]
    pub fn token_price(&self) -> TokenAmount {
        TokenAmount::from_hundredths(self.price_token)
    }

    /// Returns the rating as stars (for display only).
    #[inline]
    pub fn rating(&self) -> f32 {
        self.rating_tenths as f32 / 10.0
    }
}

// =============================================================================
// Checkout Step
// =============================================================================

/// The step a checkout session is in.
///
/// ```text
/// (none) ──► Review ──► Payment ──► Confirmation ──► (none)
///                         │  ▲
///                         └──┘ payment failed (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutStep {
    Review,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// One-based position, used by the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Review => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }
}

// =============================================================================
// Wallet Session
// =============================================================================

/// Which wallet network a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum WalletKind {
    #[default]
    #[serde(rename = "TON")]
    Ton,
}

/// Last-known wallet session, persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WalletSession {
    pub wallet_address: String,
    pub balance: PaymentAmount,
    #[serde(default)]
    pub wallet_type: WalletKind,
}

// =============================================================================
// Receipt
// =============================================================================

/// Proof of a completed payment, shown on the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    /// Wallet-side transaction reference (e.g., `TON12345678`).
    pub transaction_id: String,
    pub amount: PaymentAmount,
    pub destination: String,
    #[ts(as = "String")]
    pub paid_at: DateTime<Utc>,
}

// =============================================================================
// Theme
// =============================================================================

/// Colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"').to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "theme".to_string(),
                reason: format!("unknown theme '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
