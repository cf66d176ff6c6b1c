//! # aqua-core: Pure Storefront Logic for AquaStore
//!
//! The cart, wishlist, catalog listing and checkout state machine, with
//! zero I/O. Everything here is plain data plus the rules that change it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AquaStore Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation layer                           │   │
//! │  │    Product grid ──► Cart sidebar ──► Checkout modal             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands / StoreEvent broadcast        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront: StoreEngine                           │   │
//! │  └───────┬─────────────────────┬─────────────────────┬─────────────┘   │
//! │          │                     │                     │                  │
//! │  ┌───────▼───────────────────────────────┐  ┌────────▼──────────────┐  │
//! │  │        ★ aqua-core (THIS CRATE) ★     │  │ aqua-store            │  │
//! │  │                                       │  │ aqua-wallet           │  │
//! │  │  money   types    cart     wishlist   │  │ (storage, payments)   │  │
//! │  │  catalog checkout events   validation │  └───────────────────────┘  │
//! │  │                                       │                             │
//! │  │  NO I/O • NO STORAGE • NO NETWORK     │                             │
//! │  └───────────────────────────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money, TokenAmount, PaymentAmount, ConversionRate (integers only)
//! - [`types`] - Product, Category, CheckoutStep, WalletSession, Receipt, Theme
//! - [`cart`] - Cart lines and derived totals
//! - [`wishlist`] - Toggle set of product ids
//! - [`catalog`] - Catalog provider trait and listing (filter/search/sort)
//! - [`checkout`] - Checkout session state machine
//! - [`events`] - Change events emitted after mutations
//! - [`services`] - Airtime, data, electricity and cable orders
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use aqua_core::{Cart, Catalog, InMemoryCatalog, Money, ProductId};
//!
//! let catalog = InMemoryCatalog::sample();
//! let mut cart = Cart::new();
//! cart.add(ProductId::new(1)); // $89.99
//! cart.add(ProductId::new(3)); // $199.99
//!
//! assert_eq!(cart.subtotal(&catalog), Money::from_cents(28998));
//! assert!(catalog.resolve(ProductId::new(3)).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod events;
pub mod money;
pub mod services;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartLine};
pub use catalog::{list, Catalog, InMemoryCatalog, ListingQuery, SortOrder};
pub use checkout::CheckoutSession;
pub use error::{CoreError, CoreResult, PaymentError, ValidationError};
pub use events::StoreEvent;
pub use money::{ConversionRate, Money, PaymentAmount, TokenAmount};
pub use services::{ServiceKind, ServiceOrder, ServicePlan};
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every persisted storage key (`aquastore-cart`, ...).
pub const STORAGE_NAMESPACE: &str = "aquastore";

/// Default token → payment conversion: 1000 bps = 0.1 TON per AQCNX.
pub const DEFAULT_CONVERSION_RATE_BPS: u32 = 1000;

/// Merchant address that receives storefront payments unless configured.
pub const DEFAULT_PAYMENT_DESTINATION: &str = "EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t";
