//! # Commands Module
//!
//! Every operation the presentation layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Product grid: list, filter, sort, search
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── wishlist.rs  ◄─── Wishlist toggle
//! ├── checkout.rs  ◄─── Review / payment / confirmation steps
//! ├── services.rs  ◄─── Airtime, data, electricity, cable
//! └── session.rs   ◄─── Wallet session and theme
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  presentation layer                                                     │
//! │         │  add_to_cart(&engine, 3)                                      │
//! │         ▼                                                               │
//! │  commands::cart::add_to_cart ──► StoreEngine::add_to_cart               │
//! │         │                              │                                │
//! │         │                              ├── CartUpdated ──► persistence  │
//! │         │                              └── CartUpdated ──► subscribers  │
//! │         ▼                                                               │
//! │  Result<CartResponse, ApiError>  (camelCase JSON)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands borrow the engine; the application root owns it as
//! `Arc<StoreEngine>`.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod services;
pub mod session;
pub mod wishlist;

pub use cart::{CartResponse, CartTotals};
pub use catalog::ProductCard;
pub use checkout::{CheckoutResponse, PaymentResponse};
pub use services::{PlanOption, ServiceForm, ServicePaymentResponse};
pub use session::{SessionResponse, ThemeResponse};
pub use wishlist::{ToggleWishlistResponse, WishlistResponse};
