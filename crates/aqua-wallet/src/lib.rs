//! # aqua-wallet: Payment Collaborator for AquaStore
//!
//! The engine never talks to a chain. It talks to a [`PaymentCollaborator`],
//! and this crate supplies the contract, its supporting pieces, and a demo
//! implementation.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Wallet Collaborator Layer                          │
//! │                                                                         │
//! │  StoreEngine ──► Arc<dyn PaymentCollaborator>                           │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   DemoWallet   │  │   Readiness    │  │  TransactionRequest    │    │
//! │  │                │  │                │  │                        │    │
//! │  │ simulated      │──│ watch channel  │  │ validUntil + messages  │    │
//! │  │ balance, pay,  │  │ "SDK loaded"   │  │ nano amount strings    │    │
//! │  │ timeout        │  │ event          │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │    address     │  │  WalletConfig  │                                │
//! │  │ shorten, TON / │  │ [wallet] TOML  │                                │
//! │  │ EVM validation │  │ + AQUA_* env   │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`collaborator`] - The `PaymentCollaborator` trait
//! - [`demo`] - `DemoWallet`
//! - [`readiness`] - Availability event
//! - [`transaction`] - Transaction request payload
//! - [`address`] - Address helpers
//! - [`config`] - `[wallet]` configuration
//! - [`error`] - Wallet error types

pub mod address;
pub mod collaborator;
pub mod config;
pub mod demo;
pub mod error;
pub mod readiness;
pub mod transaction;

pub use address::{shorten_address, validate_address, AddressKind};
pub use collaborator::PaymentCollaborator;
pub use config::WalletConfig;
pub use demo::DemoWallet;
pub use error::{WalletError, WalletResult};
pub use readiness::Readiness;
pub use transaction::{TransactionMessage, TransactionRequest};
