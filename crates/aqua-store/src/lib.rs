//! # aqua-store: Persistence for AquaStore
//!
//! Keeps the cart, wishlist, wallet session and theme across restarts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AquaStore Data Flow                              │
//! │                                                                         │
//! │  StoreEngine command (add_to_cart)                                     │
//! │       │ StoreEvent::CartUpdated                                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     aqua-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Persistence  │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │               │───►│  MemoryStore  │    │  (embedded)  │  │   │
//! │  │   │ event → key   │    │  SqliteStore  │    │ 001_kv.sql   │  │   │
//! │  │   │ load snapshot │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aquastore.db (kv_store table) in the platform data directory          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aqua_store::{Persistence, SqliteStore, StoreConfig};
//!
//! let store = SqliteStore::new(StoreConfig::new("aquastore.db")).await?;
//! let persistence = Persistence::new(Arc::new(store));
//! let snapshot = persistence.load().await?;
//! ```

pub mod error;
pub mod keys;
pub mod kv;
pub mod migrations;
pub mod persistence;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use keys::StorageKey;
pub use kv::{KeyValueStore, MemoryStore};
pub use persistence::{PersistedSnapshot, Persistence};
pub use sqlite::{SqliteStore, StoreConfig};
