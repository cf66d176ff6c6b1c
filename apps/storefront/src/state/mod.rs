//! # State Module
//!
//! The engine instance and the configuration it is built from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppConfig ──► EngineSettings ──┐                                       │
//! │                                 ▼                                       │
//! │  Persistence::load() ──► StoreEngine::builder(catalog, wallet)          │
//! │                              .observer(persistence)                     │
//! │                              .snapshot(snapshot)                        │
//! │                              .build()                                   │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                        Arc<StoreEngine>  ──► commands                   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreEngine: Mutex<EngineState>, never held across an await         │
//! │  • AppConfig: Read-only after initialization                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod engine;

pub use config::{AppConfig, CheckoutSettings, ConfigError, StorageSettings};
pub use engine::{EngineSettings, StateObserver, StoreEngine, StoreEngineBuilder};
