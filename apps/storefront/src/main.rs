//! # AquaStore Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AquaStore                                        │
//! │                                                                         │
//! │  stdin ──► shell ──► commands ──► StoreEngine ──► aqua-store (SQLite)   │
//! │                                        │                                │
//! │  stdout ◄── JSON responses             └────────► aqua-wallet (demo)    │
//! │  stderr ◄── tracing logs                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then `AQUA_*` environment)
//! 3. Open storage & hydrate persisted state
//! 4. Build the engine
//! 5. Read commands until `quit`

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = aquastore_lib::run().await {
        eprintln!("aquastore: {}", e);
        std::process::exit(1);
    }
}
