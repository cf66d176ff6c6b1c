//! # AquaStore Storefront Library
//!
//! Wires configuration, storage, the wallet and the catalog into one
//! [`StoreEngine`], and runs the line shell on top of it.
//!
//! ## Module Organization
//! ```text
//! aquastore_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── engine.rs   ◄─── StoreEngine, observers, builder
//! │   └── config.rs   ◄─── AppConfig (aquastore.toml + AQUA_*)
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Product grid
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── wishlist.rs ◄─── Wishlist toggle
//! │   ├── checkout.rs ◄─── Checkout steps
//! │   └── session.rs  ◄─── Wallet session, theme
//! ├── shell.rs        ◄─── stdin line shell
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use aqua_core::{InMemoryCatalog, StoreEvent};
use aqua_store::{KeyValueStore, MemoryStore, Persistence, SqliteStore, StoreConfig};
use aqua_wallet::DemoWallet;

use error::ApiError;
use shell::Outcome;
use state::{AppConfig, EngineSettings, StoreEngine};

/// Everything the application root owns.
#[derive(Debug, Clone)]
pub struct App {
    pub engine: Arc<StoreEngine>,
    pub wallet: Arc<DemoWallet>,
    pub config: AppConfig,
}

/// Builds the application from configuration.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Open Storage ─────────────────────────────────────────────────────► │
/// │     • [storage] in_memory ──► MemoryStore                               │
/// │     • otherwise ──► SqliteStore (WAL, migrations)                       │
/// │                                                                         │
/// │  2. Hydrate ──────────────────────────────────────────────────────────► │
/// │     • cart, wishlist, last wallet session, theme                        │
/// │                                                                         │
/// │  3. Wallet ───────────────────────────────────────────────────────────► │
/// │     • DemoWallet, reconnected to the last session's address             │
/// │                                                                         │
/// │  4. Engine ───────────────────────────────────────────────────────────► │
/// │     • sample catalog, persistence observer, checkout settings           │
/// │     • unknown products dropped from the hydrated cart                   │
/// │     • trimmed cart written back, session re-read from the wallet        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap(config: AppConfig) -> Result<App, ApiError> {
    let store: Arc<dyn KeyValueStore> = if config.storage.in_memory {
        info!("Using in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        let path = config.database_path()?;
        info!(?path, "Database path determined");
        let store_config = StoreConfig::new(path).connect_timeout(config.storage.connect_timeout());
        Arc::new(SqliteStore::new(store_config).await?)
    };

    let persistence = Persistence::new(store);
    let snapshot = persistence.load().await?;

    let wallet = Arc::new(DemoWallet::new(&config.wallet)?);
    if let Some(session) = &snapshot.session {
        if let Err(e) = wallet.connect(&session.wallet_address) {
            warn!(error = %e, "Could not restore wallet session");
        }
    }

    let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet.clone())
        .observer(Arc::new(persistence))
        .settings(EngineSettings::from(&config))
        .snapshot(snapshot)
        .build();

    // Storage keeps going if this fails; memory is already correct
    if let Err(e) = engine.reconcile().await {
        warn!(error = %e, "Could not write back hydrated state");
    }

    info!("Engine initialized");

    Ok(App {
        engine: Arc::new(engine),
        wallet,
        config,
    })
}

/// Runs the shell on stdin until `quit` or end of input.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting AquaStore");

    let config = AppConfig::load(None)?;
    let app = bootstrap(config).await?;

    tokio::spawn(log_events(app.engine.subscribe()));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(&mut stdout, "AquaStore shell. Type 'help' for commands.\n").await;

    while let Ok(Some(line)) = lines.next_line().await {
        match shell::execute(&app, &line).await {
            Outcome::Quit => break,
            Outcome::Output(text) if text.is_empty() => {}
            Outcome::Output(text) => write_out(&mut stdout, &format!("{}\n", text)).await,
        }
    }

    info!("Shutting down");
    Ok(())
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) {
    if let Err(e) = stdout.write_all(text.as_bytes()).await {
        warn!(error = %e, "Failed to write to stdout");
    }
    let _ = stdout.flush().await;
}

async fn log_events(mut events: broadcast::Receiver<StoreEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => debug!(event = event.kind(), "State changed"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Event log lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=aquastore_lib=trace` - Show trace for the app only
/// - Default: INFO, DEBUG for the `aqua*` crates
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aqua=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
