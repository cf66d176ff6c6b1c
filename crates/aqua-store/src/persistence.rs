//! # Persistence Adapter
//!
//! Mirrors engine state into a [`KeyValueStore`]: hydrates a
//! [`PersistedSnapshot`] at startup and writes the affected aggregate for
//! every [`StoreEvent`].
//!
//! ## Event → Key Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreEvent                     Storage effect                          │
//! │  ──────────                     ──────────────                          │
//! │  CartUpdated(lines)       ───►  set aquastore-cart      = JSON lines    │
//! │  WishlistUpdated(ids)     ───►  set aquastore-wishlist  = JSON ids      │
//! │  SessionUpdated(Some(s))  ───►  set aquastore-user      = JSON session  │
//! │  SessionUpdated(None)     ───►  remove aquastore-user                   │
//! │  ThemeUpdated(t)          ───►  set aquastore-theme     = "dark"        │
//! │  CheckoutStepChanged(_)   ───►  (nothing: checkout is never persisted)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hydration Policy
//! A missing key yields the default. An unreadable value is logged at
//! `warn` and also yields the default, so a corrupt entry never blocks
//! startup. Storage I/O failures are returned.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use aqua_core::{Cart, CartLine, ProductId, StoreEvent, Theme, WalletSession, Wishlist};

use crate::error::{StoreError, StoreResult};
use crate::keys::StorageKey;
use crate::kv::KeyValueStore;

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedSnapshot {
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub session: Option<WalletSession>,
    pub theme: Theme,
}

/// Writes engine events into a key-value store and reads them back.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Persistence { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Reads every aggregate, falling back to defaults per key.
    pub async fn load(&self) -> StoreResult<PersistedSnapshot> {
        let lines: Vec<CartLine> = self.read_json(StorageKey::Cart).await?.unwrap_or_default();
        let ids: Vec<ProductId> = self.read_json(StorageKey::Wishlist).await?.unwrap_or_default();
        let session: Option<WalletSession> = self.read_json(StorageKey::User).await?;
        let theme = self.read_theme().await?;

        let snapshot = PersistedSnapshot {
            cart: Cart::from_lines(lines),
            wishlist: Wishlist::from_ids(ids),
            session,
            theme,
        };

        debug!(
            cart_lines = snapshot.cart.line_count(),
            wishlist = snapshot.wishlist.len(),
            has_session = snapshot.session.is_some(),
            theme = snapshot.theme.as_str(),
            "Hydrated persisted state"
        );

        Ok(snapshot)
    }

    async fn read_json<T: DeserializeOwned>(&self, key: StorageKey) -> StoreResult<Option<T>> {
        let Some(bytes) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable persisted value");
                Ok(None)
            }
        }
    }

    /// The theme is stored as a bare word; a JSON-quoted word is accepted too.
    async fn read_theme(&self) -> StoreResult<Theme> {
        let Some(bytes) = self.store.get(StorageKey::Theme.as_str()).await? else {
            return Ok(Theme::default());
        };

        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| e.to_string())
            .and_then(|s| s.parse::<Theme>().map_err(|e| e.to_string()));

        Ok(parsed.unwrap_or_else(|e| {
            warn!(key = %StorageKey::Theme, error = %e, "Discarding unreadable theme");
            Theme::default()
        }))
    }

    // =========================================================================
    // Write-on-event
    // =========================================================================

    /// Persists the aggregate an event carries.
    pub async fn apply(&self, event: &StoreEvent) -> StoreResult<()> {
        match event {
            StoreEvent::CartUpdated(lines) => self.write_json(StorageKey::Cart, lines).await,
            StoreEvent::WishlistUpdated(ids) => self.write_json(StorageKey::Wishlist, ids).await,
            StoreEvent::SessionUpdated(Some(session)) => {
                self.write_json(StorageKey::User, session).await
            }
            StoreEvent::SessionUpdated(None) => self.store.remove(StorageKey::User.as_str()).await,
            StoreEvent::ThemeUpdated(theme) => {
                self.store
                    .set(StorageKey::Theme.as_str(), theme.as_str().as_bytes())
                    .await
            }
            StoreEvent::CheckoutStepChanged(_) => Ok(()),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::serialization(key.as_str(), e))?;
        self.store.set(key.as_str(), &bytes).await
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
