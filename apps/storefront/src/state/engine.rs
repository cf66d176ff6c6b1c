//! # Store Engine
//!
//! The single owner of cart, wishlist, checkout, wallet session and theme.
//! One instance per application, shared as `Arc<StoreEngine>`.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command (add_to_cart, toggle_wishlist, confirm_review, ...)            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  lock state ──► validate ──► mutate ──► collect StoreEvents ──► unlock  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  publish each event                                                     │
//! │     ├── broadcast::Sender  (presentation layer, never fails a command)  │
//! │     └── observers in order (persistence)                                │
//! │            └── error ──► CoreError::PersistenceFailure                  │
//! │                          (in-memory change is kept)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`. Only `initiate_checkout` (readiness wait), `submit_payment` and
//! `pay_service` (wallet approval) suspend. While a payment is suspended the
//! in-flight flag turns a second payment into `AlreadyInProgress`, and
//! queries keep answering with the pre-payment state.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use aqua_core::{
    list, Cart, CartEntry, Catalog, CheckoutSession, CheckoutStep, ConversionRate, CoreError,
    CoreResult, ListingQuery, Money, PaymentAmount, Product, ProductId, Receipt, ServiceOrder,
    StoreEvent, Theme, TokenAmount, WalletSession, Wishlist, DEFAULT_PAYMENT_DESTINATION,
};
use aqua_store::{PersistedSnapshot, Persistence, StoreError, StoreResult};
use aqua_wallet::PaymentCollaborator;

use super::config::AppConfig;

/// Capacity of the presentation event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Observers
// =============================================================================

/// Receives every change the engine makes, in order, before the command
/// returns.
///
/// ## Errors
/// A failed observer turns the command's result into
/// `CoreError::PersistenceFailure`; later observers still run.
#[async_trait]
pub trait StateObserver: Send + Sync {
    async fn on_event(&self, event: &StoreEvent) -> StoreResult<()>;
}

/// Write-on-event persistence.
#[async_trait]
impl StateObserver for Persistence {
    async fn on_event(&self, event: &StoreEvent) -> StoreResult<()> {
        self.apply(event).await
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Checkout parameters the engine needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub conversion_rate: ConversionRate,
    pub ready_timeout: Duration,
    pub destination: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            conversion_rate: ConversionRate::default(),
            ready_timeout: Duration::from_secs(10),
            destination: DEFAULT_PAYMENT_DESTINATION.to_string(),
        }
    }
}

impl From<&AppConfig> for EngineSettings {
    fn from(config: &AppConfig) -> Self {
        EngineSettings {
            conversion_rate: config.checkout.conversion_rate(),
            ready_timeout: config.checkout.ready_timeout(),
            destination: config.wallet.destination.clone(),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Default)]
struct EngineState {
    cart: Cart,
    wishlist: Wishlist,
    checkout: Option<CheckoutSession>,
    payment_in_flight: bool,
    session: Option<WalletSession>,
    theme: Theme,
    /// Hydration dropped cart lines that storage still holds.
    cart_trimmed: bool,
}

/// Cart/checkout engine.
pub struct StoreEngine {
    state: Mutex<EngineState>,
    catalog: Arc<dyn Catalog>,
    wallet: Arc<dyn PaymentCollaborator>,
    observers: Vec<Arc<dyn StateObserver>>,
    events: broadcast::Sender<StoreEvent>,
    settings: EngineSettings,
}

impl StoreEngine {
    pub fn builder(
        catalog: Arc<dyn Catalog>,
        wallet: Arc<dyn PaymentCollaborator>,
    ) -> StoreEngineBuilder {
        StoreEngineBuilder {
            catalog,
            wallet,
            observers: Vec::new(),
            settings: EngineSettings::default(),
            snapshot: PersistedSnapshot::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A receiver for every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Cart lines joined with their products, in first-add order.
    pub fn get_cart(&self) -> Vec<CartEntry> {
        self.lock().cart.entries(self.catalog.as_ref())
    }

    pub fn get_subtotal(&self) -> Money {
        self.lock().cart.subtotal(self.catalog.as_ref())
    }

    pub fn get_token_subtotal(&self) -> TokenAmount {
        self.lock().cart.token_subtotal(self.catalog.as_ref())
    }

    /// Total units, for the cart badge.
    pub fn get_item_count(&self) -> u64 {
        self.lock().cart.item_count()
    }

    pub fn is_wishlisted(&self, product_id: ProductId) -> bool {
        self.lock().wishlist.contains(product_id)
    }

    /// Wishlisted ids in ascending order.
    pub fn wishlist(&self) -> Vec<ProductId> {
        self.lock().wishlist.ids()
    }

    pub fn checkout_step(&self) -> Option<CheckoutStep> {
        self.lock().checkout.as_ref().map(|c| c.step)
    }

    /// A copy of the active checkout session.
    pub fn checkout(&self) -> Option<CheckoutSession> {
        self.lock().checkout.clone()
    }

    pub fn is_payment_in_flight(&self) -> bool {
        self.lock().payment_in_flight
    }

    /// Last-known wallet session.
    pub fn session(&self) -> Option<WalletSession> {
        self.lock().session.clone()
    }

    pub fn theme(&self) -> Theme {
        self.lock().theme
    }

    pub fn product(&self, product_id: ProductId) -> CoreResult<Product> {
        self.catalog.resolve(product_id)
    }

    /// Filtered and sorted catalog listing.
    pub fn list_products(&self, query: &ListingQuery) -> CoreResult<Vec<Product>> {
        Ok(list(self.catalog.products(), query)?)
    }

    /// The state that survives a restart, as it is right now.
    pub fn persisted_view(&self) -> PersistedSnapshot {
        let state = self.lock();
        PersistedSnapshot {
            cart: state.cart.clone(),
            wishlist: state.wishlist.clone(),
            session: state.session.clone(),
            theme: state.theme,
        }
    }

    // =========================================================================
    // Cart & Wishlist Commands
    // =========================================================================

    /// Adds one unit, merging into an existing line.
    ///
    /// ## Returns
    /// The line's new quantity.
    pub async fn add_to_cart(&self, product_id: ProductId) -> CoreResult<u32> {
        debug!(product_id = %product_id, "add_to_cart");
        self.catalog.resolve(product_id)?;

        let (quantity, event) = {
            let mut state = self.lock();
            let quantity = state.cart.add(product_id);
            (quantity, cart_event(&state.cart))
        };

        self.publish(vec![event]).await?;
        Ok(quantity)
    }

    /// Removes the product's line. A no-op when it is not in the cart.
    pub async fn remove_from_cart(&self, product_id: ProductId) -> CoreResult<()> {
        debug!(product_id = %product_id, "remove_from_cart");

        let event = {
            let mut state = self.lock();
            state.cart.remove(product_id).then(|| cart_event(&state.cart))
        };

        match event {
            Some(event) => self.publish(vec![event]).await,
            None => Ok(()),
        }
    }

    /// Overwrites a line's quantity; `quantity <= 0` removes the line.
    pub async fn set_quantity(&self, product_id: ProductId, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product_id, quantity, "set_quantity");

        if quantity <= 0 {
            return self.remove_from_cart(product_id).await;
        }

        let event = {
            let mut state = self.lock();
            state.cart.set_quantity(product_id, quantity)?;
            cart_event(&state.cart)
        };

        self.publish(vec![event]).await
    }

    pub async fn clear_cart(&self) -> CoreResult<()> {
        debug!("clear_cart");

        let event = {
            let mut state = self.lock();
            state.cart.clear();
            cart_event(&state.cart)
        };

        self.publish(vec![event]).await
    }

    /// Flips wishlist membership.
    ///
    /// ## Returns
    /// `true` if the product is now wishlisted.
    pub async fn toggle_wishlist(&self, product_id: ProductId) -> CoreResult<bool> {
        debug!(product_id = %product_id, "toggle_wishlist");

        let (member, event) = {
            let mut state = self.lock();
            let member = state.wishlist.toggle(product_id);
            (member, StoreEvent::WishlistUpdated(state.wishlist.ids()))
        };

        self.publish(vec![event]).await?;
        Ok(member)
    }

    // =========================================================================
    // Session & Preferences
    // =========================================================================

    /// Re-reads the wallet session and records it.
    pub async fn refresh_session(&self) -> CoreResult<Option<WalletSession>> {
        let session = self.wallet.session();
        debug!(connected = session.is_some(), "refresh_session");

        self.lock().session = session.clone();
        self.publish(vec![StoreEvent::SessionUpdated(session.clone())]).await?;
        Ok(session)
    }

    pub async fn set_theme(&self, theme: Theme) -> CoreResult<Theme> {
        debug!(theme = theme.as_str(), "set_theme");

        self.lock().theme = theme;
        self.publish(vec![StoreEvent::ThemeUpdated(theme)]).await?;
        Ok(theme)
    }

    pub async fn toggle_theme(&self) -> CoreResult<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme).await
    }

    /// Brings storage and the wallet session in line with a freshly built
    /// engine: writes back a cart trimmed during hydration, then replaces the
    /// hydrated session with what the wallet reports now.
    pub async fn reconcile(&self) -> CoreResult<Option<WalletSession>> {
        let trimmed = {
            let mut state = self.lock();
            std::mem::take(&mut state.cart_trimmed).then(|| cart_event(&state.cart))
        };

        let written = match trimmed {
            Some(event) => self.publish(vec![event]).await,
            None => Ok(()),
        };
        let session = self.refresh_session().await?;
        written.map(|_| session)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Opens a checkout at Review.
    ///
    /// ## Order of Checks
    /// 1. Empty cart ──► `EmptyCart`
    /// 2. Session already open ──► `InvalidStep`
    /// 3. Wait for the wallet (bounded), no session ──► `NotAuthenticated`
    pub async fn initiate_checkout(&self) -> CoreResult<CheckoutSession> {
        debug!("initiate_checkout");
        self.check_can_initiate()?;

        let timeout = self.settings.ready_timeout;
        if !self.wallet.until_available_within(timeout).await {
            warn!(timeout_secs = timeout.as_secs(), "Wallet did not become available in time");
        }

        if !self.wallet.is_ready() {
            return Err(CoreError::NotAuthenticated);
        }

        let session = {
            let mut state = self.lock();
            // The cart may have changed while waiting for the wallet
            Self::can_initiate(&state)?;
            let session = CheckoutSession::begin(&state.cart, self.catalog.as_ref(), Utc::now())?;
            state.checkout = Some(session.clone());
            session
        };

        info!(
            checkout_id = %session.id,
            items = session.item_count(),
            token_subtotal = %session.token_subtotal,
            "Checkout started"
        );

        self.publish(vec![StoreEvent::CheckoutStepChanged(Some(CheckoutStep::Review))])
            .await?;
        Ok(session)
    }

    fn check_can_initiate(&self) -> CoreResult<()> {
        Self::can_initiate(&self.lock())
    }

    fn can_initiate(state: &EngineState) -> CoreResult<()> {
        if state.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if let Some(existing) = &state.checkout {
            return Err(CoreError::InvalidStep {
                expected: CheckoutStep::Review,
                actual: existing.step,
            });
        }
        Ok(())
    }

    /// Review → Payment.
    ///
    /// ## Returns
    /// The amount that will be charged.
    pub async fn confirm_review(&self) -> CoreResult<PaymentAmount> {
        debug!("confirm_review");

        let amount = {
            let mut state = self.lock();
            let checkout = state.checkout.as_mut().ok_or(CoreError::NoActiveCheckout)?;
            checkout.confirm_review(self.settings.conversion_rate)?
        };

        info!(amount = %amount, "Review confirmed");
        self.publish(vec![StoreEvent::CheckoutStepChanged(Some(CheckoutStep::Payment))])
            .await?;
        Ok(amount)
    }

    /// Pays through the wallet.
    ///
    /// ## Flow
    /// ```text
    /// Payment ──► pay(amount, destination) ──► Ok ──► Confirmation, cart cleared
    ///                                      └─► Err ──► Payment (retry allowed)
    /// ```
    ///
    /// ## Errors
    /// - `AlreadyInProgress` while a previous call is waiting on the wallet
    /// - `NoActiveCheckout` / `InvalidStep` outside Payment
    /// - `Payment(_)` exactly as the wallet reported it
    pub async fn submit_payment(&self) -> CoreResult<Receipt> {
        debug!("submit_payment");

        let amount = {
            let mut state = self.lock();
            let checkout = state.checkout.as_ref().ok_or(CoreError::NoActiveCheckout)?;
            if state.payment_in_flight {
                return Err(CoreError::AlreadyInProgress);
            }
            let amount = checkout.payable_amount()?;
            state.payment_in_flight = true;
            amount
        };
        let _in_flight = InFlight { engine: self };

        info!(amount = %amount, destination = %self.settings.destination, "Submitting payment");
        let receipt = match self.wallet.pay(amount, &self.settings.destination).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Payment failed, checkout stays at payment");
                return Err(e.into());
            }
        };

        let session = self.wallet.session();
        let events = {
            let mut state = self.lock();
            let checkout = state.checkout.as_mut().ok_or(CoreError::NoActiveCheckout)?;
            checkout.complete(receipt.clone())?;
            state.cart.clear();
            state.session = session.clone();
            vec![
                cart_event(&state.cart),
                StoreEvent::SessionUpdated(session),
                StoreEvent::CheckoutStepChanged(Some(CheckoutStep::Confirmation)),
            ]
        };

        info!(transaction_id = %receipt.transaction_id, amount = %receipt.amount, "Payment confirmed");
        self.publish(events).await?;
        Ok(receipt)
    }

    // =========================================================================
    // Utility Services
    // =========================================================================

    /// Pays for airtime, data, electricity or cable straight from the wallet.
    ///
    /// Cart and checkout are untouched. Shares the in-flight flag with
    /// `submit_payment`: one wallet approval at a time.
    ///
    /// ## Errors
    /// - `NotAuthenticated` without a connected wallet
    /// - `AlreadyInProgress` while another payment is waiting on the wallet
    /// - `Payment(_)` exactly as the wallet reported it
    pub async fn pay_service(&self, order: &ServiceOrder) -> CoreResult<Receipt> {
        debug!(service = %order.service, provider = %order.provider, amount = %order.amount, "pay_service");

        if !self.wallet.is_ready() {
            return Err(CoreError::NotAuthenticated);
        }

        {
            let mut state = self.lock();
            if state.payment_in_flight {
                return Err(CoreError::AlreadyInProgress);
            }
            state.payment_in_flight = true;
        }
        let _in_flight = InFlight { engine: self };

        let receipt = match self.wallet.pay(order.amount, &self.settings.destination).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(service = %order.service, error = %e, "Service payment failed");
                return Err(e.into());
            }
        };

        let session = self.wallet.session();
        self.lock().session = session.clone();

        info!(
            service = %order.service,
            transaction_id = %receipt.transaction_id,
            amount = %receipt.amount,
            "Service paid"
        );
        self.publish(vec![StoreEvent::SessionUpdated(session)]).await?;
        Ok(receipt)
    }

    /// Confirmation → (none).
    pub async fn acknowledge(&self) -> CoreResult<()> {
        debug!("acknowledge");

        {
            let mut state = self.lock();
            let checkout = state.checkout.as_ref().ok_or(CoreError::NoActiveCheckout)?;
            checkout.acknowledge()?;
            state.checkout = None;
        }

        info!("Checkout closed");
        self.publish(vec![StoreEvent::CheckoutStepChanged(None)]).await
    }

    /// Abandons the checkout from any step. Cart and wishlist are untouched.
    ///
    /// In-flight payments cannot be cancelled: this fails with
    /// `AlreadyInProgress` until the wallet answers.
    pub async fn cancel_checkout(&self) -> CoreResult<()> {
        debug!("cancel_checkout");

        let step = {
            let mut state = self.lock();
            if state.payment_in_flight {
                return Err(CoreError::AlreadyInProgress);
            }
            let checkout = state.checkout.take().ok_or(CoreError::NoActiveCheckout)?;
            checkout.step
        };

        info!(step = ?step, "Checkout cancelled");
        self.publish(vec![StoreEvent::CheckoutStepChanged(None)]).await
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Broadcasts events and runs observers in order. Every observer sees
    /// every event; the first failure is reported.
    async fn publish(&self, events: Vec<StoreEvent>) -> CoreResult<()> {
        let mut failure: Option<StoreError> = None;

        for event in events {
            // No receivers is fine
            let _ = self.events.send(event.clone());

            for observer in &self.observers {
                if let Err(e) = observer.on_event(&event).await {
                    warn!(event = event.kind(), error = %e, "Change applied but not persisted");
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(CoreError::PersistenceFailure(e.to_string())),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for StoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreEngine")
            .field("observers", &self.observers.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn cart_event(cart: &Cart) -> StoreEvent {
    StoreEvent::CartUpdated(cart.lines().to_vec())
}

/// Clears the in-flight flag however `submit_payment` exits.
struct InFlight<'a> {
    engine: &'a StoreEngine,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.engine.lock().payment_in_flight = false;
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`StoreEngine`], optionally hydrated from persisted state.
pub struct StoreEngineBuilder {
    catalog: Arc<dyn Catalog>,
    wallet: Arc<dyn PaymentCollaborator>,
    observers: Vec<Arc<dyn StateObserver>>,
    settings: EngineSettings,
    snapshot: PersistedSnapshot,
}

impl StoreEngineBuilder {
    /// Observers run in the order they are added.
    pub fn observer(mut self, observer: Arc<dyn StateObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Starts from persisted state instead of defaults.
    pub fn snapshot(mut self, snapshot: PersistedSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn build(self) -> StoreEngine {
        let PersistedSnapshot {
            mut cart,
            wishlist,
            session,
            theme,
        } = self.snapshot;

        let dropped = cart.retain_resolvable(self.catalog.as_ref());
        if !dropped.is_empty() {
            warn!(?dropped, "Dropped cart lines for products no longer in the catalog");
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        StoreEngine {
            state: Mutex::new(EngineState {
                cart,
                wishlist,
                checkout: None,
                payment_in_flight: false,
                session,
                theme,
                cart_trimmed: !dropped.is_empty(),
            }),
            catalog: self.catalog,
            wallet: self.wallet,
            observers: self.observers,
            events,
            settings: self.settings,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_core::{CartLine, InMemoryCatalog, PaymentError};
    use aqua_wallet::{DemoWallet, WalletConfig};

    const USER: &str = "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

    fn engine_with(wallet: Arc<DemoWallet>) -> StoreEngine {
        StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet).build()
    }

    fn connected_wallet(balance: &str) -> Arc<DemoWallet> {
        let config = WalletConfig {
            demo_balance: balance.to_string(),
            ..WalletConfig::default()
        };
        let wallet = DemoWallet::new(&config).unwrap();
        wallet.connect(USER).unwrap();
        Arc::new(wallet)
    }

    fn id(n: u64) -> ProductId {
        ProductId::new(n)
    }

    #[tokio::test]
    async fn test_repeated_add_merges() {
        let engine = engine_with(connected_wallet("100"));

        for expected in 1..=3 {
            assert_eq!(engine.add_to_cart(id(1)).await.unwrap(), expected);
        }

        let cart = engine.get_cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(engine.get_item_count(), 3);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let engine = engine_with(connected_wallet("100"));
        let err = engine.add_to_cart(id(99)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(engine.get_cart().is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_rules() {
        let engine = engine_with(connected_wallet("100"));

        assert_eq!(
            engine.set_quantity(id(2), 4).await,
            Err(CoreError::LineNotFound(id(2)))
        );

        engine.add_to_cart(id(2)).await.unwrap();
        engine.set_quantity(id(2), 4).await.unwrap();
        assert_eq!(engine.get_subtotal(), Money::from_cents(2999 * 4));

        engine.set_quantity(id(2), -1).await.unwrap();
        assert!(engine.get_cart().is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_toggle_twice_restores() {
        let engine = engine_with(connected_wallet("100"));

        assert!(engine.toggle_wishlist(id(5)).await.unwrap());
        assert!(engine.is_wishlisted(id(5)));
        assert!(!engine.toggle_wishlist(id(5)).await.unwrap());
        assert!(!engine.is_wishlisted(id(5)));
        assert!(engine.wishlist().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let engine = engine_with(connected_wallet("10"));
        engine.add_to_cart(id(1)).await.unwrap();

        let session = engine.initiate_checkout().await.unwrap();
        assert_eq!(session.step, CheckoutStep::Review);
        assert_eq!(session.subtotal, Money::from_cents(8999));

        let amount = engine.confirm_review().await.unwrap();
        assert_eq!(amount.nano(), 450_000_000);

        let receipt = engine.submit_payment().await.unwrap();
        assert_eq!(receipt.amount, amount);
        assert_eq!(receipt.destination, DEFAULT_PAYMENT_DESTINATION);
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Confirmation));
        assert!(engine.get_cart().is_empty());
        assert_eq!(engine.session().unwrap().balance, "9.55".parse().unwrap());

        engine.acknowledge().await.unwrap();
        assert_eq!(engine.checkout_step(), None);
    }

    #[tokio::test]
    async fn test_step_guards() {
        let engine = engine_with(connected_wallet("10"));

        assert_eq!(engine.confirm_review().await, Err(CoreError::NoActiveCheckout));
        assert_eq!(engine.cancel_checkout().await, Err(CoreError::NoActiveCheckout));

        engine.add_to_cart(id(4)).await.unwrap();
        engine.initiate_checkout().await.unwrap();

        assert!(matches!(
            engine.initiate_checkout().await,
            Err(CoreError::InvalidStep { .. })
        ));
        assert_eq!(
            engine.submit_payment().await,
            Err(CoreError::InvalidStep {
                expected: CheckoutStep::Payment,
                actual: CheckoutStep::Review,
            })
        );
        assert!(matches!(engine.acknowledge().await, Err(CoreError::InvalidStep { .. })));
    }

    #[tokio::test]
    async fn test_cancel_keeps_cart() {
        let engine = engine_with(connected_wallet("10"));
        engine.add_to_cart(id(4)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.confirm_review().await.unwrap();

        engine.cancel_checkout().await.unwrap();
        assert_eq!(engine.checkout_step(), None);
        assert_eq!(engine.persisted_view().cart.lines(), &[CartLine { product_id: id(4), quantity: 1 }]);
    }

    #[tokio::test]
    async fn test_disconnected_wallet_not_authenticated() {
        let wallet = Arc::new(DemoWallet::new(&WalletConfig::default()).unwrap());
        let engine = engine_with(wallet);
        engine.add_to_cart(id(1)).await.unwrap();

        assert_eq!(engine.initiate_checkout().await, Err(CoreError::NotAuthenticated));
        assert_eq!(engine.checkout_step(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_readiness_wait_is_bounded() {
        let wallet = DemoWallet::unloaded(&WalletConfig::default()).unwrap();
        wallet.connect(USER).unwrap();
        let engine = engine_with(Arc::new(wallet));
        engine.add_to_cart(id(1)).await.unwrap();

        // Never finishes loading: the wait gives up after ready_timeout
        assert_eq!(engine.initiate_checkout().await, Err(CoreError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_payment_failure_stays_at_payment() {
        let wallet = connected_wallet("10");
        let engine = engine_with(wallet.clone());
        engine.add_to_cart(id(3)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.confirm_review().await.unwrap();

        wallet.decline_next("User rejected the transaction");
        let err = engine.submit_payment().await.unwrap_err();
        assert!(matches!(err, CoreError::Payment(PaymentError::Rejected(_))));
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Payment));
        assert!(!engine.is_payment_in_flight());

        // Retry is allowed
        engine.submit_payment().await.unwrap();
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Confirmation));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let engine = engine_with(connected_wallet("10"));
        let mut rx = engine.subscribe();

        engine.add_to_cart(id(6)).await.unwrap();
        engine.toggle_theme().await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::CartUpdated(vec![CartLine { product_id: id(6), quantity: 1 }])
        );
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::ThemeUpdated(Theme::Dark));
    }

    struct Failing;

    #[async_trait]
    impl StateObserver for Failing {
        async fn on_event(&self, _event: &StoreEvent) -> StoreResult<()> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    #[derive(Default)]
    struct Counting(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl StateObserver for Counting {
        async fn on_event(&self, _event: &StoreEvent) -> StoreResult<()> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_observer_failure_is_reported() {
        let counting = Arc::new(Counting::default());
        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), connected_wallet("1"))
            .observer(Arc::new(Failing))
            .observer(counting.clone())
            .build();

        match engine.add_to_cart(id(1)).await {
            Err(CoreError::PersistenceFailure(message)) => assert!(message.contains("disk full")),
            other => panic!("expected a persistence failure, got {other:?}"),
        }
        assert_eq!(counting.0.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(engine.get_item_count(), 1);
    }

    #[test]
    fn test_hydration_drops_unknown_products() {
        let snapshot = PersistedSnapshot {
            cart: Cart::from_lines([
                CartLine { product_id: id(1), quantity: 2 },
                CartLine { product_id: id(42), quantity: 1 },
            ]),
            theme: Theme::Dark,
            ..PersistedSnapshot::default()
        };

        let engine = StoreEngine::builder(
            Arc::new(InMemoryCatalog::sample()),
            connected_wallet("1"),
        )
        .snapshot(snapshot)
        .build();

        assert_eq!(engine.get_item_count(), 2);
        assert_eq!(engine.get_cart()[0].product.id, id(1));
        assert_eq!(engine.theme(), Theme::Dark);
    }
}
