//! Integration tests for the storefront engine.
//!
//! These run whole shopping sessions against the demo wallet and both
//! storage backends: cart math, the checkout step sequence, payment
//! failures, re-entrancy, persistence and hydration.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aqua_core::{
    Cart, CartLine, CheckoutStep, ConversionRate, CoreError, InMemoryCatalog, ListingQuery, Money,
    PaymentAmount, PaymentError, ProductId, ServiceKind, ServiceOrder, SortOrder, StoreEvent, Theme,
    ValidationError,
};
use aqua_store::{
    KeyValueStore, MemoryStore, PersistedSnapshot, Persistence, SqliteStore, StorageKey,
    StoreError, StoreResult,
};
use aqua_wallet::{DemoWallet, WalletConfig};
use aquastore_lib::state::{EngineSettings, StateObserver, StoreEngine};

const USER: &str = "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

fn id(n: u64) -> ProductId {
    ProductId::new(n)
}

fn wallet_with(balance: &str, latency_ms: u64) -> Arc<DemoWallet> {
    let config = WalletConfig {
        demo_balance: balance.to_string(),
        demo_latency_ms: latency_ms,
        ..WalletConfig::default()
    };
    let wallet = DemoWallet::new(&config).unwrap();
    wallet.connect(USER).unwrap();
    Arc::new(wallet)
}

fn engine_on(store: Arc<dyn KeyValueStore>, wallet: Arc<DemoWallet>) -> StoreEngine {
    StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet)
        .observer(Arc::new(Persistence::new(store)))
        .build()
}

fn memory_engine(balance: &str) -> (StoreEngine, MemoryStore) {
    let store = MemoryStore::new();
    let engine = engine_on(Arc::new(store.clone()), wallet_with(balance, 0));
    (engine, store)
}

/// Records every event it sees.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<StoreEvent>>,
}

impl Recorder {
    fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateObserver for Recorder {
    async fn on_event(&self, event: &StoreEvent) -> StoreResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A store whose writes always fail.
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> StoreResult<()> {
        Err(StoreError::Unavailable("storage quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("storage quota exceeded".into()))
    }
}

mod cart_behaviour {
    use super::*;

    #[tokio::test]
    async fn two_products_subtotal() {
        let (engine, _) = memory_engine("100");

        engine.add_to_cart(id(1)).await.unwrap();
        engine.add_to_cart(id(3)).await.unwrap();

        assert_eq!(engine.get_subtotal(), Money::from_cents(28998));
        assert_eq!(engine.get_subtotal().to_string(), "$289.98");
        assert_eq!(engine.get_item_count(), 2);
    }

    #[tokio::test]
    async fn set_quantity_zero_empties_cart() {
        let (engine, _) = memory_engine("100");

        engine.add_to_cart(id(1)).await.unwrap();
        engine.add_to_cart(id(1)).await.unwrap();
        assert_eq!(engine.get_cart()[0].quantity, 2);

        engine.set_quantity(id(1), 0).await.unwrap();
        assert!(engine.get_cart().is_empty());
        assert_eq!(engine.get_subtotal(), Money::zero());
    }

    #[tokio::test]
    async fn subtotal_tracks_every_mutation() {
        let (engine, _) = memory_engine("100");

        let check = |engine: &StoreEngine| {
            let expected: i64 = engine
                .get_cart()
                .iter()
                .map(|e| e.product.price_cents * i64::from(e.quantity))
                .sum();
            assert_eq!(engine.get_subtotal(), Money::from_cents(expected));
        };

        engine.add_to_cart(id(2)).await.unwrap();
        check(&engine);
        engine.add_to_cart(id(7)).await.unwrap();
        check(&engine);
        engine.set_quantity(id(2), 5).await.unwrap();
        check(&engine);
        engine.remove_from_cart(id(7)).await.unwrap();
        check(&engine);
        assert!(engine.get_cart().iter().all(|e| e.product.id != id(7)));
        engine.clear_cart().await.unwrap();
        check(&engine);
    }

    #[tokio::test]
    async fn burst_of_adds_collapses_into_one_line() {
        let (engine, _) = memory_engine("100");
        let engine = Arc::new(engine);

        let adds: Vec<_> = (0..10)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.add_to_cart(id(4)).await })
            })
            .collect();
        for add in adds {
            add.await.unwrap().unwrap();
        }

        let cart = engine.get_cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 10);
    }

    #[tokio::test]
    async fn listing_filters_and_sorts() {
        let (engine, _) = memory_engine("100");

        let popular = engine
            .list_products(&ListingQuery::default().sort(SortOrder::Popular))
            .unwrap();
        assert_eq!(popular[0].id, id(3));

        let coffee = engine
            .list_products(&ListingQuery::default().search("COFFEE"))
            .unwrap();
        assert_eq!(coffee.len(), 1);
        assert_eq!(coffee[0].id, id(4));
    }
}

mod checkout_flow {
    use super::*;

    #[tokio::test]
    async fn empty_cart_cannot_checkout() {
        let (engine, _) = memory_engine("100");

        assert_eq!(engine.initiate_checkout().await, Err(CoreError::EmptyCart));
        assert_eq!(engine.checkout_step(), None);
    }

    #[tokio::test]
    async fn successful_payment_reaches_confirmation() {
        let (engine, store) = memory_engine("100");
        engine.add_to_cart(id(1)).await.unwrap();
        engine.add_to_cart(id(3)).await.unwrap();

        let session = engine.initiate_checkout().await.unwrap();
        assert_eq!(session.step, CheckoutStep::Review);
        assert_eq!(session.lines.len(), 2);
        assert_eq!(session.subtotal, Money::from_cents(28998));

        let amount = engine.confirm_review().await.unwrap();
        assert_eq!(amount.to_string(), "1.45 TON");
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Payment));

        let receipt = engine.submit_payment().await.unwrap();
        assert!(receipt.transaction_id.starts_with("TON"));
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Confirmation));
        assert!(engine.get_cart().is_empty());

        // Cleared cart and refreshed session are persisted
        let persisted = Persistence::new(Arc::new(store)).load().await.unwrap();
        assert!(persisted.cart.is_empty());
        assert_eq!(
            persisted.session.unwrap().balance,
            "98.55".parse::<PaymentAmount>().unwrap()
        );

        engine.acknowledge().await.unwrap();
        assert_eq!(engine.checkout_step(), None);
        assert!(engine.checkout().is_none());
    }

    #[tokio::test]
    async fn insufficient_balance_stays_at_payment() {
        let (engine, _) = memory_engine("0.10");
        engine.add_to_cart(id(1)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.confirm_review().await.unwrap();

        for _ in 0..2 {
            let err = engine.submit_payment().await.unwrap_err();
            assert!(matches!(
                err,
                CoreError::Payment(PaymentError::InsufficientBalance { .. })
            ));
            assert_eq!(engine.checkout_step(), Some(CheckoutStep::Payment));
        }

        // Nothing was cleared
        assert_eq!(engine.get_item_count(), 1);
    }

    #[tokio::test]
    async fn snapshot_fixes_the_amount() {
        let (engine, _) = memory_engine("100");
        engine.add_to_cart(id(1)).await.unwrap();
        engine.initiate_checkout().await.unwrap();

        // Cart edits after Review do not change what is charged
        engine.add_to_cart(id(7)).await.unwrap();
        let amount = engine.confirm_review().await.unwrap();
        assert_eq!(amount.nano(), 450_000_000);
    }

    #[tokio::test]
    async fn reentrant_submit_is_rejected() {
        let store = MemoryStore::new();
        let engine = Arc::new(engine_on(Arc::new(store), wallet_with("100", 300)));
        engine.add_to_cart(id(2)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.confirm_review().await.unwrap();

        let first = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.submit_payment().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(engine.is_payment_in_flight());
        assert_eq!(engine.submit_payment().await, Err(CoreError::AlreadyInProgress));
        assert_eq!(engine.cancel_checkout().await, Err(CoreError::AlreadyInProgress));

        // Queries still see the pre-payment state
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Payment));
        assert_eq!(engine.get_item_count(), 1);

        first.await.unwrap().unwrap();
        assert!(!engine.is_payment_in_flight());
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Confirmation));
    }

    #[tokio::test]
    async fn unpayable_total_stays_at_review() {
        let wallet = wallet_with("100", 0);
        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet)
            .settings(EngineSettings {
                conversion_rate: ConversionRate::from_bps(10_000),
                ..EngineSettings::default()
            })
            .build();

        engine.add_to_cart(id(3)).await.unwrap();
        engine.set_quantity(id(3), u32::MAX as i64).await.unwrap();
        engine.initiate_checkout().await.unwrap();

        let err = engine.confirm_review().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(engine.checkout_step(), Some(CheckoutStep::Review));
        assert_eq!(engine.checkout().unwrap().payment_amount, None);

        // The engine still takes commands
        engine.cancel_checkout().await.unwrap();
        engine.set_quantity(id(3), 1).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        assert!(engine.confirm_review().await.is_ok());
    }

    #[tokio::test]
    async fn service_payment_waits_for_checkout_payment() {
        let wallet = wallet_with("100", 200);
        let engine = Arc::new(engine_on(Arc::new(MemoryStore::new()), wallet));
        engine.add_to_cart(id(1)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.confirm_review().await.unwrap();

        let paying = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.submit_payment().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let order = ServiceOrder::new(ServiceKind::Airtime, "08035550101", "Glo", "1").unwrap();
        assert!(matches!(
            engine.pay_service(&order).await,
            Err(CoreError::AlreadyInProgress)
        ));

        paying.await.unwrap().unwrap();
        let receipt = engine.pay_service(&order).await.unwrap();
        assert_eq!(receipt.amount, PaymentAmount::from_hundredths(100));
    }

    #[tokio::test]
    async fn cancel_leaves_cart_and_storage_alone() {
        let recorder = Arc::new(Recorder::default());
        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet_with("100", 0))
            .observer(recorder.clone())
            .build();

        engine.add_to_cart(id(5)).await.unwrap();
        engine.initiate_checkout().await.unwrap();
        engine.cancel_checkout().await.unwrap();

        assert_eq!(engine.checkout_step(), None);
        assert_eq!(engine.get_item_count(), 1);
        assert_eq!(
            recorder.events(),
            vec![
                StoreEvent::CartUpdated(vec![CartLine { product_id: id(5), quantity: 1 }]),
                StoreEvent::CheckoutStepChanged(Some(CheckoutStep::Review)),
                StoreEvent::CheckoutStepChanged(None),
            ]
        );
    }

    #[tokio::test]
    async fn disconnected_wallet_is_not_authenticated() {
        let wallet = wallet_with("100", 0);
        let engine = engine_on(Arc::new(MemoryStore::new()), wallet.clone());
        engine.add_to_cart(id(1)).await.unwrap();

        wallet.disconnect();
        assert_eq!(engine.initiate_checkout().await, Err(CoreError::NotAuthenticated));
        assert_eq!(engine.refresh_session().await.unwrap(), None);
    }
}

mod persistence {
    use super::*;

    #[tokio::test]
    async fn failed_write_keeps_the_change() {
        let engine = engine_on(Arc::new(ReadOnlyStore), wallet_with("100", 0));

        let err = engine.add_to_cart(id(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(engine.get_item_count(), 1);

        let err = engine.toggle_wishlist(id(2)).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert!(engine.is_wishlisted(id(2)));
    }

    #[tokio::test]
    async fn state_survives_restart_on_sqlite() {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().await.unwrap());
        let wallet = wallet_with("100", 0);

        let engine = engine_on(store.clone(), wallet.clone());
        engine.add_to_cart(id(6)).await.unwrap();
        engine.add_to_cart(id(6)).await.unwrap();
        engine.add_to_cart(id(2)).await.unwrap();
        engine.toggle_wishlist(id(8)).await.unwrap();
        engine.set_theme(Theme::Dark).await.unwrap();
        engine.refresh_session().await.unwrap();
        let before = engine.persisted_view();
        drop(engine);

        let snapshot = Persistence::new(store.clone()).load().await.unwrap();
        assert_eq!(snapshot, before);

        let restored = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet)
            .observer(Arc::new(Persistence::new(store)))
            .snapshot(snapshot)
            .build();
        assert_eq!(restored.get_item_count(), 3);
        assert_eq!(restored.get_cart()[0].product.id, id(6));
        assert!(restored.is_wishlisted(id(8)));
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.session().unwrap().wallet_address, USER);
    }

    #[tokio::test]
    async fn hydration_drops_retired_products() {
        let store = MemoryStore::new();
        store
            .set(
                StorageKey::Cart.as_str(),
                br#"[{"productId":3,"quantity":1},{"productId":404,"quantity":2}]"#,
            )
            .await
            .unwrap();

        let snapshot = Persistence::new(Arc::new(store)).load().await.unwrap();
        assert_eq!(snapshot.cart.line_count(), 2);

        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet_with("1", 0))
            .snapshot(snapshot)
            .build();
        assert_eq!(
            engine.persisted_view().cart,
            Cart::from_lines([CartLine { product_id: id(3), quantity: 1 }])
        );
    }

    #[tokio::test]
    async fn startup_writes_back_the_trimmed_cart() {
        let store = MemoryStore::new();
        store
            .set(
                StorageKey::Cart.as_str(),
                br#"[{"productId":3,"quantity":1},{"productId":404,"quantity":2}]"#,
            )
            .await
            .unwrap();
        let persistence = Persistence::new(Arc::new(store.clone()));
        let snapshot = persistence.load().await.unwrap();

        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), wallet_with("1", 0))
            .observer(Arc::new(persistence.clone()))
            .snapshot(snapshot)
            .build();
        engine.reconcile().await.unwrap();

        let trimmed = Cart::from_lines([CartLine { product_id: id(3), quantity: 1 }]);
        assert_eq!(persistence.load().await.unwrap().cart, trimmed);
    }

    #[tokio::test]
    async fn startup_drops_a_session_the_wallet_lost() {
        let store = MemoryStore::new();
        let engine = engine_on(Arc::new(store.clone()), wallet_with("100", 0));
        engine.refresh_session().await.unwrap();
        let snapshot = Persistence::new(Arc::new(store.clone())).load().await.unwrap();
        assert!(snapshot.session.is_some());
        drop(engine);

        let offline = Arc::new(DemoWallet::new(&WalletConfig::default()).unwrap());
        let engine = StoreEngine::builder(Arc::new(InMemoryCatalog::sample()), offline)
            .observer(Arc::new(Persistence::new(Arc::new(store.clone()))))
            .snapshot(snapshot)
            .build();
        assert!(engine.session().is_some());

        assert_eq!(engine.reconcile().await.unwrap(), None);
        assert_eq!(engine.session(), None);
        assert!(store.get(StorageKey::User.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disconnect_removes_the_user_key() {
        let store = MemoryStore::new();
        let wallet = wallet_with("100", 0);
        let engine = engine_on(Arc::new(store.clone()), wallet.clone());

        engine.refresh_session().await.unwrap();
        assert!(store.get(StorageKey::User.as_str()).await.unwrap().is_some());

        wallet.disconnect();
        assert_eq!(engine.refresh_session().await.unwrap(), None);
        assert!(store.get(StorageKey::User.as_str()).await.unwrap().is_none());
        assert_eq!(
            Persistence::new(Arc::new(store)).load().await.unwrap(),
            PersistedSnapshot::default()
        );
    }

    #[tokio::test]
    async fn lagging_subscriber_never_fails_commands() {
        let (engine, _) = memory_engine("100");
        let _idle = engine.subscribe();

        for _ in 0..100 {
            engine.add_to_cart(id(1)).await.unwrap();
        }
        assert_eq!(engine.get_item_count(), 100);
    }
}
