use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eburger_pos::{
    checkout::checkout,
    dto::orders::CheckoutRequest,
    error::AppError,
    models::{OrderStatus, PaymentMethod, StoreSettings},
    state::AppState,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
};
use rust_decimal_macros::dec;

/// Backend whose saves can be switched to fail, for save-failure atomicity
/// checks. Loads always go through.
#[derive(Default)]
struct FailingStorage {
    inner: MemoryStorage,
    fail_saves: AtomicBool,
}

impl FailingStorage {
    fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Storage for FailingStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.inner.save(key, blob)
    }
}

fn temp_data_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("eburger-test-{}", uuid::Uuid::new_v4()))
}

fn cash_checkout(name: &str, table: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: name.to_string(),
        table_no: table.to_string(),
        payment_method: PaymentMethod::Cash,
    }
}

// Full flow: customer builds a cart and checks out, the operator completes
// the order, and everything survives a reload from disk.
#[test]
fn checkout_complete_and_reload_flow() {
    let dir = temp_data_dir();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&dir).unwrap());
    let mut state = AppState::load(Arc::clone(&storage)).unwrap();

    // Fresh install: seeded menu, empty ledger, unconfigured QR.
    assert_eq!(state.catalog.products().len(), 3);
    assert!(state.ledger.orders().is_empty());
    assert_eq!(state.settings.get().qr_code_image, None);

    let cheeseburger = state.catalog.get("1").unwrap().clone();
    let chicken = state.catalog.get("2").unwrap().clone();
    state.cart.add_item(&cheeseburger);
    state.cart.add_item(&chicken);
    state.cart.add_item(&cheeseburger);
    assert_eq!(state.cart.count(), 3);
    assert_eq!(state.cart.total(), dec!(39.00));

    let order = checkout(&mut state, cash_checkout("Alex", "5")).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, dec!(39.00));
    assert!(state.cart.is_empty());

    state
        .settings
        .set(StoreSettings {
            qr_code_image: Some("aGVsbG8=".to_string()),
        })
        .unwrap();
    let completed = state
        .ledger
        .set_status(&order.id, OrderStatus::Completed)
        .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);

    // A second process sees exactly what the first one persisted.
    let reloaded = AppState::load(storage).unwrap();
    assert_eq!(reloaded.catalog.products(), state.catalog.products());
    assert_eq!(reloaded.ledger.orders(), state.ledger.orders());
    assert_eq!(reloaded.settings.get(), state.settings.get());
    assert_eq!(
        reloaded.ledger.get(&order.id).unwrap().status,
        OrderStatus::Completed
    );
    // The cart is ephemeral and must not reappear.
    assert!(reloaded.cart.is_empty());

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn failed_validation_leaves_cart_and_ledger_untouched() {
    let mut state = AppState::load(Arc::new(MemoryStorage::new())).unwrap();
    let cheeseburger = state.catalog.get("1").unwrap().clone();
    state.cart.add_item(&cheeseburger);

    let err = checkout(&mut state, cash_checkout("", "5")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = checkout(&mut state, cash_checkout("Alex", "  ")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(state.cart.count(), 1);
    assert!(state.ledger.orders().is_empty());
}

#[test]
fn catalog_removal_does_not_touch_carts_or_past_orders() {
    let mut state = AppState::load(Arc::new(MemoryStorage::new())).unwrap();
    let cheeseburger = state.catalog.get("1").unwrap().clone();

    state.cart.add_item(&cheeseburger);
    state.cart.add_item(&cheeseburger);
    let order = checkout(&mut state, cash_checkout("Alex", "5")).unwrap();

    state.cart.add_item(&cheeseburger);
    state.catalog.remove("1").unwrap();
    assert!(state.catalog.get("1").is_none());

    // Value copies survive the removal.
    assert_eq!(state.cart.lines()[0].product.name, "Classic Cheeseburger");
    assert_eq!(state.cart.lines()[0].product.price, dec!(12.50));
    let recorded = state.ledger.get(&order.id).unwrap();
    assert_eq!(recorded.items[0].product.price, dec!(12.50));
    assert_eq!(recorded.total_amount, dec!(25.00));
}

// A failed save must never leave in-memory state ahead of persisted state:
// the mutation is staged, persisted, and only then committed.
#[test]
fn failed_save_leaves_memory_state_and_cart_unchanged() {
    let storage = Arc::new(FailingStorage::default());
    let mut state = AppState::load(storage.clone()).unwrap();
    let cheeseburger = state.catalog.get("1").unwrap().clone();
    state.cart.add_item(&cheeseburger);

    storage.fail_saves(true);

    // Checkout: the error surfaces, the ledger stays empty, the cart is kept
    // so the customer can retry.
    let err = checkout(&mut state, cash_checkout("Alex", "5")).unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(state.ledger.orders().is_empty());
    assert_eq!(state.cart.count(), 1);
    assert_eq!(state.cart.total(), dec!(12.50));

    // Catalog remove: the product stays in place.
    assert!(matches!(state.catalog.remove("1"), Err(AppError::Storage(_))));
    assert!(state.catalog.get("1").is_some());
    assert_eq!(state.catalog.products().len(), 3);

    // Settings: the record is not replaced.
    let err = state
        .settings
        .set(StoreSettings {
            qr_code_image: Some("aGVsbG8=".to_string()),
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert_eq!(state.settings.get().qr_code_image, None);

    // Once saves recover the same cart checks out; a later failed status
    // change keeps the order Pending.
    storage.fail_saves(false);
    let order = checkout(&mut state, cash_checkout("Alex", "5")).unwrap();
    storage.fail_saves(true);
    assert!(
        state
            .ledger
            .set_status(&order.id, OrderStatus::Completed)
            .is_err()
    );
    assert_eq!(
        state.ledger.get(&order.id).unwrap().status,
        OrderStatus::Pending
    );
}

#[test]
fn terminal_orders_keep_their_status_across_reload() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut state = AppState::load(Arc::clone(&storage)).unwrap();
    let cheeseburger = state.catalog.get("1").unwrap().clone();
    state.cart.add_item(&cheeseburger);
    let order = checkout(&mut state, cash_checkout("Alex", "5")).unwrap();

    state
        .ledger
        .set_status(&order.id, OrderStatus::Cancelled)
        .unwrap();
    assert!(
        state
            .ledger
            .set_status(&order.id, OrderStatus::Completed)
            .is_err()
    );

    let reloaded = AppState::load(storage).unwrap();
    assert_eq!(
        reloaded.ledger.get(&order.id).unwrap().status,
        OrderStatus::Cancelled
    );
}
