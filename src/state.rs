use std::sync::Arc;

use crate::cart::CartEngine;
use crate::error::AppResult;
use crate::storage::Storage;
use crate::store::{CatalogStore, OrderLedger, SettingsStore};

/// All application state, threaded explicitly: the three persisted stores
/// share one injected storage handle, the cart is ephemeral.
pub struct AppState {
    pub catalog: CatalogStore,
    pub settings: SettingsStore,
    pub ledger: OrderLedger,
    pub cart: CartEngine,
}

impl AppState {
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        Ok(Self {
            catalog: CatalogStore::load(Arc::clone(&storage))?,
            settings: SettingsStore::load(Arc::clone(&storage))?,
            ledger: OrderLedger::load(storage)?,
            cart: CartEngine::new(),
        })
    }
}
