use std::sync::Arc;

use crate::error::AppResult;
use crate::models::StoreSettings;
use crate::storage::{self, SETTINGS_KEY, Storage};

/// Singleton store configuration. Callers replace the whole record; there is
/// no partial-field update at this layer.
pub struct SettingsStore {
    settings: StoreSettings,
    storage: Arc<dyn Storage>,
}

impl SettingsStore {
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        let settings = storage::load_state::<StoreSettings>(storage.as_ref(), SETTINGS_KEY)?
            .unwrap_or_default();
        Ok(Self { settings, storage })
    }

    pub fn get(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn set(&mut self, settings: StoreSettings) -> AppResult<()> {
        storage::save_state(self.storage.as_ref(), SETTINGS_KEY, &settings)?;
        self.settings = settings;
        tracing::debug!(
            qr_configured = self.settings.qr_code_image.is_some(),
            "settings updated"
        );
        Ok(())
    }
}
