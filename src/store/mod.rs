pub mod catalog;
pub mod ledger;
pub mod settings;

pub use catalog::CatalogStore;
pub use ledger::OrderLedger;
pub use settings::SettingsStore;
