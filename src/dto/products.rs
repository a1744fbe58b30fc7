use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operator input for creating or editing a menu entry. Validated at the
/// catalog boundary; a committed `Product` always has all fields set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
}
