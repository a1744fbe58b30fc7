use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub table_no: String,
    pub payment_method: PaymentMethod,
}
