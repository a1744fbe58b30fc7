use chrono::Utc;
use uuid::Uuid;

use crate::dto::orders::CheckoutRequest;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus};
use crate::state::AppState;

/// Materializes the cart into an immutable Pending order, records it in the
/// ledger, and clears the cart. Validation or a failed ledger save leaves both
/// the cart and the ledger exactly as they were.
pub fn checkout(state: &mut AppState, payload: CheckoutRequest) -> AppResult<Order> {
    let customer_name = payload.customer_name.trim();
    if customer_name.is_empty() {
        return Err(AppError::Validation("missing name".into()));
    }
    let table_no = payload.table_no.trim();
    if table_no.is_empty() {
        return Err(AppError::Validation("missing table".into()));
    }
    // The cart panel should not offer checkout on an empty cart; guard anyway
    // rather than emit a zero-item order.
    if state.cart.is_empty() {
        return Err(AppError::Validation("empty cart".into()));
    }

    let order = Order {
        id: Uuid::new_v4().to_string(),
        customer_name: customer_name.to_string(),
        table_no: table_no.to_string(),
        items: state.cart.snapshot(),
        total_amount: state.cart.total(),
        payment_method: payload.payment_method,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };

    state.ledger.submit(order.clone())?;
    state.cart.clear();

    tracing::info!(
        order_id = %order.id,
        total = %order.total_amount,
        method = ?order.payment_method,
        "order placed"
    );
    Ok(order)
}
