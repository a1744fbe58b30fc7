use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus};
use crate::storage::{self, ORDERS_KEY, Storage};

/// The durable collection of submitted orders, newest first. Orders are only
/// ever appended by checkout; the single mutable field afterwards is status.
pub struct OrderLedger {
    orders: Vec<Order>,
    storage: Arc<dyn Storage>,
}

impl OrderLedger {
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        let orders =
            storage::load_state::<Vec<Order>>(storage.as_ref(), ORDERS_KEY)?.unwrap_or_default();
        Ok(Self { orders, storage })
    }

    /// Newest-first display ordering.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Records a freshly checked-out order at the front of the ledger.
    pub fn submit(&mut self, order: Order) -> AppResult<()> {
        let mut next = self.orders.clone();
        next.insert(0, order);
        self.commit(next)?;
        Ok(())
    }

    /// Moves a Pending order to a new status. Completed and Cancelled are
    /// terminal: further attempts fail and leave the order untouched.
    pub fn set_status(&mut self, id: &str, status: OrderStatus) -> AppResult<Order> {
        let pos = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(AppError::NotFound)?;

        let current = self.orders[pos].status;
        if current.is_terminal() {
            return Err(AppError::Validation(format!(
                "order {id} is already {current:?} and cannot change status"
            )));
        }

        let mut next = self.orders.clone();
        next[pos].status = status;
        self.commit(next)?;

        tracing::info!(order_id = %id, status = ?status, "order status updated");
        Ok(self.orders[pos].clone())
    }

    fn commit(&mut self, next: Vec<Order>) -> AppResult<()> {
        storage::save_state(self.storage.as_ref(), ORDERS_KEY, &next)?;
        self.orders = next;
        Ok(())
    }
}
