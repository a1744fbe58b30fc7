use rust_decimal::Decimal;

use crate::models::{CartLine, Product};

/// The customer's in-progress selection. Ephemeral by design: never persisted,
/// empty on construction and after every successful checkout, so an abandoned
/// cart cannot reappear as a ghost order.
#[derive(Debug, Default)]
pub struct CartEngine {
    lines: Vec<CartLine>,
}

impl CartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insertion order of first add.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one unit of `product`. An existing line keeps the fields copied at
    /// first add; a mid-cart catalog edit never reaches into the line.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Applies `delta` to the line's quantity, clamped at zero; zero removes
    /// the line. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: &str, delta: i32) {
        let Some(pos) = self.lines.iter().position(|l| l.product.id == id) else {
            return;
        };
        let new_quantity = (self.lines[pos].quantity as i64 + delta as i64).max(0) as u32;
        if new_quantity == 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = new_quantity;
        }
    }

    /// Drops the line if present, no-op otherwise.
    pub fn remove_item(&mut self, id: &str) {
        self.lines.retain(|l| l.product.id != id);
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total unit count, for the cart badge.
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Frozen value copy of the current lines, for order snapshots.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Burger {id}"),
            description: "test".to_string(),
            price,
            category: "Beef".to_string(),
            image: None,
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = CartEngine::new();
        let burger = product("1", dec!(12.50));

        cart.add_item(&burger);
        cart.add_item(&burger);
        cart.add_item(&burger);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn lines_keep_insertion_order_of_first_add() {
        let mut cart = CartEngine::new();
        cart.add_item(&product("1", dec!(12.50)));
        cart.add_item(&product("2", dec!(14.00)));
        cart.add_item(&product("1", dec!(12.50)));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn added_line_keeps_the_price_copied_at_first_add() {
        let mut cart = CartEngine::new();
        let mut burger = product("1", dec!(12.50));
        cart.add_item(&burger);

        // The catalog entry changes after the first add.
        burger.price = dec!(99.00);
        burger.name = "Renamed".to_string();
        cart.add_item(&burger);

        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].product.price, dec!(12.50));
        assert_eq!(cart.lines()[0].product.name, "Burger 1");
    }

    #[test]
    fn quantity_never_goes_negative_and_zero_removes_the_line() {
        let mut cart = CartEngine::new();
        cart.add_item(&product("1", dec!(12.50)));
        cart.update_quantity("1", 4);
        assert_eq!(cart.lines()[0].quantity, 5);

        cart.update_quantity("1", -100);
        assert!(cart.is_empty());

        // Idempotent on ids that are gone.
        cart.update_quantity("1", -1);
        cart.remove_item("1");
        assert!(cart.is_empty());
    }

    #[test]
    fn total_tracks_any_interleaving_of_mutations() {
        let mut cart = CartEngine::new();
        cart.add_item(&product("1", dec!(12.50)));
        cart.add_item(&product("2", dec!(14.00)));
        cart.add_item(&product("1", dec!(12.50)));
        assert_eq!(cart.total(), dec!(39.00));

        cart.update_quantity("2", 2);
        assert_eq!(cart.total(), dec!(67.00));

        cart.remove_item("1");
        assert_eq!(cart.total(), dec!(42.00));

        cart.clear();
        assert_eq!(cart.total(), dec!(0));
        assert_eq!(cart.count(), 0);
    }
}
