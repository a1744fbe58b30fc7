use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::products::ProductDraft;
use crate::error::{AppError, AppResult};
use crate::models::Product;
use crate::storage::{self, PRODUCTS_KEY, Storage};

/// Owns the menu. Every mutation persists the whole collection before it is
/// committed in memory, so a failed save never leaves the two out of step.
pub struct CatalogStore {
    products: Vec<Product>,
    storage: Arc<dyn Storage>,
}

impl CatalogStore {
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        let products = match storage::load_state::<Vec<Product>>(storage.as_ref(), PRODUCTS_KEY)? {
            Some(products) => products,
            None => {
                let seed = seed_products();
                storage::save_state(storage.as_ref(), PRODUCTS_KEY, &seed)?;
                tracing::info!(count = seed.len(), "seeded initial catalog");
                seed
            }
        };
        Ok(Self { products, storage })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct category labels in first-seen order, for the menu filter.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    pub fn add(&mut self, draft: ProductDraft) -> AppResult<Product> {
        let draft = validate_draft(draft)?;
        let product = commit_draft(Uuid::new_v4().to_string(), draft);

        let mut next = self.products.clone();
        next.push(product.clone());
        self.commit(next)?;

        tracing::debug!(product_id = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    pub fn update(&mut self, id: &str, draft: ProductDraft) -> AppResult<Product> {
        let draft = validate_draft(draft)?;
        let pos = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        let product = commit_draft(id.to_string(), draft);

        let mut next = self.products.clone();
        next[pos] = product.clone();
        self.commit(next)?;

        tracing::debug!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Removes by id. Existing cart lines and past orders keep their copies.
    pub fn remove(&mut self, id: &str) -> AppResult<()> {
        let pos = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::NotFound)?;

        let mut next = self.products.clone();
        next.remove(pos);
        self.commit(next)?;

        tracing::debug!(product_id = %id, "product removed");
        Ok(())
    }

    fn commit(&mut self, next: Vec<Product>) -> AppResult<()> {
        storage::save_state(self.storage.as_ref(), PRODUCTS_KEY, &next)?;
        self.products = next;
        Ok(())
    }
}

fn validate_draft(draft: ProductDraft) -> AppResult<ProductDraft> {
    if draft.name.trim().is_empty() {
        return Err(AppError::Validation("product name must not be empty".into()));
    }
    if draft.price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".into()));
    }
    Ok(draft)
}

fn commit_draft(id: String, draft: ProductDraft) -> Product {
    Product {
        id,
        name: draft.name,
        description: draft.description,
        price: draft.price,
        category: draft.category,
        image: draft.image,
    }
}

/// The menu a fresh install starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Classic Cheeseburger".to_string(),
            description: "Juicy beef patty, cheddar cheese, lettuce, tomato, and house sauce."
                .to_string(),
            price: Decimal::new(1250, 2),
            category: "Beef".to_string(),
            image: Some("https://picsum.photos/id/292/400/300".to_string()),
        },
        Product {
            id: "2".to_string(),
            name: "Spicy Chicken Deluxe".to_string(),
            description: "Crispy fried chicken, spicy mayo, slaw, and pickles.".to_string(),
            price: Decimal::new(1400, 2),
            category: "Chicken".to_string(),
            image: Some("https://picsum.photos/id/835/400/300".to_string()),
        },
        Product {
            id: "3".to_string(),
            name: "Double Trouble".to_string(),
            description: "Two beef patties, double cheese, caramelized onions, and BBQ sauce."
                .to_string(),
            price: Decimal::new(1890, 2),
            category: "Beef".to_string(),
            image: Some("https://picsum.photos/id/488/400/300".to_string()),
        },
    ]
}
