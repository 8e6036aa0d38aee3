use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{PaginatedResponse, PaginationParams};
use crate::dto::product::{InventoryStats, ProductFilter, ProductForm};
use crate::error::{Result, StorageError};
use crate::models::Product;
use crate::services::notification::{Toast, ToastQueue};
use crate::store::{KeyValueStore, PersistentCollection, ProductSchema, StoreNamespace};

/// Repository for inventory products, same persistence model as competitions
pub struct InventoryRepository<S> {
    collection: PersistentCollection<S, ProductSchema>,
    products: Vec<Product>,
    toasts: ToastQueue,
}

impl<S: KeyValueStore> InventoryRepository<S> {
    pub fn open(store: S, namespace: StoreNamespace, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut collection = PersistentCollection::new(store, namespace);
        let products = collection.load()?;
        collection.save(&products)?;

        Ok(Self {
            collection,
            products,
            toasts: ToastQueue::new(clock),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn list(
        &self,
        filter: &ProductFilter,
        params: &PaginationParams,
    ) -> PaginatedResponse<Product> {
        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        PaginatedResponse::paginate(matching, params)
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats::from_products(&self.products)
    }

    pub fn toasts(&mut self) -> &[Toast] {
        self.toasts.active()
    }

    pub fn add(&mut self, form: &ProductForm) -> Result<Product> {
        let errors = form.validate_form();
        if !errors.is_empty() {
            return Err(StorageError::Validation(errors));
        }

        let product = Product {
            id: format!("prod-{}", Uuid::new_v4()),
            name: form.name.trim().to_string(),
            sku: form.sku.trim().to_uppercase(),
            category: form.category,
            price: form.price_value(),
            quantity: Some(form.quantity_value()),
            low_stock_threshold: Some(form.low_stock_threshold_value()),
        };

        let mut next = Vec::with_capacity(self.products.len() + 1);
        next.push(product.clone());
        next.extend(self.products.iter().cloned());
        self.commit(next)?;

        info!(id = %product.id, name = %product.name, "Product added");
        self.toasts
            .success(format!("\"{}\" added to inventory.", product.name));
        Ok(product)
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Product>> {
        let Some(target) = self.find(id).cloned() else {
            return Ok(None);
        };

        let next = self.products.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(next)?;

        info!(id = %target.id, "Product removed");
        self.toasts
            .success(format!("\"{}\" removed from inventory.", target.name));
        Ok(Some(target))
    }

    /// Add `delta` to the stock count, flooring at zero
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> Result<Option<Product>> {
        self.update_quantity(id, |current| current.saturating_add(delta))
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<Option<Product>> {
        self.update_quantity(id, |_| quantity)
    }

    fn update_quantity(
        &mut self,
        id: &str,
        compute: impl FnOnce(i64) -> i64,
    ) -> Result<Option<Product>> {
        let Some(position) = self.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let mut next = self.products.clone();
        let current = i64::from(next[position].quantity.unwrap_or(0));
        let quantity = compute(current).clamp(0, i64::from(u32::MAX));
        next[position].quantity = Some(u32::try_from(quantity).unwrap_or(u32::MAX));
        let updated = next[position].clone();

        self.commit(next)?;
        Ok(Some(updated))
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<()> {
        self.collection.save(&next)?;
        self.products = next;
        Ok(())
    }
}
