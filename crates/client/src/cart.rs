//! The persisted shopping cart.
//!
//! An ordered aggregate of product snapshots and quantities. Every
//! mutation re-serializes the full cart to storage before returning, so a
//! process restart reproduces the exact same entries. `total` and
//! `item_count` are derived on every access, never stored.
//!
//! All mutations run under a single mutex: one logical writer, as required
//! to avoid lost updates when two tasks mutate the cart back to back. The
//! store deliberately does not clamp quantities against available stock -
//! that check belongs to the calling UI.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sunbird_core::ProductId;

use crate::storage::{Storage, StorageError, keys};
use crate::types::Product;

/// One cart entry: a product snapshot and a quantity of at least 1.
///
/// A quantity update that would drop to 0 removes the entry instead, so a
/// non-positive quantity is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// Persisted, mutable cart aggregate.
///
/// Insertion order is preserved for display; lookup is by product id.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: Mutex<Vec<CartItem>>,
}

impl CartStore {
    /// Create a store hydrated from persisted storage.
    ///
    /// Missing or unparseable persisted data yields an empty cart rather
    /// than an error.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.get(keys::CART) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "persisted cart does not parse, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "cart storage unreadable, starting empty");
                Vec::new()
            }
        };

        Self {
            storage,
            items: Mutex::new(items),
        }
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn add(&self, product: Product) -> Result<(), StorageError> {
        self.add_item(product, 1)
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product already has an entry its quantity is incremented;
    /// otherwise a new entry is appended. Adding 0 units is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn add_item(&self, product: Product, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return Ok(());
        }

        let mut items = self.lock();
        if let Some(entry) = items.iter_mut().find(|item| item.product.id == product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            items.push(CartItem { product, quantity });
        }
        self.persist(&items)
    }

    /// Remove the entry for `product_id`; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn remove_item(&self, product_id: ProductId) -> Result<(), StorageError> {
        let mut items = self.lock();
        items.retain(|item| item.product.id != product_id);
        self.persist(&items)
    }

    /// Set the quantity for `product_id` to exactly `quantity`.
    ///
    /// A quantity of 0 removes the entry, matching the invariant that a
    /// persisted quantity is always at least 1.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) -> Result<(), StorageError> {
        let mut items = self.lock();
        if quantity == 0 {
            items.retain(|item| item.product.id != product_id);
        } else if let Some(entry) = items.iter_mut().find(|item| item.product.id == product_id) {
            entry.quantity = quantity;
        }
        self.persist(&items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.lock();
        items.clear();
        self.persist(&items)
    }

    /// A snapshot of the current entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Sum of `price x quantity` over the current entries.
    ///
    /// Computed fresh on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lock()
            .iter()
            .map(|item| item.product.price * Decimal::from(item.quantity))
            .sum()
    }

    /// Sum of quantities over the current entries.
    ///
    /// Computed fresh on every call.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().iter().map(|item| item.quantity).sum()
    }

    fn persist(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.storage.set(keys::CART, &json)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
