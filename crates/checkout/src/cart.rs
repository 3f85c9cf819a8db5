//! Shared cart state.
//!
//! The cart store is owned by the application shell and handed to the
//! checkout flow as an `Arc<CartStore>`. Items and both totals live in
//! `tokio::sync::watch` channels, so any view can subscribe to the latest
//! value without polling and without locks.

use checkout_core::{CartItem, Price, ProductId};
use tokio::sync::watch;

/// Cart line items plus observable totals.
#[derive(Debug)]
pub struct CartStore {
    items: watch::Sender<Vec<CartItem>>,
    total_price: watch::Sender<Price>,
    total_quantity: watch::Sender<u32>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart with zero totals.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: watch::Sender::new(Vec::new()),
            total_price: watch::Sender::new(Price::ZERO),
            total_quantity: watch::Sender::new(0),
        }
    }

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.items.borrow().clone()
    }

    /// Replace the line items. Totals are left as they are.
    pub fn set_items(&self, items: Vec<CartItem>) {
        self.items.send_replace(items);
    }

    /// Add a line, merging quantities with an existing line for the same product.
    pub fn add_item(&self, item: CartItem) {
        self.items.send_modify(|items| {
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => items.push(item),
            }
        });
        self.compute_cart_totals();
    }

    /// Take one unit off a line, removing the line when it reaches zero.
    pub fn decrement_quantity(&self, id: ProductId) {
        self.items.send_modify(|items| {
            if let Some(existing) = items.iter_mut().find(|existing| existing.id == id) {
                existing.quantity = existing.quantity.saturating_sub(1);
            }
            items.retain(|existing| existing.quantity > 0);
        });
        self.compute_cart_totals();
    }

    /// Remove a line entirely.
    pub fn remove_item(&self, id: ProductId) {
        self.items
            .send_modify(|items| items.retain(|existing| existing.id != id));
        self.compute_cart_totals();
    }

    /// Recompute both totals from the current items and publish them.
    pub fn compute_cart_totals(&self) {
        let (price, quantity) = {
            let items = self.items.borrow();
            let price: Price = items.iter().map(CartItem::subtotal).sum();
            let quantity = items
                .iter()
                .fold(0_u32, |acc, item| acc.saturating_add(item.quantity));
            (price, quantity)
        };

        tracing::debug!(total_price = %price, total_quantity = quantity, "Cart totals computed");
        self.set_total_price(price);
        self.set_total_quantity(quantity);
    }

    /// Latest published total price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        *self.total_price.borrow()
    }

    /// Latest published total quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        *self.total_quantity.borrow()
    }

    /// Publish a new total price.
    pub fn set_total_price(&self, price: Price) {
        self.total_price.send_replace(price);
    }

    /// Publish a new total quantity.
    pub fn set_total_quantity(&self, quantity: u32) {
        self.total_quantity.send_replace(quantity);
    }

    /// Subscribe to total price changes.
    #[must_use]
    pub fn subscribe_total_price(&self) -> watch::Receiver<Price> {
        self.total_price.subscribe()
    }

    /// Subscribe to total quantity changes.
    #[must_use]
    pub fn subscribe_total_quantity(&self) -> watch::Receiver<u32> {
        self.total_quantity.subscribe()
    }

    /// Empty the cart and publish zero totals.
    pub fn clear(&self) {
        self.set_items(Vec::new());
        self.set_total_price(Price::ZERO);
        self.set_total_quantity(0);
    }
}
