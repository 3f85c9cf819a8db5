//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// One product line in the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Product image URL.
    pub image_url: String,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Number of units.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line with a quantity of one.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: Price,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: image_url.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// Set the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}
