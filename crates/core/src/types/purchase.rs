//! The purchase payload posted to the order API.
//!
//! Field names follow the backend's JSON contract (camelCase). Addresses carry
//! the region and country as plain display names: the structured reference
//! entities used by the form are flattened before they get here.

use serde::{Deserialize, Serialize};

use crate::{CartItem, Price, ProductId};

/// Who is placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A shipping or billing address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    /// Region display name. The backend calls this field `state`.
    #[serde(rename = "state")]
    pub region: String,
    /// Country display name.
    pub country: String,
    pub zip_code: String,
}

/// Order totals, copied from the cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub total_price: Price,
    pub total_quantity: u32,
}

/// A cart line as it appears in the purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Everything the backend needs to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub customer: Customer,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

/// Backend acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub order_tracking_number: String,
}
