//! Core types for the checkout flow.

pub mod cart;
pub mod id;
pub mod price;
pub mod purchase;
pub mod reference;

pub use cart::CartItem;
pub use id::ProductId;
pub use price::{Price, PriceError};
pub use purchase::{Address, Customer, Order, OrderItem, Purchase, PurchaseResponse};
pub use reference::{Country, Region};
