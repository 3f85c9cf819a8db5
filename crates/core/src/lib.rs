//! Checkout Core - Shared types library.
//!
//! This crate provides the types exchanged between the checkout flow and its
//! collaborators:
//! - reference entities (`Country`, `Region`) served by the backend
//! - cart lines held by the cart store
//! - the `Purchase` payload posted to the order API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Serde
//! derives on these types define the wire format the order backend expects.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, reference entities, cart and purchase types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
