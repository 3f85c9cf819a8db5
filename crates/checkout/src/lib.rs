//! Storefront checkout flow.
//!
//! This crate provides the checkout page's behavior as a library: the form
//! schema and its validation rules, reference data for the address and card
//! dropdowns, the shared cart store, and order submission against the
//! storefront's REST backend.
//!
//! # Modules
//!
//! - `cart` - Observable cart items and totals
//! - `controller` - `CheckoutController`, which drives one checkout
//! - `form` - Form controls, field groups and validators
//! - `services` - HTTP clients for reference data and orders
//! - `state` - Collaborators shared by every checkout
//! - `telemetry` - Tracing and Sentry setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod navigation;
pub mod services;
pub mod state;
pub mod telemetry;

pub use cart::CartStore;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CheckoutConfig, ConfigError, OrderApiConfig};
pub use controller::{CheckoutController, LookupOutcome, RegionLookup, SubmitOutcome};
pub use error::CheckoutError;
pub use navigation::Navigator;
pub use state::CheckoutServices;
