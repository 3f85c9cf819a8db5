//! Checkout form model.
//!
//! # Modules
//!
//! - `validators` - Field rules (required, length, pattern, whitespace, digits)
//! - `control` - `FormControl` and the `FieldGroup` trait
//! - `checkout` - The four field groups and the assembled `CheckoutForm`

pub mod checkout;
pub mod control;
pub mod validators;

pub use checkout::{
    AddressGroup, AddressSection, AddressValue, CheckoutForm, CreditCardGroup, CustomerGroup,
    FormOptions,
};
pub use control::{Control, ControlValue, FieldGroup, FormControl};
pub use validators::{ValidationError, Validator};
