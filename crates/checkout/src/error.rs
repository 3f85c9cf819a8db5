//! Unified error handling with Sentry integration.
//!
//! Collaborator failures are wrapped in [`CheckoutError`]. Transport and
//! server-side failures are captured to Sentry before they are shown to the
//! shopper; validation problems never are.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::orders::OrderError;
use crate::services::reference::ReferenceDataError;

/// Checkout-level error type.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Fetching countries, regions or card dates failed.
    #[error("Reference data error: {0}")]
    ReferenceData(#[from] ReferenceDataError),

    /// Placing the order failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A field needed to build the purchase has no value.
    #[error("Incomplete form: {0} has no value")]
    IncompleteForm(&'static str),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CheckoutError {
    /// The message to show the shopper.
    ///
    /// Order failures surface the backend's own message so the shopper can
    /// correct their input; everything else stays generic.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Order(err) => err.message(),
            Self::IncompleteForm(_) => "Please complete all required fields".to_string(),
            Self::ReferenceData(_) | Self::Config(_) => {
                "The checkout is temporarily unavailable".to_string()
            }
        }
    }

    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Order(err) => err.is_server_side(),
            Self::ReferenceData(_) | Self::Config(_) => true,
            Self::IncompleteForm(_) => false,
        }
    }

    /// Log the error and capture it to Sentry when reportable.
    ///
    /// Capturing is a no-op when Sentry has not been initialized.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Checkout error"
            );
        } else {
            tracing::warn!(error = %self, "Checkout rejected");
        }
    }
}

/// Result type alias for `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;
