//! Collaborators shared by every checkout.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::clock::{Clock, SystemClock};
use crate::config::CheckoutConfig;
use crate::services::{HttpOrderClient, HttpReferenceDataClient, OrderSubmission, ReferenceData};

/// Configuration and collaborators handed to each checkout.
///
/// This struct is cheaply cloneable via `Arc`. The cart store is owned by
/// the application shell; the checkout only holds a reference to it.
#[derive(Clone)]
pub struct CheckoutServices {
    inner: Arc<CheckoutServicesInner>,
}

struct CheckoutServicesInner {
    config: CheckoutConfig,
    reference: Arc<dyn ReferenceData>,
    orders: Arc<dyn OrderSubmission>,
    cart: Arc<CartStore>,
    clock: Arc<dyn Clock>,
}

impl CheckoutServices {
    /// Wire the HTTP clients described by `config` around an existing cart.
    #[must_use]
    pub fn new(config: CheckoutConfig, cart: Arc<CartStore>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let reference = Arc::new(HttpReferenceDataClient::new(&config, Arc::clone(&clock)));
        let orders = Arc::new(HttpOrderClient::new(&config));
        Self::with_collaborators(config, reference, orders, cart, clock)
    }

    /// Assemble services from explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: CheckoutConfig,
        reference: Arc<dyn ReferenceData>,
        orders: Arc<dyn OrderSubmission>,
        cart: Arc<CartStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(CheckoutServicesInner {
                config,
                reference,
                orders,
                cart,
                clock,
            }),
        }
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get the reference data source.
    #[must_use]
    pub fn reference(&self) -> Arc<dyn ReferenceData> {
        Arc::clone(&self.inner.reference)
    }

    /// Get the order submission client.
    #[must_use]
    pub fn orders(&self) -> Arc<dyn OrderSubmission> {
        Arc::clone(&self.inner.orders)
    }

    /// Get the shared cart store.
    #[must_use]
    pub fn cart(&self) -> &Arc<CartStore> {
        &self.inner.cart
    }

    /// Get the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }
}
