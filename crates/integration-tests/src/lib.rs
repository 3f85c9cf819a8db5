//! Integration tests for the storefront checkout.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process checkout flow against recorded collaborators
//! cargo test -p checkout-integration-tests
//!
//! # Including tests against a running backend
//! CHECKOUT_API_BASE_URL=http://localhost:8080/api \
//!     cargo test -p checkout-integration-tests -- --ignored
//! ```
//!
//! This library holds the in-memory collaborators the flow tests wire into a
//! [`CheckoutController`]: a reference data source with canned countries and
//! regions, an order backend that records every purchase, and a navigator
//! that records every path.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use checkout_core::{Country, Purchase, PurchaseResponse, Region};
use checkout_storefront::services::reference::{months_from, years_from};
use checkout_storefront::services::{OrderError, OrderSubmission, ReferenceData, ReferenceDataError};
use checkout_storefront::{
    CartStore, CheckoutConfig, CheckoutController, CheckoutServices, FixedClock, Navigator,
};
use chrono::{Datelike, NaiveDate};
use url::Url;

/// The date every test checkout runs on.
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

// ============================================================================
// Reference data
// ============================================================================

/// Canned countries and regions. Records every region lookup.
pub struct FakeReferenceData {
    countries: Vec<Country>,
    regions: HashMap<String, Vec<Region>>,
    region_calls: Mutex<Vec<String>>,
    unavailable: bool,
}

impl FakeReferenceData {
    /// Italy, France and the United States, with regions for the first two.
    #[must_use]
    pub fn new() -> Self {
        Self {
            countries: vec![
                Country::new("IT", "Italy"),
                Country::new("FR", "France"),
                Country::new("US", "United States"),
            ],
            regions: HashMap::from([
                (
                    "IT".to_string(),
                    vec![
                        Region::new("LAZ", "Lazio"),
                        Region::new("LOM", "Lombardia"),
                        Region::new("TOS", "Toscana"),
                    ],
                ),
                (
                    "FR".to_string(),
                    vec![
                        Region::new("IDF", "Île-de-France"),
                        Region::new("OCC", "Occitanie"),
                    ],
                ),
            ]),
            region_calls: Mutex::new(Vec::new()),
            unavailable: false,
        }
    }

    /// A source whose every request fails with a 503.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Country codes passed to `regions`, in call order.
    #[must_use]
    pub fn region_calls(&self) -> Vec<String> {
        self.region_calls.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), ReferenceDataError> {
        if self.unavailable {
            return Err(ReferenceDataError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for FakeReferenceData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferenceData for FakeReferenceData {
    async fn credit_card_months(&self, start_month: u32) -> Result<Vec<u32>, ReferenceDataError> {
        self.check_available()?;
        months_from(start_month)
    }

    async fn credit_card_years(&self) -> Result<Vec<i32>, ReferenceDataError> {
        self.check_available()?;
        Ok(years_from(today().year(), 11))
    }

    async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError> {
        self.check_available()?;
        Ok(self.countries.clone())
    }

    async fn regions(&self, country_code: &str) -> Result<Vec<Region>, ReferenceDataError> {
        self.region_calls
            .lock()
            .unwrap()
            .push(country_code.to_string());
        self.check_available()?;
        Ok(self.regions.get(country_code).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Orders
// ============================================================================

/// How the fake backend answers a purchase.
#[derive(Debug, Clone)]
pub enum OrderReply {
    Accept { tracking_number: String },
    Reject { status: u16, message: String },
}

/// An order backend that records every purchase it receives.
pub struct FakeOrders {
    reply: OrderReply,
    received: Mutex<Vec<Purchase>>,
}

impl FakeOrders {
    /// Accept every purchase with the given tracking number.
    #[must_use]
    pub fn accepting(tracking_number: &str) -> Self {
        Self::replying(OrderReply::Accept {
            tracking_number: tracking_number.to_string(),
        })
    }

    /// Reject every purchase with the given status and message.
    #[must_use]
    pub fn rejecting(status: u16, message: &str) -> Self {
        Self::replying(OrderReply::Reject {
            status,
            message: message.to_string(),
        })
    }

    fn replying(reply: OrderReply) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Every purchase received so far.
    #[must_use]
    pub fn received(&self) -> Vec<Purchase> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSubmission for FakeOrders {
    async fn place_order(&self, purchase: &Purchase) -> Result<PurchaseResponse, OrderError> {
        self.received.lock().unwrap().push(purchase.clone());
        match &self.reply {
            OrderReply::Accept { tracking_number } => Ok(PurchaseResponse {
                order_tracking_number: tracking_number.clone(),
            }),
            OrderReply::Reject { status, message } => Err(OrderError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Records every navigation request.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Paths navigated to, in order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_by_url(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

// ============================================================================
// Test context
// ============================================================================

/// A checkout wired to in-memory collaborators.
pub struct TestContext {
    pub controller: CheckoutController,
    pub cart: Arc<CartStore>,
    pub reference: Arc<FakeReferenceData>,
    pub orders: Arc<FakeOrders>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestContext {
    /// A checkout whose backend accepts every order as `TRK123`.
    #[must_use]
    pub fn new() -> Self {
        Self::with(FakeReferenceData::new(), FakeOrders::accepting("TRK123"))
    }

    /// A checkout with explicit reference data and order backend.
    #[must_use]
    pub fn with(reference: FakeReferenceData, orders: FakeOrders) -> Self {
        checkout_storefront::telemetry::try_init_for_tests();

        let config = CheckoutConfig::new(Url::parse("http://localhost:8080/api").unwrap());
        let reference = Arc::new(reference);
        let orders = Arc::new(orders);
        let cart = Arc::new(CartStore::new());
        let navigator = Arc::new(RecordingNavigator::default());

        let services = CheckoutServices::with_collaborators(
            config,
            Arc::clone(&reference) as Arc<dyn ReferenceData>,
            Arc::clone(&orders) as Arc<dyn OrderSubmission>,
            Arc::clone(&cart),
            Arc::new(FixedClock(today())),
        );
        let controller =
            CheckoutController::new(services, Arc::clone(&navigator) as Arc<dyn Navigator>);

        Self {
            controller,
            cart,
            reference,
            orders,
            navigator,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
