//! Checkout flow orchestration.
//!
//! [`CheckoutController`] owns the form and the reference lists behind its
//! dropdowns. It reacts to shopper events (country changes, the "same as
//! shipping" toggle, expiry year changes), assembles the purchase on submit
//! and resets the cart once the backend accepts the order.
//!
//! Every method takes `&mut self`; the host drives one controller per
//! checkout from a single task. Region lookups can also be split into
//! [`CheckoutController::begin_region_lookup`] and
//! [`CheckoutController::complete_region_lookup`] when the host runs them
//! concurrently; only the latest lookup per address section is applied.

use std::sync::Arc;

use checkout_core::{Country, Order, OrderItem, Price, Purchase, Region};
use chrono::{Datelike, NaiveDate};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::error::CheckoutError;
use crate::form::{AddressSection, CheckoutForm, FieldGroup, FormOptions};
use crate::navigation::Navigator;
use crate::services::ReferenceDataError;
use crate::state::CheckoutServices;

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form has invalid fields; nothing was sent.
    Invalid { fields: Vec<String> },
    /// The backend accepted the order.
    Placed { tracking_number: String },
    /// The order could not be placed; form and cart are untouched.
    Failed { message: String },
}

/// A region lookup in flight for one address section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLookup {
    section: AddressSection,
    sequence: u64,
    country_code: String,
}

impl RegionLookup {
    /// The address section that triggered the lookup.
    #[must_use]
    pub const fn section(&self) -> AddressSection {
        self.section
    }

    /// The country whose regions are requested.
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

/// What happened to a completed region lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The regions replaced the section's list.
    Applied,
    /// A newer lookup was issued for the section; the response was dropped.
    Stale,
    /// The fetch failed; the section's list is unchanged.
    Failed,
    /// No country is selected in the section, so nothing was fetched.
    Skipped,
}

/// Region list for one address section plus the latest lookup issued for it.
#[derive(Debug, Default)]
struct RegionList {
    regions: Vec<Region>,
    latest: u64,
}

impl RegionList {
    fn issue(&mut self) -> u64 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }
}

/// First card expiry month selectable for `selected_year`.
///
/// Months already past are excluded only when the current year is selected.
#[must_use]
pub fn start_month_for(today: NaiveDate, selected_year: Option<i32>) -> u32 {
    if selected_year == Some(today.year()) {
        today.month()
    } else {
        1
    }
}

/// Drives one checkout from an empty form to a placed order.
pub struct CheckoutController {
    services: CheckoutServices,
    navigator: Arc<dyn Navigator>,
    form: CheckoutForm,
    credit_card_months: Vec<u32>,
    credit_card_years: Vec<i32>,
    countries: Vec<Country>,
    shipping_regions: RegionList,
    billing_regions: RegionList,
    total_price: watch::Receiver<Price>,
    total_quantity: watch::Receiver<u32>,
    notice: Option<String>,
}

impl CheckoutController {
    /// Build the form and subscribe to the cart totals.
    ///
    /// Reference lists stay empty until [`init`](Self::init) runs.
    #[must_use]
    pub fn new(services: CheckoutServices, navigator: Arc<dyn Navigator>) -> Self {
        let form = CheckoutForm::new(FormOptions {
            strict_billing_zip: services.config().strict_billing_zip,
        });
        let total_price = services.cart().subscribe_total_price();
        let total_quantity = services.cart().subscribe_total_quantity();

        Self {
            services,
            navigator,
            form,
            credit_card_months: Vec::new(),
            credit_card_years: Vec::new(),
            countries: Vec::new(),
            shipping_regions: RegionList::default(),
            billing_regions: RegionList::default(),
            total_price,
            total_quantity,
            notice: None,
        }
    }

    /// Load card expiry months and years and the country list.
    ///
    /// The three fetches run concurrently and are applied independently; a
    /// failed fetch is reported and leaves its list empty.
    #[instrument(skip(self))]
    pub async fn init(&mut self) {
        let start_month = self.services.clock().today().month();
        debug!(start_month, "Loading checkout reference data");

        let reference = self.services.reference();
        let (months, years, countries) = tokio::join!(
            reference.credit_card_months(start_month),
            reference.credit_card_years(),
            reference.countries(),
        );

        match months {
            Ok(months) => {
                debug!(?months, "Retrieved credit card months");
                self.credit_card_months = months;
            }
            Err(err) => CheckoutError::from(err).report(),
        }
        match years {
            Ok(years) => {
                debug!(?years, "Retrieved credit card years");
                self.credit_card_years = years;
            }
            Err(err) => CheckoutError::from(err).report(),
        }
        match countries {
            Ok(countries) => {
                debug!(count = countries.len(), "Retrieved countries");
                self.countries = countries;
            }
            Err(err) => CheckoutError::from(err).report(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The checkout form.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Mutable access to the checkout form, for shopper input.
    pub const fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    /// Selectable card expiry months.
    #[must_use]
    pub fn credit_card_months(&self) -> &[u32] {
        &self.credit_card_months
    }

    /// Selectable card expiry years.
    #[must_use]
    pub fn credit_card_years(&self) -> &[i32] {
        &self.credit_card_years
    }

    /// Selectable countries.
    #[must_use]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Selectable regions for an address section.
    #[must_use]
    pub fn regions(&self, section: AddressSection) -> &[Region] {
        &self.region_list(section).regions
    }

    /// Latest published cart total price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        *self.total_price.borrow()
    }

    /// Latest published cart total quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        *self.total_quantity.borrow()
    }

    /// The last message shown to the shopper, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    const fn region_list(&self, section: AddressSection) -> &RegionList {
        match section {
            AddressSection::Shipping => &self.shipping_regions,
            AddressSection::Billing => &self.billing_regions,
        }
    }

    const fn region_list_mut(&mut self, section: AddressSection) -> &mut RegionList {
        match section {
            AddressSection::Shipping => &mut self.shipping_regions,
            AddressSection::Billing => &mut self.billing_regions,
        }
    }

    // =========================================================================
    // Card expiry
    // =========================================================================

    /// Select an expiry year and recompute the selectable months.
    pub async fn select_expiration_year(&mut self, year: i32) {
        self.form.credit_card.expiration_year.input(Some(year));
        self.handle_months_and_years().await;
    }

    /// Recompute selectable months for the currently selected expiry year.
    #[instrument(skip(self))]
    pub async fn handle_months_and_years(&mut self) {
        let today = self.services.clock().today();
        let selected_year = *self.form.credit_card.expiration_year.value();
        let start_month = start_month_for(today, selected_year);

        match self.services.reference().credit_card_months(start_month).await {
            Ok(months) => {
                debug!(start_month, ?months, "Retrieved credit card months");
                self.credit_card_months = months;
            }
            Err(err) => CheckoutError::from(err).report(),
        }
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Select a country for an address section and reload its regions.
    pub async fn select_country(&mut self, section: AddressSection, country: Country) {
        self.form.address_mut(section).country.input(Some(country));
        self.get_regions(section).await;
    }

    /// Reload the regions of the country selected in `section`.
    ///
    /// On success the region list is replaced and the region field defaults
    /// to the first entry.
    #[instrument(skip(self), fields(section = %section))]
    pub async fn get_regions(&mut self, section: AddressSection) -> LookupOutcome {
        let Some(lookup) = self.begin_region_lookup(section) else {
            debug!("No country selected, skipping region lookup");
            return LookupOutcome::Skipped;
        };

        let result = self
            .services
            .reference()
            .regions(lookup.country_code())
            .await;
        self.complete_region_lookup(lookup, result)
    }

    /// Issue a region lookup for the country selected in `section`.
    ///
    /// Returns `None` when no country is selected. Issuing a lookup makes
    /// every earlier lookup for the same section stale.
    pub fn begin_region_lookup(&mut self, section: AddressSection) -> Option<RegionLookup> {
        let country = self.form.address(section).country.value().clone()?;
        debug!(
            section = %section,
            country_code = %country.code,
            country_name = %country.name,
            "Looking up regions"
        );

        let sequence = self.region_list_mut(section).issue();
        Some(RegionLookup {
            section,
            sequence,
            country_code: country.code,
        })
    }

    /// Apply the response to a region lookup, unless a newer one was issued.
    pub fn complete_region_lookup(
        &mut self,
        lookup: RegionLookup,
        result: Result<Vec<Region>, ReferenceDataError>,
    ) -> LookupOutcome {
        let section = lookup.section;
        if self.region_list(section).latest != lookup.sequence {
            debug!(
                section = %section,
                country_code = %lookup.country_code,
                "Discarding stale region response"
            );
            return LookupOutcome::Stale;
        }

        match result {
            Ok(regions) => {
                debug!(section = %section, count = regions.len(), "Retrieved regions");
                let first = regions.first().cloned();
                self.region_list_mut(section).regions = regions;
                self.form.address_mut(section).region.set_value(first);
                LookupOutcome::Applied
            }
            Err(err) => {
                CheckoutError::from(err).report();
                LookupOutcome::Failed
            }
        }
    }

    // =========================================================================
    // Billing address
    // =========================================================================

    /// Apply the "billing address same as shipping" checkbox.
    ///
    /// Checked copies the shipping address and its region list into billing
    /// as they are right now; unchecked clears both. Either way any billing
    /// region lookup still in flight is superseded.
    pub fn copy_shipping_address_to_billing_address(&mut self, checked: bool) {
        if checked {
            let shipping = self.form.shipping_address.value();
            self.form.billing_address.set_value(shipping);
            self.billing_regions.regions = self.shipping_regions.regions.clone();
        } else {
            self.form.billing_address.reset();
            self.billing_regions.regions.clear();
        }
        self.billing_regions.issue();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Build the purchase from the form and the cart.
    ///
    /// Order lines follow cart order. Region and country are flattened to
    /// their display names.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteForm`] if a region or country is
    /// not selected.
    pub fn assemble_purchase(&self) -> Result<Purchase, CheckoutError> {
        let order = Order {
            total_price: self.total_price(),
            total_quantity: self.total_quantity(),
        };
        let order_items = self
            .services
            .cart()
            .items()
            .iter()
            .map(OrderItem::from)
            .collect();

        Ok(Purchase {
            customer: self.form.customer.value(),
            shipping_address: self
                .form
                .shipping_address
                .value()
                .into_address(AddressSection::Shipping)?,
            billing_address: self
                .form
                .billing_address
                .value()
                .into_address(AddressSection::Billing)?,
            order,
            order_items,
        })
    }

    /// Validate the form and place the order.
    ///
    /// An invalid form marks every field as touched and sends nothing. On
    /// success the cart is reset and the shopper is sent to the product
    /// listing; on failure form and cart stay as they are so the shopper can
    /// retry.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        info!("Handling checkout submission");

        if !self.form.is_valid() {
            self.form.mark_all_as_touched();
            let fields = self.form.invalid_fields();
            debug!(?fields, "Checkout form is invalid");
            return SubmitOutcome::Invalid { fields };
        }

        let purchase = match self.assemble_purchase() {
            Ok(purchase) => purchase,
            Err(err) => return self.fail(&err),
        };

        match self.services.orders().place_order(&purchase).await {
            Ok(response) => {
                let tracking_number = response.order_tracking_number;
                info!(tracking_number = %tracking_number, "Order placed");
                self.notice = Some(format!(
                    "Your order has been received.\nOrder tracking number: {tracking_number}"
                ));
                self.reset_cart();
                SubmitOutcome::Placed { tracking_number }
            }
            Err(err) => self.fail(&CheckoutError::from(err)),
        }
    }

    fn fail(&mut self, err: &CheckoutError) -> SubmitOutcome {
        err.report();
        let message = err.user_message();
        self.notice = Some(format!("There was an error: {message}"));
        SubmitOutcome::Failed { message }
    }

    /// Empty the cart, publish zero totals, clear the form and navigate to
    /// the product listing.
    pub fn reset_cart(&mut self) {
        self.services.cart().clear();
        self.form.reset();

        let path = &self.services.config().product_listing_path;
        debug!(path = %path, "Navigating after checkout");
        self.navigator.navigate_by_url(path);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use checkout_core::{CartItem, ProductId, PurchaseResponse};
    use url::Url;

    use super::*;
    use crate::cart::CartStore;
    use crate::clock::FixedClock;
    use crate::config::CheckoutConfig;
    use crate::services::reference::months_from;
    use crate::services::{OrderError, OrderSubmission, ReferenceData};

    struct FakeReference {
        regions: HashMap<String, Vec<Region>>,
    }

    #[async_trait]
    impl ReferenceData for FakeReference {
        async fn credit_card_months(
            &self,
            start_month: u32,
        ) -> Result<Vec<u32>, ReferenceDataError> {
            months_from(start_month)
        }

        async fn credit_card_years(&self) -> Result<Vec<i32>, ReferenceDataError> {
            Ok(vec![2026, 2027, 2028])
        }

        async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError> {
            Err(ReferenceDataError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }

        async fn regions(&self, country_code: &str) -> Result<Vec<Region>, ReferenceDataError> {
            Ok(self.regions.get(country_code).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct FakeOrders {
        calls: AtomicUsize,
        reject: bool,
    }

    #[async_trait]
    impl OrderSubmission for FakeOrders {
        async fn place_order(&self, _purchase: &Purchase) -> Result<PurchaseResponse, OrderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(OrderError::Api {
                    status: 400,
                    message: "Card declined".to_string(),
                });
            }
            Ok(PurchaseResponse {
                order_tracking_number: "TRK123".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_by_url(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    struct Harness {
        controller: CheckoutController,
        cart: Arc<CartStore>,
        orders: Arc<FakeOrders>,
        navigator: Arc<RecordingNavigator>,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn harness(reject: bool) -> Harness {
        let config = CheckoutConfig::new(Url::parse("http://localhost:8080/api").unwrap());
        let reference = Arc::new(FakeReference {
            regions: HashMap::from([
                (
                    "IT".to_string(),
                    vec![Region::new("LAZ", "Lazio"), Region::new("LOM", "Lombardia")],
                ),
                ("FR".to_string(), vec![Region::new("IDF", "Île-de-France")]),
            ]),
        });
        let orders = Arc::new(FakeOrders {
            calls: AtomicUsize::new(0),
            reject,
        });
        let cart = Arc::new(CartStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let services = CheckoutServices::with_collaborators(
            config,
            reference,
            orders.clone(),
            Arc::clone(&cart),
            Arc::new(FixedClock(today())),
        );

        Harness {
            controller: CheckoutController::new(services, navigator.clone()),
            cart,
            orders,
            navigator,
        }
    }

    async fn fill_valid_form(controller: &mut CheckoutController) {
        let form = controller.form_mut();
        form.customer.first_name.input("Mario".to_string());
        form.customer.last_name.input("Rossi".to_string());
        form.customer.email.input("mario.rossi@example.it".to_string());
        form.shipping_address.street.input("Via Roma 1".to_string());
        form.shipping_address.city.input("Roma".to_string());
        form.shipping_address.zip_code.input("00184".to_string());
        form.credit_card.card_type.input("Visa".to_string());
        form.credit_card.name_on_card.input("Mario Rossi".to_string());
        form.credit_card.card_number.input("4111111111111111".to_string());
        form.credit_card.security_code.input("123".to_string());

        controller
            .select_country(AddressSection::Shipping, Country::new("IT", "Italy"))
            .await;
        controller.copy_shipping_address_to_billing_address(true);
    }

    #[test]
    fn test_start_month_for_current_and_future_years() {
        assert_eq!(start_month_for(today(), Some(2026)), 10);
        assert_eq!(start_month_for(today(), Some(2027)), 1);
        assert_eq!(start_month_for(today(), None), 1);
    }

    #[tokio::test]
    async fn test_init_applies_each_fetch_independently() {
        let mut h = harness(false);
        h.controller.init().await;

        assert_eq!(h.controller.credit_card_months(), &[10, 11, 12]);
        assert_eq!(h.controller.credit_card_years(), &[2026, 2027, 2028]);
        assert!(h.controller.countries().is_empty());
    }

    #[tokio::test]
    async fn test_selecting_year_recomputes_months() {
        let mut h = harness(false);
        h.controller.select_expiration_year(2027).await;
        assert_eq!(h.controller.credit_card_months().len(), 12);

        h.controller.select_expiration_year(2026).await;
        assert_eq!(h.controller.credit_card_months(), &[10, 11, 12]);
    }

    #[tokio::test]
    async fn test_country_change_defaults_first_region() {
        let mut h = harness(false);
        h.controller
            .select_country(AddressSection::Shipping, Country::new("IT", "Italy"))
            .await;

        assert_eq!(h.controller.regions(AddressSection::Shipping).len(), 2);
        assert_eq!(
            h.controller.form().shipping_address.region.value(),
            &Some(Region::new("LAZ", "Lazio"))
        );
        assert!(h.controller.regions(AddressSection::Billing).is_empty());

        h.controller
            .select_country(AddressSection::Shipping, Country::new("FR", "France"))
            .await;
        assert_eq!(
            h.controller.form().shipping_address.region.value(),
            &Some(Region::new("IDF", "Île-de-France"))
        );
    }

    #[tokio::test]
    async fn test_country_without_regions_clears_region() {
        let mut h = harness(false);
        h.controller
            .select_country(AddressSection::Billing, Country::new("VA", "Vatican City"))
            .await;

        assert!(h.controller.regions(AddressSection::Billing).is_empty());
        assert_eq!(h.controller.form().billing_address.region.value(), &None);
    }

    #[test]
    fn test_stale_region_response_is_discarded() {
        let mut h = harness(false);
        let form = h.controller.form_mut();
        form.shipping_address
            .country
            .input(Some(Country::new("IT", "Italy")));
        let first = h
            .controller
            .begin_region_lookup(AddressSection::Shipping)
            .unwrap();

        h.controller
            .form_mut()
            .shipping_address
            .country
            .input(Some(Country::new("FR", "France")));
        let second = h
            .controller
            .begin_region_lookup(AddressSection::Shipping)
            .unwrap();

        let outcome = h.controller.complete_region_lookup(
            second,
            Ok(vec![Region::new("IDF", "Île-de-France")]),
        );
        assert_eq!(outcome, LookupOutcome::Applied);

        let outcome = h
            .controller
            .complete_region_lookup(first, Ok(vec![Region::new("LAZ", "Lazio")]));
        assert_eq!(outcome, LookupOutcome::Stale);
        assert_eq!(
            h.controller.regions(AddressSection::Shipping),
            &[Region::new("IDF", "Île-de-France")]
        );
    }

    #[test]
    fn test_failed_region_lookup_keeps_list() {
        let mut h = harness(false);
        h.controller
            .form_mut()
            .billing_address
            .country
            .input(Some(Country::new("IT", "Italy")));
        let lookup = h
            .controller
            .begin_region_lookup(AddressSection::Billing)
            .unwrap();

        let outcome = h.controller.complete_region_lookup(
            lookup,
            Err(ReferenceDataError::Parse("bad json".to_string())),
        );
        assert_eq!(outcome, LookupOutcome::Failed);
        assert!(h.controller.regions(AddressSection::Billing).is_empty());
    }

    #[tokio::test]
    async fn test_copy_toggle_copies_and_clears() {
        let mut h = harness(false);
        fill_valid_form(&mut h.controller).await;

        assert_eq!(
            h.controller.form().billing_address.value(),
            h.controller.form().shipping_address.value()
        );
        assert_eq!(
            h.controller.regions(AddressSection::Billing),
            h.controller.regions(AddressSection::Shipping)
        );

        h.controller.copy_shipping_address_to_billing_address(false);
        assert_eq!(
            h.controller.form().billing_address.value(),
            crate::form::AddressValue::default()
        );
        assert!(h.controller.regions(AddressSection::Billing).is_empty());
        assert!(!h.controller.form().billing_address.street.touched());
    }

    #[tokio::test]
    async fn test_copy_toggle_does_not_track_later_edits() {
        let mut h = harness(false);
        fill_valid_form(&mut h.controller).await;
        h.controller
            .form_mut()
            .shipping_address
            .city
            .input("Milano".to_string());

        assert_eq!(h.controller.form().billing_address.city.value(), "Roma");
    }

    #[tokio::test]
    async fn test_copy_toggle_supersedes_billing_lookup() {
        let mut h = harness(false);
        fill_valid_form(&mut h.controller).await;
        let lookup = h
            .controller
            .begin_region_lookup(AddressSection::Billing)
            .unwrap();

        h.controller.copy_shipping_address_to_billing_address(true);
        let outcome = h.controller.complete_region_lookup(lookup, Ok(Vec::new()));
        assert_eq!(outcome, LookupOutcome::Stale);
        assert_eq!(h.controller.regions(AddressSection::Billing).len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_submit_touches_fields_and_sends_nothing() {
        let mut h = harness(false);
        h.cart.add_item(CartItem::new(
            ProductId::new(1),
            "Mug",
            "mug.png",
            Price::from_cents(1000),
        ));

        let outcome = h.controller.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Invalid { ref fields } if fields.contains(&"customer.email".to_string())));
        assert!(h.controller.form().customer.email.touched());
        assert_eq!(h.orders.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.cart.items().len(), 1);
        assert!(h.controller.notice().is_none());
    }

    #[tokio::test]
    async fn test_assemble_purchase_flattens_and_preserves_order() {
        let mut h = harness(false);
        h.cart.add_item(CartItem::new(
            ProductId::new(1),
            "Mug",
            "mug.png",
            Price::from_cents(1000),
        ));
        h.cart.add_item(
            CartItem::new(ProductId::new(2), "Pen", "pen.png", Price::from_cents(500))
                .with_quantity(2),
        );
        fill_valid_form(&mut h.controller).await;

        let purchase = h.controller.assemble_purchase().unwrap();

        assert_eq!(purchase.customer.first_name, "Mario");
        assert_eq!(purchase.shipping_address.region, "Lazio");
        assert_eq!(purchase.shipping_address.country, "Italy");
        assert_eq!(purchase.billing_address, purchase.shipping_address);
        assert_eq!(purchase.order.total_quantity, 3);
        assert_eq!(purchase.order.total_price, Price::from_cents(2000));
        let ids: Vec<_> = purchase.order_items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_navigates() {
        let mut h = harness(false);
        h.cart.add_item(CartItem::new(
            ProductId::new(1),
            "Mug",
            "mug.png",
            Price::from_cents(1000),
        ));
        fill_valid_form(&mut h.controller).await;

        let outcome = h.controller.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Placed {
                tracking_number: "TRK123".to_string()
            }
        );
        assert!(h.controller.notice().unwrap().contains("TRK123"));
        assert!(h.cart.items().is_empty());
        assert_eq!(h.controller.total_price(), Price::ZERO);
        assert_eq!(h.controller.total_quantity(), 0);
        assert_eq!(h.controller.form().customer.first_name.value(), "");
        assert_eq!(*h.navigator.paths.lock().unwrap(), vec!["/products"]);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_state_for_retry() {
        let mut h = harness(true);
        h.cart.add_item(CartItem::new(
            ProductId::new(1),
            "Mug",
            "mug.png",
            Price::from_cents(1000),
        ));
        fill_valid_form(&mut h.controller).await;

        let outcome = h.controller.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Card declined".to_string()
            }
        );
        assert_eq!(
            h.controller.notice(),
            Some("There was an error: Card declined")
        );
        assert_eq!(h.cart.items().len(), 1);
        assert_eq!(h.controller.form().customer.first_name.value(), "Mario");
        assert!(h.navigator.paths.lock().unwrap().is_empty());

        let retry = h.controller.submit().await;
        assert!(matches!(retry, SubmitOutcome::Failed { .. }));
        assert_eq!(h.orders.calls.load(Ordering::SeqCst), 2);
    }
}
