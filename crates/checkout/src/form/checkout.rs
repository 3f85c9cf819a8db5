//! The checkout form schema.
//!
//! Four field groups: customer, shipping address, billing address and credit
//! card. Each control is created empty with its rules attached; the form is
//! built once per checkout and cleared after a successful order.

use checkout_core::{Address, Country, Customer, Region};

use super::control::{Control, FieldGroup, FormControl};
use super::validators::{
    CARD_NUMBER_PATTERN, EMAIL_PATTERN, SECURITY_CODE_PATTERN, Validator,
};
use crate::error::CheckoutError;

/// Minimum length of names, streets, cities and zip codes.
const MIN_TEXT_LENGTH: usize = 2;

/// Required, at least two characters, not blank.
fn text_rules() -> Vec<Validator> {
    vec![
        Validator::Required,
        Validator::MinLength(MIN_TEXT_LENGTH),
        Validator::NotOnlyWhitespace,
    ]
}

/// Schema switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Apply the numeric rule to billing zip codes as well as shipping ones.
    pub strict_billing_zip: bool,
}

// =============================================================================
// Customer
// =============================================================================

/// Who is placing the order.
#[derive(Debug, Clone)]
pub struct CustomerGroup {
    pub first_name: FormControl<String>,
    pub last_name: FormControl<String>,
    pub email: FormControl<String>,
}

impl CustomerGroup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            first_name: FormControl::new(text_rules()),
            last_name: FormControl::new(text_rules()),
            email: FormControl::new(vec![
                Validator::Required,
                Validator::Pattern(&EMAIL_PATTERN),
                Validator::NotOnlyWhitespace,
            ]),
        }
    }

    /// The group's raw value.
    #[must_use]
    pub fn value(&self) -> Customer {
        Customer {
            first_name: self.first_name.value().clone(),
            last_name: self.last_name.value().clone(),
            email: self.email.value().clone(),
        }
    }
}

impl Default for CustomerGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldGroup for CustomerGroup {
    fn name(&self) -> &'static str {
        "customer"
    }

    fn controls(&self) -> Vec<(&'static str, &dyn Control)> {
        let controls: [(&'static str, &dyn Control); 3] = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
        ];
        controls.into()
    }

    fn controls_mut(&mut self) -> Vec<&mut dyn Control> {
        let controls: [&mut dyn Control; 3] =
            [&mut self.first_name, &mut self.last_name, &mut self.email];
        controls.into()
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// Which address group an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSection {
    Shipping,
    Billing,
}

impl AddressSection {
    /// Group name as it appears in field paths.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Self::Shipping => "shippingAddress",
            Self::Billing => "billingAddress",
        }
    }

    const fn region_path(self) -> &'static str {
        match self {
            Self::Shipping => "shippingAddress.region",
            Self::Billing => "billingAddress.region",
        }
    }

    const fn country_path(self) -> &'static str {
        match self {
            Self::Shipping => "shippingAddress.country",
            Self::Billing => "billingAddress.country",
        }
    }
}

impl std::fmt::Display for AddressSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.group_name())
    }
}

/// The raw value of an address group, with structured region and country.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressValue {
    pub street: String,
    pub city: String,
    pub region: Option<Region>,
    pub country: Option<Country>,
    pub zip_code: String,
}

impl AddressValue {
    /// Flatten region and country to their display names.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteForm`] if either selection is missing.
    pub fn into_address(self, section: AddressSection) -> Result<Address, CheckoutError> {
        let region = self
            .region
            .ok_or(CheckoutError::IncompleteForm(section.region_path()))?;
        let country = self
            .country
            .ok_or(CheckoutError::IncompleteForm(section.country_path()))?;

        Ok(Address {
            street: self.street,
            city: self.city,
            region: region.name,
            country: country.name,
            zip_code: self.zip_code,
        })
    }
}

/// A shipping or billing address.
#[derive(Debug, Clone)]
pub struct AddressGroup {
    section: AddressSection,
    pub street: FormControl<String>,
    pub city: FormControl<String>,
    pub region: FormControl<Option<Region>>,
    pub country: FormControl<Option<Country>>,
    pub zip_code: FormControl<String>,
}

impl AddressGroup {
    /// Build an address group. `numeric_zip` adds the digits-only zip rule.
    #[must_use]
    pub fn new(section: AddressSection, numeric_zip: bool) -> Self {
        let mut zip_rules = vec![Validator::Required, Validator::MinLength(MIN_TEXT_LENGTH)];
        if numeric_zip {
            zip_rules.push(Validator::Numeric);
        }
        zip_rules.push(Validator::NotOnlyWhitespace);

        Self {
            section,
            street: FormControl::new(text_rules()),
            city: FormControl::new(text_rules()),
            region: FormControl::new(vec![Validator::Required]),
            country: FormControl::new(vec![Validator::Required]),
            zip_code: FormControl::new(zip_rules),
        }
    }

    /// Which address this group holds.
    #[must_use]
    pub const fn section(&self) -> AddressSection {
        self.section
    }

    /// The group's raw value.
    #[must_use]
    pub fn value(&self) -> AddressValue {
        AddressValue {
            street: self.street.value().clone(),
            city: self.city.value().clone(),
            region: self.region.value().clone(),
            country: self.country.value().clone(),
            zip_code: self.zip_code.value().clone(),
        }
    }

    /// Overwrite every control's value. Interaction flags are untouched.
    pub fn set_value(&mut self, value: AddressValue) {
        self.street.set_value(value.street);
        self.city.set_value(value.city);
        self.region.set_value(value.region);
        self.country.set_value(value.country);
        self.zip_code.set_value(value.zip_code);
    }
}

impl FieldGroup for AddressGroup {
    fn name(&self) -> &'static str {
        self.section.group_name()
    }

    fn controls(&self) -> Vec<(&'static str, &dyn Control)> {
        let controls: [(&'static str, &dyn Control); 5] = [
            ("street", &self.street),
            ("city", &self.city),
            ("region", &self.region),
            ("country", &self.country),
            ("zipCode", &self.zip_code),
        ];
        controls.into()
    }

    fn controls_mut(&mut self) -> Vec<&mut dyn Control> {
        let controls: [&mut dyn Control; 5] = [
            &mut self.street,
            &mut self.city,
            &mut self.region,
            &mut self.country,
            &mut self.zip_code,
        ];
        controls.into()
    }
}

// =============================================================================
// Credit card
// =============================================================================

/// Payment card details. Expiry month and year come from constrained lists
/// and carry no rules.
#[derive(Debug, Clone)]
pub struct CreditCardGroup {
    pub card_type: FormControl<String>,
    pub name_on_card: FormControl<String>,
    pub card_number: FormControl<String>,
    pub security_code: FormControl<String>,
    pub expiration_month: FormControl<Option<u32>>,
    pub expiration_year: FormControl<Option<i32>>,
}

impl CreditCardGroup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            card_type: FormControl::new(vec![Validator::Required]),
            name_on_card: FormControl::new(text_rules()),
            card_number: FormControl::new(vec![
                Validator::Required,
                Validator::Pattern(&CARD_NUMBER_PATTERN),
                Validator::NotOnlyWhitespace,
            ]),
            security_code: FormControl::new(vec![
                Validator::Required,
                Validator::Pattern(&SECURITY_CODE_PATTERN),
            ]),
            expiration_month: FormControl::unvalidated(),
            expiration_year: FormControl::unvalidated(),
        }
    }
}

impl Default for CreditCardGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldGroup for CreditCardGroup {
    fn name(&self) -> &'static str {
        "creditCard"
    }

    fn controls(&self) -> Vec<(&'static str, &dyn Control)> {
        let controls: [(&'static str, &dyn Control); 6] = [
            ("cardType", &self.card_type),
            ("nameOnCard", &self.name_on_card),
            ("cardNumber", &self.card_number),
            ("securityCode", &self.security_code),
            ("expirationMonth", &self.expiration_month),
            ("expirationYear", &self.expiration_year),
        ];
        controls.into()
    }

    fn controls_mut(&mut self) -> Vec<&mut dyn Control> {
        let controls: [&mut dyn Control; 6] = [
            &mut self.card_type,
            &mut self.name_on_card,
            &mut self.card_number,
            &mut self.security_code,
            &mut self.expiration_month,
            &mut self.expiration_year,
        ];
        controls.into()
    }
}

// =============================================================================
// Whole form
// =============================================================================

/// The complete checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub customer: CustomerGroup,
    pub shipping_address: AddressGroup,
    pub billing_address: AddressGroup,
    pub credit_card: CreditCardGroup,
}

impl CheckoutForm {
    /// Build the form with every control empty.
    ///
    /// Shipping zip codes must be numeric. Billing zip codes only are when
    /// `options.strict_billing_zip` is set.
    #[must_use]
    pub fn new(options: FormOptions) -> Self {
        Self {
            customer: CustomerGroup::new(),
            shipping_address: AddressGroup::new(AddressSection::Shipping, true),
            billing_address: AddressGroup::new(
                AddressSection::Billing,
                options.strict_billing_zip,
            ),
            credit_card: CreditCardGroup::new(),
        }
    }

    /// The address group for `section`.
    #[must_use]
    pub const fn address(&self, section: AddressSection) -> &AddressGroup {
        match section {
            AddressSection::Shipping => &self.shipping_address,
            AddressSection::Billing => &self.billing_address,
        }
    }

    /// Mutable access to the address group for `section`.
    pub const fn address_mut(&mut self, section: AddressSection) -> &mut AddressGroup {
        match section {
            AddressSection::Shipping => &mut self.shipping_address,
            AddressSection::Billing => &mut self.billing_address,
        }
    }

    fn groups(&self) -> [&dyn FieldGroup; 4] {
        [
            &self.customer,
            &self.shipping_address,
            &self.billing_address,
            &self.credit_card,
        ]
    }

    /// Whether every field in every group is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.groups().iter().all(|group| group.is_valid())
    }

    /// Dotted paths of every invalid field, in form order.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<String> {
        self.groups()
            .iter()
            .flat_map(|group| group.invalid_fields())
            .collect()
    }

    /// Mark every field as visited so validation messages become visible.
    pub fn mark_all_as_touched(&mut self) {
        self.customer.mark_all_as_touched();
        self.shipping_address.mark_all_as_touched();
        self.billing_address.mark_all_as_touched();
        self.credit_card.mark_all_as_touched();
    }

    /// Clear every field back to empty and untouched.
    pub fn reset(&mut self) {
        self.customer.reset();
        self.shipping_address.reset();
        self.billing_address.reset();
        self.credit_card.reset();
    }
}
