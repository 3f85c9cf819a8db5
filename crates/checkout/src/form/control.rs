//! Form controls and field groups.

use checkout_core::{Country, Region};

use super::validators::{ValidationError, Validator};

/// A value a form control can hold.
pub trait ControlValue: Clone + Default + PartialEq {
    /// Whether the value counts as "nothing entered".
    fn is_empty_value(&self) -> bool;

    /// Textual form for length and pattern rules; `None` for selections.
    fn as_text(&self) -> Option<&str>;
}

impl ControlValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl ControlValue for Option<Country> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn as_text(&self) -> Option<&str> {
        None
    }
}

impl ControlValue for Option<Region> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn as_text(&self) -> Option<&str> {
        None
    }
}

impl ControlValue for Option<u32> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn as_text(&self) -> Option<&str> {
        None
    }
}

impl ControlValue for Option<i32> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn as_text(&self) -> Option<&str> {
        None
    }
}

/// A single input field: value, interaction flags and validation rules.
#[derive(Debug, Clone)]
pub struct FormControl<T> {
    value: T,
    touched: bool,
    dirty: bool,
    validators: Vec<Validator>,
}

impl<T: ControlValue> FormControl<T> {
    /// Create an empty control with the given rules.
    #[must_use]
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            value: T::default(),
            touched: false,
            dirty: false,
            validators,
        }
    }

    /// Create an empty control without rules.
    #[must_use]
    pub fn unvalidated() -> Self {
        Self::new(Vec::new())
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Set the value programmatically. Interaction flags are untouched.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Set the value as the shopper would, marking the control dirty.
    pub fn input(&mut self, value: T) {
        self.value = value;
        self.dirty = true;
    }

    /// Whether the shopper has visited the control.
    #[must_use]
    pub const fn touched(&self) -> bool {
        self.touched
    }

    /// Whether the shopper has changed the value.
    #[must_use]
    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the control as visited.
    pub fn mark_as_touched(&mut self) {
        self.touched = true;
    }

    /// Clear the value and both interaction flags.
    pub fn reset(&mut self) {
        self.value = T::default();
        self.touched = false;
        self.dirty = false;
    }

    /// Every rule the current value breaks.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        let is_empty = self.value.is_empty_value();
        let text = self.value.as_text();
        self.validators
            .iter()
            .filter_map(|validator| validator.check(is_empty, text))
            .collect()
    }

    /// Whether the current value passes every rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Whether the control should display its errors.
    #[must_use]
    pub fn shows_errors(&self) -> bool {
        (self.touched || self.dirty) && !self.is_valid()
    }
}

/// Type-erased view of a control, used to walk a field group.
pub trait Control {
    /// Whether the current value passes every rule.
    fn is_valid(&self) -> bool;
    /// Mark the control as visited.
    fn mark_as_touched(&mut self);
    /// Clear the value and both interaction flags.
    fn reset(&mut self);
}

impl<T: ControlValue> Control for FormControl<T> {
    fn is_valid(&self) -> bool {
        Self::is_valid(self)
    }

    fn mark_as_touched(&mut self) {
        Self::mark_as_touched(self);
    }

    fn reset(&mut self) {
        Self::reset(self);
    }
}

/// A named group of controls validated and read as a unit.
pub trait FieldGroup {
    /// Group name as it appears in field paths (e.g. `shippingAddress`).
    fn name(&self) -> &'static str;

    /// The group's controls with their field names.
    fn controls(&self) -> Vec<(&'static str, &dyn Control)>;

    /// Mutable access to the group's controls.
    fn controls_mut(&mut self) -> Vec<&mut dyn Control>;

    /// Whether every control in the group is valid.
    fn is_valid(&self) -> bool {
        self.controls().iter().all(|(_, control)| control.is_valid())
    }

    /// Mark every control as visited so errors become visible.
    fn mark_all_as_touched(&mut self) {
        for control in self.controls_mut() {
            control.mark_as_touched();
        }
    }

    /// Clear every control.
    fn reset(&mut self) {
        for control in self.controls_mut() {
            control.reset();
        }
    }

    /// Dotted paths of invalid controls, e.g. `customer.email`.
    fn invalid_fields(&self) -> Vec<String> {
        self.controls()
            .iter()
            .filter(|(_, control)| !control.is_valid())
            .map(|(field, _)| format!("{}.{field}", self.name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_control_is_pristine() {
        let control: FormControl<String> = FormControl::new(vec![Validator::Required]);
        assert_eq!(control.value(), "");
        assert!(!control.touched());
        assert!(!control.dirty());
        assert!(!control.is_valid());
        assert!(!control.shows_errors());
    }

    #[test]
    fn test_input_marks_dirty_and_shows_errors() {
        let mut control: FormControl<String> =
            FormControl::new(vec![Validator::Required, Validator::MinLength(2)]);
        control.input("a".to_string());

        assert!(control.dirty());
        assert!(control.shows_errors());
        assert_eq!(
            control.errors(),
            vec![ValidationError::MinLength {
                required: 2,
                actual: 1
            }]
        );
    }

    #[test]
    fn test_set_value_does_not_mark_dirty() {
        let mut control: FormControl<Option<Country>> = FormControl::new(vec![Validator::Required]);
        control.set_value(Some(Country::new("IT", "Italy")));

        assert!(!control.dirty());
        assert!(control.is_valid());
    }

    #[test]
    fn test_reset_clears_value_and_flags() {
        let mut control: FormControl<String> = FormControl::new(vec![Validator::Required]);
        control.input("Mario".to_string());
        control.mark_as_touched();
        control.reset();

        assert_eq!(control.value(), "");
        assert!(!control.touched());
        assert!(!control.dirty());
    }

    #[test]
    fn test_unvalidated_control_is_always_valid() {
        let control: FormControl<Option<u32>> = FormControl::unvalidated();
        assert!(control.is_valid());
    }
}
