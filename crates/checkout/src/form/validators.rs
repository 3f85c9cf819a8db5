//! Field validation rules.
//!
//! Length and pattern rules ignore empty values so a blank field reports a
//! single `Required` error instead of a pile of them. Patterns are matched
//! against the whole value.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Lowercase `local@domain.tld` with a two to four letter TLD.
pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("Invalid regex")
});

/// Exactly sixteen digits.
pub static CARD_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("Invalid regex"));

/// Exactly three digits.
pub static SECURITY_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("Invalid regex"));

/// A reason a field value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("is required")]
    Required,

    #[error("must be at least {required} characters long")]
    MinLength { required: usize, actual: usize },

    #[error("has an invalid format")]
    Pattern { pattern: String },

    #[error("must not be only whitespace")]
    OnlyWhitespace,

    #[error("must contain only digits")]
    NotNumeric,
}

/// A rule attached to a form control.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must be present (non-empty text or a selection).
    Required,
    /// Text must have at least this many UTF-16 code units, the way browser
    /// form validation measures length.
    MinLength(usize),
    /// Text must match the whole pattern.
    Pattern(&'static Regex),
    /// Text must contain at least one non-whitespace character.
    NotOnlyWhitespace,
    /// Text must consist of ASCII digits only.
    Numeric,
}

impl Validator {
    /// Check a value against this rule.
    ///
    /// `text` is the textual form of the value, or `None` for selections
    /// (countries, regions, months), which only `Required` applies to.
    #[must_use]
    pub fn check(&self, is_empty: bool, text: Option<&str>) -> Option<ValidationError> {
        match (self, text) {
            (Self::Required, _) => is_empty.then_some(ValidationError::Required),
            (Self::MinLength(required), Some(text)) if !text.is_empty() => {
                let actual = text.encode_utf16().count();
                (actual < *required).then_some(ValidationError::MinLength {
                    required: *required,
                    actual,
                })
            }
            (Self::Pattern(pattern), Some(text)) if !text.is_empty() => {
                (!pattern.is_match(text)).then(|| ValidationError::Pattern {
                    pattern: pattern.as_str().to_string(),
                })
            }
            (Self::NotOnlyWhitespace, Some(text)) => {
                not_only_whitespace(text).then_some(ValidationError::OnlyWhitespace)
            }
            (Self::Numeric, Some(text)) if !text.is_empty() => {
                (!is_numeric(text)).then_some(ValidationError::NotNumeric)
            }
            _ => None,
        }
    }
}

/// Whether `text` trims down to nothing. The empty string counts.
#[must_use]
pub fn not_only_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

/// Whether `text` is made of ASCII digits only.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}
