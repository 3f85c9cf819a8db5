//! Reference entities served by the backend for address dropdowns.

use serde::{Deserialize, Serialize};

/// A country a customer can ship to or be billed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code (e.g. `IT`), used to look up regions.
    pub code: String,
    /// Display name; the only part that reaches the order payload.
    pub name: String,
}

impl Country {
    /// Create a country reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A region (state, province) scoped to one country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Region code. Some backends only expose names, so this may be empty.
    #[serde(default)]
    pub code: String,
    /// Display name; the only part that reaches the order payload.
    pub name: String,
}

impl Region {
    /// Create a region reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}
