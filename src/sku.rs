//! SKUs

use std::fmt;
use std::ops::Deref;

/// A stock-keeping unit: the unique string key identifying a catalog line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sku(String);

impl Sku {
    /// Creates a new SKU from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Sku(id.into())
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Sku {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(id: &str) -> Self {
        Sku::new(id)
    }
}

impl From<String> for Sku {
    fn from(id: String) -> Self {
        Sku(id)
    }
}
