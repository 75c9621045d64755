//! Product types.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProductCodeError {
    /// The input string is empty (or whitespace only).
    #[error("product code cannot be empty")]
    Empty,
}

/// A product code.
///
/// Codes come from the supplier's barcode column and uniquely identify a
/// product within the catalog. The wrapper guarantees the code is trimmed
/// and non-empty.
///
/// ## Examples
///
/// ```
/// use almacen_core::ProductCode;
///
/// assert!(ProductCode::parse("7790001001234").is_ok());
/// assert!(ProductCode::parse("  PAN-01  ").is_ok());
/// assert!(ProductCode::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Parse a `ProductCode` from a string.
    ///
    /// Leading and trailing whitespace is stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming.
    pub fn parse(s: &str) -> Result<Self, ProductCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductCodeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ProductCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A catalog product.
///
/// Products are owned by the backend API and cached client-side per page
/// load; this struct is the in-memory snapshot both services work with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Backend row id. `None` for products that came from a CSV feed
    /// rather than the API.
    pub id: Option<i64>,
    pub code: ProductCode,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: Decimal,
    pub supplier: String,
    /// Whether the product is visible in the public shop.
    pub enabled: bool,
    /// 1-based display rank. Unranked products sort last.
    pub rank: Option<u32>,
    pub image_url: Option<String>,
}

impl Product {
    /// Minimal constructor used by tests and CSV feeds.
    #[must_use]
    pub fn new(code: ProductCode, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            code,
            name: name.into(),
            description: String::new(),
            category: String::new(),
            subcategory: String::new(),
            price,
            supplier: String::new(),
            enabled: true,
            rank: None,
            image_url: None,
        }
    }
}
