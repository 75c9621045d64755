//! Localized price parsing.
//!
//! Supplier sheets write prices as `$ 1.234,56` (dot for thousands, comma
//! for decimals); exported data sometimes uses plain `1234.56`. Both parse
//! to a [`Decimal`].

use rust_decimal::Decimal;

/// Errors produced by [`parse_price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("price cannot be empty")]
    Empty,
    #[error("unparseable price: {0}")]
    Invalid(String),
}

/// Parse a localized price string.
///
/// # Errors
///
/// Returns an error when the input is empty or not a number in either
/// format.
pub fn parse_price(raw: &str) -> Result<Decimal, PriceParseError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();

    if cleaned.is_empty() {
        return Err(PriceParseError::Empty);
    }

    // Comma present: treat dots as thousands separators.
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    normalized
        .parse::<Decimal>()
        .map_err(|_| PriceParseError::Invalid(raw.trim().to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_format() {
        assert_eq!(parse_price("1.234,56").unwrap(), "1234.56".parse().unwrap());
        assert_eq!(parse_price("$ 1.234,56").unwrap(), "1234.56".parse().unwrap());
        assert_eq!(parse_price("0,50").unwrap(), "0.50".parse().unwrap());
    }

    #[test]
    fn test_plain_format() {
        assert_eq!(parse_price("1234.56").unwrap(), "1234.56".parse().unwrap());
        assert_eq!(parse_price("250").unwrap(), Decimal::from(250));
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_price("   "), Err(PriceParseError::Empty));
        assert_eq!(parse_price("$"), Err(PriceParseError::Empty));
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            parse_price("precio"),
            Err(PriceParseError::Invalid(_))
        ));
    }
}
