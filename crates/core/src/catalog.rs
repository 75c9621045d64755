//! Catalog presentation helpers and the CSV catalog feed.
//!
//! Category and subcategory menus follow a configured display order with
//! unknown names appended alphabetically; search is a plain
//! case-insensitive substring match over name and code, the same contract
//! the typeahead uses.

use crate::csv;
use crate::money::{PriceParseError, parse_price};
use crate::types::{Product, ProductCode};

/// Distinct, non-empty categories in catalog order.
#[must_use]
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut seen = Vec::new();
    for product in products {
        let category = product.category.trim();
        if !category.is_empty() && !seen.iter().any(|c: &String| c == category) {
            seen.push(category.to_owned());
        }
    }
    seen
}

/// Sort category names: configured order first, the rest alphabetical.
#[must_use]
pub fn sort_categories(mut categories: Vec<String>, configured_order: &[String]) -> Vec<String> {
    categories.sort_by(|a, b| {
        let pos_a = configured_order.iter().position(|c| c == a);
        let pos_b = configured_order.iter().position(|c| c == b);
        match (pos_a, pos_b) {
            (Some(a_idx), Some(b_idx)) => a_idx.cmp(&b_idx),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    categories
}

/// Case-insensitive substring filter over product name and code.
#[must_use]
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&term)
                || product.code.as_str().to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Failures while reading a CSV catalog feed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogCsvError {
    #[error("feed is missing the {0} column")]
    MissingColumn(&'static str),
    #[error("row {row}: {source}")]
    BadPrice {
        row: usize,
        source: PriceParseError,
    },
}

/// Parse a published catalog sheet into products.
///
/// Expected columns: `Codigo`, `Nombre`, `Precio`; `Descripcion`,
/// `Categoria`, `SubCategoria` and `Orden` are optional. Rows without a
/// code or name are skipped, the way the sheet's own blank padding rows
/// are.
///
/// # Errors
///
/// Returns an error when a mandatory column is missing from the header or
/// a present price fails to parse.
pub fn products_from_csv(text: &str) -> Result<Vec<Product>, CatalogCsvError> {
    let records = csv::records(text);

    for required in ["Codigo", "Nombre", "Precio"] {
        if !records.headers().iter().any(|h| h == required) {
            return Err(CatalogCsvError::MissingColumn(required));
        }
    }

    let mut products = Vec::new();
    for (index, record) in records.enumerate() {
        let Ok(code) = ProductCode::parse(record.get("Codigo")) else {
            continue;
        };
        let name = record.get("Nombre");
        if name.is_empty() {
            continue;
        }

        let price = parse_price(record.get("Precio")).map_err(|source| {
            CatalogCsvError::BadPrice {
                // +2: 1-based, after the header row
                row: index + 2,
                source,
            }
        })?;

        let mut product = Product::new(code, name, price);
        product.description = record.get("Descripcion").to_owned();
        product.category = record.get("Categoria").to_owned();
        product.subcategory = record.get("SubCategoria").to_owned();
        product.rank = record.get("Orden").parse().ok();
        products.push(product);
    }

    Ok(products)
}
