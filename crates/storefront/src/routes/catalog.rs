//! Catalog route handlers.

use almacen_core::catalog::{distinct_categories, filter_products, sort_categories};
use almacen_core::ranking::sort_by_rank;
use almacen_core::types::{Product, ProductCode};
use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// A product as the public shop sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub code: ProductCode,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

/// The catalog, rank-sorted, with the category menu in display order.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
}

/// Full enabled catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CatalogResponse>> {
    let catalog = state.catalog().await?;
    let config = state.shop_config().await?;

    let sorted = sort_by_rank(&catalog);
    let categories = sort_categories(distinct_categories(&sorted), &config.category_order);

    Ok(Json(CatalogResponse {
        products: sorted.iter().map(ProductView::from).collect(),
        categories,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search results for the typeahead; same substring contract the panel
/// uses.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ProductView>>> {
    let catalog = state.catalog().await?;
    let matches = filter_products(&sort_by_rank(&catalog), &params.q);
    Ok(Json(matches.iter().map(ProductView::from).collect()))
}
