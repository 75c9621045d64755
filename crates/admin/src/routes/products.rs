//! Product management route handlers.
//!
//! Reordering is the delicate part: ranks are always re-derived densely
//! from the visual order (never nudged in place) and persisted one
//! backend call per changed product. There is no batch endpoint and no
//! rollback: a mid-sequence failure leaves the backend partially updated
//! until the next reload, and the outcome report says so.

use almacen_core::ranking::{Direction, RankChange, plan_move, plan_sequence, sort_by_rank};
use almacen_core::types::Product;
use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::api::ImportReport;
use crate::error::{AppError, Result};
use crate::middleware::AuthToken;
use crate::state::AppState;

// =============================================================================
// Listing & search
// =============================================================================

/// Full product list in display order.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Vec<Product>>> {
    let products = state.api().products(token.as_str()).await?;
    Ok(Json(sort_by_rank(&products)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    20
}

/// Backend typeahead search.
#[instrument(skip(state, token))]
pub async fn search(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .api()
        .search_products(token.as_str(), &params.q, params.limit)
        .await?;
    Ok(Json(products))
}

// =============================================================================
// Reordering
// =============================================================================

/// Result of persisting a rank plan, including partial failure.
#[derive(Debug, Serialize)]
pub struct ReorderOutcome {
    /// Rank changes the plan produced.
    pub planned: usize,
    /// Changes persisted before the first failure.
    pub applied: usize,
    /// The failure that stopped the run, if any. Already-persisted
    /// changes are NOT rolled back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Persist rank changes one call at a time, stopping at the first
/// failure.
async fn persist_changes(
    state: &AppState,
    token: &AuthToken,
    changes: &[RankChange],
) -> ReorderOutcome {
    let mut applied = 0;
    for change in changes {
        match state
            .api()
            .set_product_rank(token.as_str(), change.id, change.rank)
            .await
        {
            Ok(()) => applied += 1,
            Err(error) => {
                warn!(
                    product_id = change.id,
                    applied,
                    planned = changes.len(),
                    %error,
                    "rank persist failed part-way; backend is now partially reordered"
                );
                return ReorderOutcome {
                    planned: changes.len(),
                    applied,
                    error: Some(error.to_string()),
                };
            }
        }
    }
    ReorderOutcome {
        planned: changes.len(),
        applied,
        error: None,
    }
}

fn outcome_response(outcome: ReorderOutcome) -> (StatusCode, Json<ReorderOutcome>) {
    let status = if outcome.error.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// Move a product one step up or down.
#[instrument(skip(state, token))]
pub async fn move_product(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(product_id): Path<i64>,
    Json(request): Json<MoveRequest>,
) -> Result<(StatusCode, Json<ReorderOutcome>)> {
    let products = state.api().products(token.as_str()).await?;

    let changes = plan_move(&products, product_id, request.direction)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    Ok(outcome_response(
        persist_changes(&state, &token, &changes).await,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SequenceRequest {
    /// Product ids in the desired visual order (drag-drop result).
    pub ids: Vec<i64>,
}

/// Re-rank an explicit sequence of product ids.
#[instrument(skip(state, token, request), fields(count = request.ids.len()))]
pub async fn reorder(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<SequenceRequest>,
) -> Result<(StatusCode, Json<ReorderOutcome>)> {
    let products = state.api().products(token.as_str()).await?;
    let changes = plan_sequence(&request.ids, &products);

    Ok(outcome_response(
        persist_changes(&state, &token, &changes).await,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub rank: u32,
}

/// Set one product's rank directly (the inline number input).
#[instrument(skip(state, token))]
pub async fn set_rank(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(product_id): Path<i64>,
    Json(request): Json<RankRequest>,
) -> Result<StatusCode> {
    state
        .api()
        .set_product_rank(token.as_str(), product_id, request.rank)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// State & images
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StateRequest {
    pub enabled: bool,
}

/// Enable or disable a product in the public shop.
#[instrument(skip(state, token))]
pub async fn set_state(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(product_id): Path<i64>,
    Json(request): Json<StateRequest>,
) -> Result<StatusCode> {
    state
        .api()
        .set_product_enabled(token.as_str(), product_id, request.enabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the uploaded file out of a multipart form.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.bin").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            return Ok((filename, bytes.to_vec()));
        }
    }
    Err(AppError::BadRequest("missing file field".to_owned()))
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Upload a product image, forwarded to the backend.
#[instrument(skip(state, token, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Path(code): Path<String>,
    multipart: Multipart,
) -> Result<StatusCode> {
    let (filename, bytes) = read_upload(multipart).await?;

    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "unsupported image format: {extension}"
        )));
    }

    state
        .api()
        .upload_product_image(token.as_str(), &code, &filename, bytes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ImageDeleteRequest {
    /// Backend path of the image, as listed in the product's
    /// `image_url`.
    pub path: String,
}

/// Delete a product image by backend path.
#[instrument(skip(state, token))]
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(request): Json<ImageDeleteRequest>,
) -> Result<StatusCode> {
    state
        .api()
        .delete_product_image(token.as_str(), &request.path)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Imports
// =============================================================================

/// Forward a product sheet (Excel) to the backend importer.
#[instrument(skip(state, token, multipart))]
pub async fn import(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    multipart: Multipart,
) -> Result<Json<ImportReport>> {
    let (filename, bytes) = read_upload(multipart).await?;
    let report = state
        .api()
        .import_products(token.as_str(), &filename, bytes)
        .await?;
    Ok(Json(report))
}

/// Outcome of a client-side bulk update run.
#[derive(Debug, Serialize)]
pub struct BulkOutcome {
    pub applied: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Import display ranks from a CSV with `Codigo` and `Orden` columns.
///
/// Parsed locally; each matched product gets its own rank call, first
/// failure stops the run without rolling back.
#[instrument(skip(state, token, multipart))]
pub async fn import_ranks(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    multipart: Multipart,
) -> Result<Json<BulkOutcome>> {
    let (_, bytes) = read_upload(multipart).await?;
    let text = String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest("rank CSV is not valid UTF-8".to_owned()))?;

    let products = state.api().products(token.as_str()).await?;

    let mut applied = 0;
    let mut skipped = 0;
    for record in almacen_core::csv::records(&text) {
        let code = record.get("Codigo");
        let Ok(rank) = record.get("Orden").parse::<u32>() else {
            skipped += 1;
            continue;
        };
        let Some(id) = products
            .iter()
            .find(|product| product.code.as_str() == code)
            .and_then(|product| product.id)
        else {
            skipped += 1;
            continue;
        };

        if let Err(error) = state.api().set_product_rank(token.as_str(), id, rank).await {
            return Ok(Json(BulkOutcome {
                applied,
                skipped,
                error: Some(error.to_string()),
            }));
        }
        applied += 1;
    }

    Ok(Json(BulkOutcome {
        applied,
        skipped,
        error: None,
    }))
}

/// Set the enabled flag across the catalog from a list of codes.
///
/// Products in the list end enabled, the rest disabled; only products
/// whose flag actually changes get a backend call.
#[instrument(skip(state, token, codes), fields(count = codes.len()))]
pub async fn import_enabled(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(codes): Json<Vec<String>>,
) -> Result<Json<BulkOutcome>> {
    let products = state.api().products(token.as_str()).await?;

    let mut applied = 0;
    let mut skipped = 0;
    for product in &products {
        let Some(id) = product.id else {
            skipped += 1;
            continue;
        };
        let should_enable = codes.iter().any(|code| code == product.code.as_str());
        if product.enabled == should_enable {
            skipped += 1;
            continue;
        }

        if let Err(error) = state
            .api()
            .set_product_enabled(token.as_str(), id, should_enable)
            .await
        {
            return Ok(Json(BulkOutcome {
                applied,
                skipped,
                error: Some(error.to_string()),
            }));
        }
        applied += 1;
    }

    Ok(Json(BulkOutcome {
        applied,
        skipped,
        error: None,
    }))
}
