//! Import commands.

use std::path::Path;

use almacen_core::csv;

use super::client_from_env;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Import display ranks from a CSV with `Codigo` and `Orden` columns.
///
/// Each matched product gets its own backend call; the first failure
/// stops the run (already-persisted ranks stay).
pub async fn ranks(file: &Path) -> CommandResult {
    let (api, token) = client_from_env().await?;
    let text = std::fs::read_to_string(file)?;

    let products = api.products(&token).await?;

    let mut applied = 0u32;
    let mut skipped = 0u32;
    for record in csv::records(&text) {
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
            tracing::warn!(code, "rank row skipped: unknown product code");
            skipped += 1;
            continue;
        };

        api.set_product_rank(&token, id, rank).await?;
        applied += 1;
    }

    tracing::info!(applied, skipped, "rank import finished");
    Ok(())
}

/// Import the enabled-product list from a JSON array of codes.
///
/// Products in the list end enabled, the rest disabled; untouched flags
/// cost no backend calls.
pub async fn enabled(file: &Path) -> CommandResult {
    let (api, token) = client_from_env().await?;
    let codes: Vec<String> = serde_json::from_str(&std::fs::read_to_string(file)?)?;

    let products = api.products(&token).await?;

    let mut applied = 0u32;
    for product in &products {
        let Some(id) = product.id else { continue };
        let should_enable = codes.iter().any(|code| code == product.code.as_str());
        if product.enabled == should_enable {
            continue;
        }
        api.set_product_enabled(&token, id, should_enable).await?;
        applied += 1;
    }

    tracing::info!(applied, total = products.len(), "enabled import finished");
    Ok(())
}

/// Forward a product sheet to the backend importer.
pub async fn products(file: &Path) -> CommandResult {
    let (api, token) = client_from_env().await?;
    let bytes = std::fs::read(file)?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("productos.xlsx");

    let report = api.import_products(&token, filename, bytes).await?;
    tracing::info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        "product import finished"
    );
    Ok(())
}

/// Forward an order sheet to the backend importer.
pub async fn orders(file: &Path) -> CommandResult {
    let (api, token) = client_from_env().await?;
    let bytes = std::fs::read(file)?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("pedidos.xlsx");

    let report = api.import_orders(&token, filename, bytes).await?;
    tracing::info!(
        created = report.created,
        errors = report.errors.len(),
        "order import finished"
    );
    Ok(())
}
