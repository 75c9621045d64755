//! Configuration commands.

use almacen_core::types::ShopConfig;

use super::client_from_env;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print the current shop configuration as pretty JSON.
#[allow(clippy::print_stdout)]
pub async fn show() -> CommandResult {
    let (api, token) = client_from_env().await?;
    let config = api.shop_config(&token).await?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Seed an empty configuration document.
///
/// Useful after backend schema changes; existing values are replaced
/// with empty defaults.
pub async fn init() -> CommandResult {
    let (api, token) = client_from_env().await?;
    let config = ShopConfig::default();
    api.put_shop_config(&token, &config).await?;
    tracing::info!("empty configuration seeded");
    Ok(())
}
