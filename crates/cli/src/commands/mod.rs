//! CLI command implementations.

pub mod config;
pub mod import;

use almacen_admin::api::AdminApiClient;

/// Errors shared by the commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid ALMACEN_API_URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Build a client and log in with the operator credentials from the
/// environment.
pub async fn client_from_env() -> Result<(AdminApiClient, String), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("ALMACEN_API_URL")
        .map_err(|_| CliError::MissingEnv("ALMACEN_API_URL"))?;
    let username = std::env::var("ALMACEN_ADMIN_USER")
        .map_err(|_| CliError::MissingEnv("ALMACEN_ADMIN_USER"))?;
    let password = std::env::var("ALMACEN_ADMIN_PASSWORD")
        .map_err(|_| CliError::MissingEnv("ALMACEN_ADMIN_PASSWORD"))?;

    let api = AdminApiClient::new(&url::Url::parse(&base_url).map_err(CliError::InvalidUrl)?);
    let token = api.login(&username, &password).await?;
    Ok((api, token))
}
