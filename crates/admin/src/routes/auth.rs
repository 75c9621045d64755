//! Authentication route handlers for admin.
//!
//! Login proxies form-encoded credentials to the backend and stores the
//! issued bearer token in the operator's session. The admin service never
//! sees or stores credentials beyond this exchange.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::Result;
use crate::middleware::auth::TOKEN_KEY;
use crate::state::AppState;

/// Login form payload (form-encoded, like the backend expects).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub ok: bool,
}

/// Exchange credentials for a backend token and store it in the session.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginOutcome>> {
    let token = state.api().login(&form.username, &form.password).await?;
    session.insert(TOKEN_KEY, token).await?;

    info!("operator logged in");
    Ok(Json(LoginOutcome { ok: true }))
}

/// Drop the session (and with it the token).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<LoginOutcome>> {
    session.flush().await?;
    Ok(Json(LoginOutcome { ok: true }))
}
