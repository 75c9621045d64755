//! Authentication middleware for admin.
//!
//! The admin service verifies nothing itself: login proxies credentials
//! to the backend and the issued bearer token is stored in the operator's
//! session. This middleware rejects protected routes without a token and
//! hands the token to handlers through request extensions.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::AppError;

/// Session key for the backend bearer token.
pub const TOKEN_KEY: &str = "auth.token";

/// The operator's backend bearer token, available as an
/// `Extension<AuthToken>` on protected routes.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

impl AuthToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reject requests without a session token; otherwise attach it.
pub async fn require_auth(session: Session, mut request: Request, next: Next) -> Response {
    let token = match session.get::<String>(TOKEN_KEY).await {
        Ok(Some(token)) => token,
        Ok(None) => return AppError::Unauthorized.into_response(),
        Err(error) => return AppError::Session(error).into_response(),
    };

    request.extensions_mut().insert(AuthToken(token));
    next.run(request).await
}
