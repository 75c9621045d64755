//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Auth (backend bearer token required on protected routes)

pub mod auth;
pub mod session;

pub use auth::{AuthToken, require_auth};
pub use session::create_session_layer;
