//! HTTP route handlers for the authority.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Auth API
//! POST /api/auth/login/phone   - Phone + OTP login (regular users)
//! POST /api/auth/login/admin   - Email + password login (admins)
//! GET  /api/auth/session       - Who is this cookie for
//! POST /api/auth/logout        - Clear the session cookie
//! ```

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/phone", post(auth::login_phone))
        .route("/login/admin", post(auth::login_admin))
        .route("/session", get(auth::session))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the authority.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// The authority has no external dependencies, so liveness is readiness.
async fn health() -> &'static str {
    "ok"
}
