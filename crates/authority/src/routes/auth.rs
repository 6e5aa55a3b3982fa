//! Authentication route handlers.
//!
//! Login handlers set the session cookie, logout clears it, and the session
//! handler reports what the cookie (already decoded by the session
//! middleware) says. Failed logins set no cookie.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use appsession_core::{
    Ack, AdminLoginRequest, LoginResponse, PhoneLoginRequest, SessionClaims, SessionView,
};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Add the cookie for freshly issued claims and build the login response.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    claims: &SessionClaims,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let cookie = state.cookies().issue(claims)?;

    tracing::info!(
        subject = %claims.sub,
        user_type = %claims.user_type,
        "Session issued"
    );
    set_sentry_user(&claims.sub, claims.email.as_ref().map(|e| e.as_str()));

    Ok((jar.add(cookie), Json(LoginResponse::for_claims(claims))))
}

/// POST /api/auth/login/phone
pub async fn login_phone(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<PhoneLoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let claims = state
        .authenticator()
        .login_with_phone(&request.phone, &request.otp, Utc::now())
        .inspect_err(|_| tracing::warn!("Phone login rejected"))?;

    start_session(&state, jar, &claims)
}

/// POST /api/auth/login/admin
pub async fn login_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let claims = state
        .authenticator()
        .login_as_admin(&request.email, &request.password, Utc::now())
        .inspect_err(|_| tracing::warn!("Admin login rejected"))?;

    start_session(&state, jar, &claims)
}

/// GET /api/auth/session
///
/// Never fails: no cookie, a forged cookie and an expired cookie all answer
/// `{"authenticated": false}`.
pub async fn session(CurrentSession(claims): CurrentSession) -> Json<SessionView> {
    Json(
        claims
            .as_ref()
            .map_or_else(SessionView::anonymous, SessionClaims::view),
    )
}

/// POST /api/auth/logout
///
/// Clears the cookie whether or not a session existed.
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(claims): CurrentSession,
    jar: CookieJar,
) -> (CookieJar, Json<Ack>) {
    if let Some(claims) = claims {
        tracing::info!(subject = %claims.sub, "Session ended");
    }
    clear_sentry_user();

    (jar.add(state.cookies().removal()), Json(Ack::ok()))
}
