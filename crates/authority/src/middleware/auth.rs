//! Session extractor.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use appsession_core::SessionClaims;

/// Extractor for the caller's session, if any.
///
/// Reads the claims that `session_middleware` decoded from the cookie. Never
/// rejects: a missing, forged or expired cookie is simply `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentSession(claims): CurrentSession) -> impl IntoResponse {
///     match claims {
///         Some(c) => format!("Hello, {}!", c.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentSession(pub Option<SessionClaims>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SessionClaims>().cloned()))
    }
}
