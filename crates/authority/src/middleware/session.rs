//! Session cookie policy and sliding-expiry middleware.
//!
//! There is no session store: the `AppSession` cookie carries sealed
//! [`SessionClaims`]. [`session_middleware`] opens the cookie once per
//! request, exposes the claims to handlers through request extensions, and
//! re-issues the cookie with a fresh expiry on every successful response
//! (24 hours of inactivity ends the session).

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, TimeDelta, Utc};

use appsession_core::SessionClaims;

use crate::config::AuthorityConfig;
use crate::services::{SessionCodec, TokenError};
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "AppSession";

/// Cookie attributes that depend on the deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
    pub domain: Option<String>,
}

impl CookiePolicy {
    /// Production: `Secure; SameSite=None` so cross-site front ends can send
    /// the cookie, plus the configured domain. Development: plain HTTP,
    /// `SameSite=Lax` and no domain so the cookie is shared across localhost ports.
    #[must_use]
    pub fn for_config(config: &AuthorityConfig) -> Self {
        if config.environment.is_production() {
            Self {
                secure: true,
                same_site: SameSite::None,
                domain: config.cookie_domain.clone(),
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
                domain: None,
            }
        }
    }
}

/// Issues, reads and clears the session cookie.
pub struct SessionCookies {
    codec: SessionCodec,
    policy: CookiePolicy,
    ttl: TimeDelta,
}

impl SessionCookies {
    #[must_use]
    pub const fn new(codec: SessionCodec, policy: CookiePolicy, ttl: TimeDelta) -> Self {
        Self { codec, policy, ttl }
    }

    /// Sliding session lifetime.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn build(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.policy.secure)
            .same_site(self.policy.same_site)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build();
        if let Some(domain) = &self.policy.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    /// A cookie carrying the sealed claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be sealed.
    pub fn issue(&self, claims: &SessionClaims) -> Result<Cookie<'static>, TokenError> {
        Ok(self.build(self.codec.seal(claims)?))
    }

    /// A cookie that deletes the session cookie, with matching attributes so
    /// the browser accepts it.
    #[must_use]
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.build(String::new());
        cookie.make_removal();
        cookie
    }

    /// Claims from the request's session cookie, if present, authentic and
    /// unexpired at `now`.
    #[must_use]
    pub fn read(&self, jar: &CookieJar, now: DateTime<Utc>) -> Option<SessionClaims> {
        let cookie = jar.get(SESSION_COOKIE_NAME)?;
        match self.codec.open(cookie.value(), now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                None
            }
        }
    }
}

/// Whether a handler already set or cleared the session cookie.
fn sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            value
                .strip_prefix(SESSION_COOKIE_NAME)
                .is_some_and(|rest| rest.starts_with('='))
        })
}

/// Decode the session cookie into request extensions and slide its expiry.
///
/// The refresh is skipped when the response is not a success (a failed
/// login must not emit `Set-Cookie`) or when the handler already wrote the
/// session cookie itself (login, logout).
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let now = Utc::now();
    let claims = state.cookies().read(&jar, now);

    if let Some(claims) = &claims {
        request.extensions_mut().insert(claims.clone());
    }

    let response = next.run(request).await;

    let Some(claims) = claims else {
        return response;
    };
    if !response.status().is_success() || sets_session_cookie(&response) {
        return response;
    }

    let cookies = state.cookies();
    match cookies.issue(&claims.refreshed(now, cookies.ttl())) {
        Ok(cookie) => (jar.add(cookie), response).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to refresh session cookie");
            response
        }
    }
}
