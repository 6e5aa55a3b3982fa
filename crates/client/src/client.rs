//! HTTP session client.
//!
//! Wraps the authority's four endpoints and keeps the last session-check
//! result in a [`SessionCache`]. Cookies live in the client's own cookie
//! store, so every request carries the session the authority last set.

use std::sync::Arc;

use reqwest::StatusCode;
use url::Url;

use appsession_core::{
    AdminLoginRequest, LoginFailure, LoginResponse, PhoneLoginRequest, SessionView,
};

use crate::cache::SessionCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::navigator::Navigator;

const SESSION_PATH: &str = "api/auth/session";
const PHONE_LOGIN_PATH: &str = "api/auth/login/phone";
const ADMIN_LOGIN_PATH: &str = "api/auth/login/admin";
const LOGOUT_PATH: &str = "api/auth/logout";

/// What a user types into a login form.
#[derive(Clone)]
pub enum Credentials {
    /// Regular user: phone number and one-time password.
    Phone { phone: String, otp: String },
    /// Administrator: email and password.
    Admin { email: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone { phone, .. } => f
                .debug_struct("Phone")
                .field("phone", phone)
                .field("otp", &"[REDACTED]")
                .finish(),
            Self::Admin { email, .. } => f
                .debug_struct("Admin")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl Credentials {
    pub fn phone(phone: impl Into<String>, otp: impl Into<String>) -> Self {
        Self::Phone {
            phone: phone.into(),
            otp: otp.into(),
        }
    }

    pub fn admin(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Admin {
            email: email.into(),
            password: password.into(),
        }
    }

    const fn endpoint(&self) -> &'static str {
        match self {
            Self::Phone { .. } => PHONE_LOGIN_PATH,
            Self::Admin { .. } => ADMIN_LOGIN_PATH,
        }
    }
}

/// Outcome of a login attempt the authority answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success(LoginResponse),
    /// Credentials refused. `message` is the authority's generic text.
    Rejected { message: String },
}

impl LoginResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Session client shared by every view of a front end.
///
/// Cheap to clone; clones share the cookie store and the cache.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<SessionClientInner>,
}

struct SessionClientInner {
    http: reqwest::Client,
    api_url: Url,
    login_path: String,
    cache: SessionCache,
    navigator: Arc<dyn Navigator>,
}

impl SessionClient {
    /// Create a client for the configured authority.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(SessionClientInner {
                http: builder.build()?,
                api_url: config.api_url.clone(),
                login_path: config.login_path.clone(),
                cache: SessionCache::new(),
                navigator,
            }),
        })
    }

    /// The session cache, for subscribing to changes.
    #[must_use]
    pub fn cache(&self) -> &SessionCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.inner.login_path
    }

    /// Send the user to the login view.
    pub fn redirect_to_login(&self) {
        self.inner.navigator.navigate(&self.inner.login_path);
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.inner.api_url.join(path)?)
    }

    /// Ask the authority who the current cookie belongs to and cache it.
    ///
    /// Never fails: an unreachable authority, a non-2xx answer or an
    /// undecodable body all count as logged out.
    pub async fn check_session(&self) -> SessionView {
        let view = match self.fetch_session().await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed, treating as logged out");
                SessionView::anonymous()
            }
        };

        self.inner.cache.set(view.clone());
        view
    }

    async fn fetch_session(&self) -> Result<SessionView, ClientError> {
        let response = self
            .inner
            .http
            .get(self.endpoint(SESSION_PATH)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Log in and refresh the cached session from the authority.
    ///
    /// # Errors
    ///
    /// Returns an error if the authority cannot be reached or answers with
    /// something other than success, 400 or 401.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, ClientError> {
        let request = self.inner.http.post(self.endpoint(credentials.endpoint())?);
        let request = match credentials {
            Credentials::Phone { phone, otp } => request.json(&PhoneLoginRequest {
                phone: phone.clone(),
                otp: otp.clone(),
            }),
            Credentials::Admin { email, password } => request.json(&AdminLoginRequest {
                email: email.clone(),
                password: password.clone(),
            }),
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body: LoginResponse = response.json().await?;
            tracing::info!(user_type = %body.user_type, "Login succeeded");
            self.check_session().await;
            return Ok(LoginResult::Success(body));
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST) {
            let message = response
                .json::<LoginFailure>()
                .await
                .map_or_else(|_| "Login failed".to_string(), |failure| failure.message);
            tracing::info!(status = status.as_u16(), "Login rejected");
            return Ok(LoginResult::Rejected { message });
        }

        Err(ClientError::Status(status.as_u16()))
    }

    /// Forget the session locally, tell the authority, and go to login.
    ///
    /// The cache is cleared before the request is sent. A failed request is
    /// logged; the user still ends up on the login view.
    pub async fn logout(&self) {
        self.inner.cache.clear();

        let result = match self.endpoint(LOGOUT_PATH) {
            Ok(url) => self
                .inner
                .http
                .post(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map(drop)
                .map_err(ClientError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Logout request failed");
        }

        self.redirect_to_login();
    }

    /// Last cached session, without a network call.
    #[must_use]
    pub fn get_session(&self) -> Option<SessionView> {
        self.inner.cache.get()
    }
}
