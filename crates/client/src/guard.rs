//! Route guards for protected views.
//!
//! A guard always asks the authority afresh instead of trusting the cache:
//! navigation is exactly when a stale "logged in" must not leak through.

use appsession_core::{SessionView, UserClass};

use crate::client::SessionClient;

/// What a protected view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in user.
    Authenticated,
    /// A logged-in user of exactly this class.
    Role(UserClass),
}

impl Access {
    #[must_use]
    pub fn permits(self, view: &SessionView) -> bool {
        match self {
            Self::Authenticated => view.authenticated,
            Self::Role(class) => view.has_class(class),
        }
    }
}

/// Result of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Enter the view with this session.
    Allow(SessionView),
    /// Navigation rejected; the user was sent here.
    Redirect(String),
}

impl GuardDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Guard for one protected view.
#[derive(Clone)]
pub struct RouteGuard {
    client: SessionClient,
    access: Access,
}

impl RouteGuard {
    #[must_use]
    pub const fn new(client: SessionClient, access: Access) -> Self {
        Self { client, access }
    }

    /// Guard that admits any logged-in user.
    #[must_use]
    pub const fn authenticated(client: SessionClient) -> Self {
        Self::new(client, Access::Authenticated)
    }

    /// Guard that admits administrators only.
    #[must_use]
    pub const fn admin(client: SessionClient) -> Self {
        Self::new(client, Access::Role(UserClass::Admin))
    }

    /// Re-check the session and decide. Rejections redirect to login.
    pub async fn can_activate(&self) -> GuardDecision {
        let view = self.client.check_session().await;

        if self.access.permits(&view) {
            return GuardDecision::Allow(view);
        }

        tracing::info!(
            authenticated = view.authenticated,
            required = ?self.access,
            "Navigation rejected"
        );
        self.client.redirect_to_login();
        GuardDecision::Redirect(self.client.login_path().to_string())
    }
}
