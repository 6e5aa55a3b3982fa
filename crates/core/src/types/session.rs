//! Session claims (what the cookie carries) and session views (what clients see).

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{SubjectId, generate_subject_id};
use super::phone::Phone;
use super::user_class::UserClass;

/// Signed contents of a session cookie.
///
/// The authority is stateless: everything it knows about a session is in
/// here. Timestamps are whole seconds so that a sealed-then-opened claim set
/// compares equal to the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Opaque subject id, fresh per login.
    pub sub: SubjectId,
    /// Display name.
    pub name: String,
    /// Class the session was issued for.
    pub user_type: UserClass,
    /// Admin email (admin sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Phone number (regular sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    /// Issued (or last refreshed) at.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,
    /// Expires at.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims for a regular (phone) user.
    #[must_use]
    pub fn regular(phone: Phone, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let now = now.trunc_subsecs(0);
        Self {
            sub: generate_subject_id(),
            name: phone.display_name(),
            user_type: UserClass::Regular,
            email: None,
            phone: Some(phone),
            iat: now,
            exp: now + ttl,
        }
    }

    /// Claims for an admin (email) user.
    #[must_use]
    pub fn admin(email: Email, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let now = now.trunc_subsecs(0);
        Self {
            sub: generate_subject_id(),
            name: email.display_name(),
            user_type: UserClass::Admin,
            email: Some(email),
            phone: None,
            iat: now,
            exp: now + ttl,
        }
    }

    /// Whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.exp
    }

    /// Same identity with the expiry window slid forward to `now + ttl`.
    #[must_use]
    pub fn refreshed(&self, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let now = now.trunc_subsecs(0);
        Self {
            iat: now,
            exp: now + ttl,
            ..self.clone()
        }
    }

    /// The client-facing view of these claims.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            authenticated: true,
            user_type: Some(self.user_type),
            name: Some(self.name.clone()),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Answer to "who is this cookie for".
///
/// Serialized as `{"authenticated": false}` when there is no session, and as
/// `{"authenticated": true, "userType": ..., "name": ..., "email"|"phone": ...}`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

impl SessionView {
    /// The unauthenticated view.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Whether the view is authenticated and of the given class.
    #[must_use]
    pub fn has_class(&self, class: UserClass) -> bool {
        self.authenticated && self.user_type == Some(class)
    }
}
