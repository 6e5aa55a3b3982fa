//! JSON request and response bodies of the `/api/auth` endpoints.
//!
//! ```text
//! POST /api/auth/login/phone   {phone, otp}       -> LoginResponse | 401 LoginFailure
//! POST /api/auth/login/admin   {email, password}  -> LoginResponse | 401 LoginFailure
//! GET  /api/auth/session                          -> SessionView
//! POST /api/auth/logout                           -> Ack
//! ```
//!
//! Login bodies keep identity keys as plain strings: a malformed phone or
//! email must be rejected with the same generic 401 as a wrong secret, not
//! with a deserialization error that would reveal which field was wrong.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::phone::Phone;
use super::session::SessionClaims;
use super::user_class::UserClass;

/// Body of `POST /api/auth/login/phone`.
#[derive(Clone, Serialize, Deserialize)]
pub struct PhoneLoginRequest {
    pub phone: String,
    pub otp: String,
}

impl std::fmt::Debug for PhoneLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneLoginRequest")
            .field("phone", &self.phone)
            .field("otp", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /api/auth/login/admin`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminLoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user_type: UserClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

impl LoginResponse {
    /// Build the response for freshly issued claims.
    ///
    /// Phone logins echo only the phone; admin logins echo name and email.
    #[must_use]
    pub fn for_claims(claims: &SessionClaims) -> Self {
        match claims.user_type {
            UserClass::Regular => Self {
                success: true,
                user_type: UserClass::Regular,
                name: None,
                email: None,
                phone: claims.phone.clone(),
            },
            UserClass::Admin => Self {
                success: true,
                user_type: UserClass::Admin,
                name: Some(claims.name.clone()),
                email: claims.email.clone(),
                phone: None,
            },
        }
    }
}

/// Failed login response (sent with 401).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
}

impl LoginFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `{"success": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
