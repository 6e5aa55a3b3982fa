//! Authentication service.
//!
//! Checks phone + OTP and email + password logins against the injected
//! credential stores and mints session claims on success.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::ExposeSecret;

use appsession_core::{Email, Phone, SessionClaims};

use crate::credentials::CredentialStore;

/// Authentication service.
///
/// Stateless apart from the read-only stores, so a single instance is shared
/// by all requests.
pub struct Authenticator {
    regular: Arc<dyn CredentialStore>,
    admins: Arc<dyn CredentialStore>,
    session_ttl: TimeDelta,
}

impl Authenticator {
    /// Create a new authenticator over the regular-user and admin stores.
    #[must_use]
    pub fn new(
        regular: Arc<dyn CredentialStore>,
        admins: Arc<dyn CredentialStore>,
        session_ttl: TimeDelta,
    ) -> Self {
        Self {
            regular,
            admins,
            session_ttl,
        }
    }

    /// Login with phone number and one-time password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhoneOrOtp` if the phone is malformed or
    /// unknown, or the OTP does not match exactly.
    pub fn login_with_phone(
        &self,
        phone: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, AuthError> {
        let phone = Phone::parse(phone).map_err(|_| AuthError::InvalidPhoneOrOtp)?;
        let expected = self
            .regular
            .lookup(phone.as_str())
            .ok_or(AuthError::InvalidPhoneOrOtp)?;

        if !constant_time_compare(expected.expose_secret(), otp) {
            return Err(AuthError::InvalidPhoneOrOtp);
        }

        Ok(SessionClaims::regular(phone, now, self.session_ttl))
    }

    /// Login as an administrator with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmailOrPassword` if the email is malformed
    /// or unknown, or the password does not match exactly.
    pub fn login_as_admin(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidEmailOrPassword)?;
        let expected = self
            .admins
            .lookup(email.as_str())
            .ok_or(AuthError::InvalidEmailOrPassword)?;

        if !constant_time_compare(expected.expose_secret(), password) {
            return Err(AuthError::InvalidEmailOrPassword);
        }

        Ok(SessionClaims::admin(email, now, self.session_ttl))
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
