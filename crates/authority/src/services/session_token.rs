//! Signed session tokens.
//!
//! The session cookie value is
//!
//! ```text
//! base64url(json(SessionClaims)) "." base64url(HMAC-SHA256(key, first segment))
//! ```
//!
//! Nothing is stored server-side, so the signature is the only thing standing
//! between a client and an edited `userType`. Expiry is enforced here, not
//! just by the cookie's `Max-Age`, since clients can replay old cookies.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use appsession_core::SessionClaims;

type HmacSha256 = Hmac<Sha256>;

/// Errors from sealing or opening a session token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Not two base64url segments, or the payload is not valid claims JSON.
    #[error("malformed session token")]
    Malformed,

    /// Signature does not match the payload.
    #[error("session token signature mismatch")]
    BadSignature,

    /// Claims are past their expiry.
    #[error("session token expired")]
    Expired,

    /// Claims could not be serialized.
    #[error("failed to encode session claims: {0}")]
    Encode(#[from] serde_json::Error),

    /// The signing key was rejected by the MAC.
    #[error("invalid signing key")]
    InvalidKey,
}

/// Seals and opens session tokens with a single HMAC key.
pub struct SessionCodec {
    key: SecretString,
}

impl SessionCodec {
    #[must_use]
    pub const fn new(key: SecretString) -> Self {
        Self { key }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)
    }

    /// Serialize and sign `claims`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if the claims cannot be serialized.
    pub fn seal(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify and decode a token, rejecting it if expired at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Malformed`, `BadSignature` or `Expired`.
    pub fn open(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
