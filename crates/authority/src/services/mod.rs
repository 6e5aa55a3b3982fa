//! Business logic services.
//!
//! - [`auth`] - Credential verification and session claim issuance
//! - [`session_token`] - Signing and verifying session cookie values

pub mod auth;
pub mod session_token;

pub use auth::{AuthError, Authenticator};
pub use session_token::{SessionCodec, TokenError};
