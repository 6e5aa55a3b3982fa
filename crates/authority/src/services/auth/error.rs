//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during login.
///
/// Each variant covers every cause for its login channel (unknown key,
/// malformed key, wrong secret), so callers cannot tell which one happened.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Phone + OTP login failed.
    #[error("Invalid phone or OTP")]
    InvalidPhoneOrOtp,

    /// Email + password login failed.
    #[error("Invalid email or password")]
    InvalidEmailOrPassword,
}
