//! Session client errors.
//!
//! Only `login` surfaces these. Session checks and logout absorb transport
//! failures and degrade to "logged out".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authority answered with an unexpected status.
    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}
