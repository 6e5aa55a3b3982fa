//! Session client library.
//!
//! One client shared by every front end that talks to the session authority:
//!
//! - [`SessionClient`] wraps login, logout and session checks and keeps the
//!   cookie in its own store.
//! - [`SessionCache`] holds the last known session and fans it out to
//!   subscribers.
//! - [`RouteGuard`] re-checks the session before a protected view and sends
//!   rejected users to the login view through the injected [`Navigator`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod navigator;

pub use cache::SessionCache;
pub use client::{Credentials, LoginResult, SessionClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use guard::{Access, GuardDecision, RouteGuard};
pub use navigator::{Navigator, RecordingNavigator};
