//! AppSession Core - Shared session types.
//!
//! This crate provides the types shared by every AppSession component:
//! - `authority` - The HTTP service that issues and decodes session cookies
//! - `client` - The session client library consumed by front ends
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no cryptography.
//! The wire DTOs here are the single source of truth for the JSON contract
//! between the authority and its clients.
//!
//! # Modules
//!
//! - [`types`] - Identity newtypes, session claims/views and wire DTOs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
