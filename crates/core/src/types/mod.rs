//! Core types for AppSession.
//!
//! This module provides type-safe wrappers for identities and the session
//! contract shared between the authority and its clients.

pub mod email;
pub mod id;
pub mod phone;
pub mod session;
pub mod user_class;
pub mod wire;

pub use email::{Email, EmailError};
pub use id::{SubjectId, generate_subject_id};
pub use phone::{Phone, PhoneError};
pub use session::{SessionClaims, SessionView};
pub use user_class::UserClass;
pub use wire::{Ack, AdminLoginRequest, LoginFailure, LoginResponse, PhoneLoginRequest};
