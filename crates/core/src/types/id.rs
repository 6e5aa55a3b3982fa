//! Opaque subject identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for the subject of a session.
///
/// A new one is minted on every successful login, so two logins by the same
/// phone or email yield different subjects. Clients must not parse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(Uuid);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Generate a fresh random subject identifier (UUID v4).
#[must_use]
pub fn generate_subject_id() -> SubjectId {
    SubjectId(Uuid::new_v4())
}
