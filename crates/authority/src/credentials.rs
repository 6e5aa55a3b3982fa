//! Credential stores.
//!
//! The authority never owns its credential tables directly: it is handed two
//! [`CredentialStore`]s (regular users keyed by phone, admins keyed by email)
//! and only ever asks them `lookup(key)`. The shipped implementation is an
//! immutable in-memory map seeded at startup from a YAML file or from the
//! built-in demo tables.
//!
//! # Seed file format
//!
//! ```yaml
//! regular:
//!   "+1234567890": "123456"
//! admin:
//!   admin@example.com: admin123
//! ```

use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use appsession_core::{Email, Phone};

use crate::config::ConfigError;

/// Lookup capability over a credential table: identity key -> secret.
pub trait CredentialStore: Send + Sync {
    /// Secret stored for `key`, or `None` if the key is unknown.
    fn lookup(&self, key: &str) -> Option<SecretString>;
}

/// Read-only in-memory credential table.
#[derive(Default)]
pub struct StaticCredentialStore {
    entries: HashMap<String, SecretString>,
}

impl StaticCredentialStore {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, key: &str) -> Option<SecretString> {
        self.entries.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticCredentialStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), SecretString::from(v.into())))
                .collect(),
        }
    }
}

/// Credential seed data: one table per user class.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialSeed {
    /// Phone number -> OTP.
    #[serde(default)]
    pub regular: HashMap<String, String>,
    /// Email -> password.
    #[serde(default)]
    pub admin: HashMap<String, String>,
}

impl CredentialSeed {
    /// The demo tables used when no seed file is configured.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            regular: HashMap::from([
                ("+1234567890".to_string(), "123456".to_string()),
                ("+9876543210".to_string(), "654321".to_string()),
            ]),
            admin: HashMap::from([
                ("admin@example.com".to_string(), "admin123".to_string()),
                ("supervisor@example.com".to_string(), "super456".to_string()),
            ]),
        }
    }

    /// Parse and validate a YAML seed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a regular key is not a
    /// phone number, or an admin key is not an email address.
    pub fn from_yaml(source: &str, origin: &str) -> Result<Self, ConfigError> {
        let seed: Self = serde_yaml::from_str(source)
            .map_err(|e| ConfigError::CredentialsFile(origin.to_string(), e.to_string()))?;
        seed.validate(origin)?;
        Ok(seed)
    }

    /// Read a YAML seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_yaml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::CredentialsFile(origin.clone(), e.to_string()))?;
        Self::from_yaml(&source, &origin)
    }

    fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let invalid = |detail: String| ConfigError::CredentialsFile(origin.to_string(), detail);

        for (phone, otp) in &self.regular {
            Phone::parse(phone).map_err(|e| invalid(format!("regular key '{phone}': {e}")))?;
            if otp.is_empty() {
                return Err(invalid(format!("regular key '{phone}' has an empty OTP")));
            }
        }
        for (email, password) in &self.admin {
            Email::parse(email).map_err(|e| invalid(format!("admin key '{email}': {e}")))?;
            if password.is_empty() {
                return Err(invalid(format!("admin key '{email}' has an empty password")));
            }
        }
        Ok(())
    }

    /// Split into the regular-user and admin stores.
    #[must_use]
    pub fn into_stores(self) -> (StaticCredentialStore, StaticCredentialStore) {
        (
            self.regular.into_iter().collect(),
            self.admin.into_iter().collect(),
        )
    }
}
