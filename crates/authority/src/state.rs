//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{AuthorityConfig, ConfigError};
use crate::credentials::{CredentialSeed, CredentialStore};
use crate::middleware::{CookiePolicy, SessionCookies};
use crate::services::{Authenticator, SessionCodec};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; everything inside is read-only.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AuthorityConfig,
    authenticator: Authenticator,
    cookies: SessionCookies,
}

impl AppState {
    /// Create application state over injected credential stores.
    #[must_use]
    pub fn new(
        config: AuthorityConfig,
        regular: Arc<dyn CredentialStore>,
        admins: Arc<dyn CredentialStore>,
    ) -> Self {
        let authenticator = Authenticator::new(regular, admins, config.session_ttl);
        let cookies = SessionCookies::new(
            SessionCodec::new(config.session_secret.clone()),
            CookiePolicy::for_config(&config),
            config.session_ttl,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                authenticator,
                cookies,
            }),
        }
    }

    /// Create application state with stores seeded from the configured
    /// credentials file, or the demo tables if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials file cannot be loaded.
    pub fn from_config(config: AuthorityConfig) -> Result<Self, ConfigError> {
        let seed = match &config.credentials_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading credential seed file");
                CredentialSeed::load(path)?
            }
            None => {
                tracing::warn!("No credentials file configured, using built-in demo credentials");
                CredentialSeed::demo()
            }
        };
        let (regular, admins) = seed.into_stores();
        tracing::info!(
            regular_users = regular.len(),
            admins = admins.len(),
            "Credential stores ready"
        );

        Ok(Self::new(config, Arc::new(regular), Arc::new(admins)))
    }

    /// Get a reference to the authority configuration.
    #[must_use]
    pub fn config(&self) -> &AuthorityConfig {
        &self.inner.config
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    /// Get a reference to the session cookie issuer.
    #[must_use]
    pub fn cookies(&self) -> &SessionCookies {
        &self.inner.cookies
    }
}
