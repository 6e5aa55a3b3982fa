//! Session client configuration.
//!
//! # Environment Variables
//!
//! - `APPSESSION_API_URL` - Authority base URL (server-side consumers)
//! - `APPSESSION_PUBLIC_API_URL` - Fallback base URL (browser-facing consumers)
//! - `APPSESSION_LOGIN_PATH` - Where rejected navigations go (default: `/login`)
//! - `APPSESSION_CLIENT_TIMEOUT_SECS` - Per-request timeout (default: none)
//!
//! When neither URL is set the client talks to `http://localhost:5001`.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

const DEFAULT_API_URL: &str = "http://localhost:5001";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Where the authority lives and where rejected users are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Authority base URL, always ending in `/`.
    pub api_url: Url,
    pub login_path: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for an authority at `api_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `api_url` is not an absolute URL.
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_url: base_url(api_url)?,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            timeout: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or timeout is malformed.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let optional = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let api_url = optional("APPSESSION_API_URL")
            .or_else(|| optional("APPSESSION_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = optional("APPSESSION_CLIENT_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ClientError::Config(format!("APPSESSION_CLIENT_TIMEOUT_SECS: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            api_url: base_url(&api_url)?,
            login_path: optional("APPSESSION_LOGIN_PATH")
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            timeout,
        })
    }

    /// Set the login path used for redirects.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Parse a base URL so relative endpoint paths join under it.
fn base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = ClientConfig::new("http://localhost:5001").unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5001/");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let url = base_url("https://example.org/backend").unwrap();
        assert_eq!(url.as_str(), "https://example.org/backend/");
        assert_eq!(
            url.join("api/auth/session").unwrap().as_str(),
            "https://example.org/backend/api/auth/session"
        );

        let url = base_url(" https://example.org/backend/ ").unwrap();
        assert_eq!(url.as_str(), "https://example.org/backend/");
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            ClientConfig::new("/api"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(ClientConfig::new("").is_err());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_from_lookup_url_precedence() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5001/");

        let config = ClientConfig::from_lookup(lookup(&[(
            "APPSESSION_PUBLIC_API_URL",
            "https://public.example.org",
        )]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://public.example.org/");

        let config = ClientConfig::from_lookup(lookup(&[
            ("APPSESSION_PUBLIC_API_URL", "https://public.example.org"),
            ("APPSESSION_API_URL", "http://authority:5001"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://authority:5001/");

        // Blank counts as unset
        let config = ClientConfig::from_lookup(lookup(&[
            ("APPSESSION_API_URL", " "),
            ("APPSESSION_PUBLIC_API_URL", "https://public.example.org"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://public.example.org/");
    }

    #[test]
    fn test_from_lookup_login_path_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.timeout, None);

        let config = ClientConfig::from_lookup(lookup(&[
            ("APPSESSION_LOGIN_PATH", "/signin"),
            ("APPSESSION_CLIENT_TIMEOUT_SECS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));

        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("APPSESSION_CLIENT_TIMEOUT_SECS", "soon")])),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("APPSESSION_API_URL", "not a url")])),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://localhost:5001")
            .unwrap()
            .with_login_path("/signin")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
