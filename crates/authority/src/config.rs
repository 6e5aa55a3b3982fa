//! Authority configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required in production
//! - `APPSESSION_SESSION_SECRET` - Cookie signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `APPSESSION_HOST` - Bind address (default: 127.0.0.1)
//! - `APPSESSION_PORT` - Listen port (default: 5001)
//! - `APPSESSION_ENV` - `production` or `development` (default: development)
//! - `APPSESSION_COOKIE_DOMAIN` - Session cookie domain (production only)
//! - `APPSESSION_ALLOWED_ORIGINS` - Comma-separated CORS origins allowed with credentials
//! - `APPSESSION_CREDENTIALS_FILE` - YAML credential seed file (default: built-in demo tables)
//! - `APPSESSION_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Sliding session lifetime.
pub const SESSION_TTL_HOURS: i64 = 24;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:4200",
    "http://localhost:4300",
    "http://localhost",
];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("Invalid credentials file {0}: {1}")]
    CredentialsFile(String, String),
}

/// Deployment environment. Decides the session cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvVar(
                "APPSESSION_ENV".to_string(),
                format!("unknown environment '{other}'"),
            )),
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Session authority configuration.
#[derive(Clone)]
pub struct AuthorityConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Session cookie domain (ignored outside production)
    pub cookie_domain: Option<String>,
    /// Cookie signing secret
    pub session_secret: SecretString,
    /// Signing secret was generated at startup; sessions end on restart
    pub ephemeral_secret: bool,
    /// Sliding session lifetime
    pub session_ttl: TimeDelta,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    /// YAML credential seed file
    pub credentials_file: Option<PathBuf>,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for AuthorityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("cookie_domain", &self.cookie_domain)
            .field("session_secret", &"[REDACTED]")
            .field("ephemeral_secret", &self.ephemeral_secret)
            .field("session_ttl", &self.session_ttl)
            .field("allowed_origins", &self.allowed_origins)
            .field("credentials_file", &self.credentials_file)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl AuthorityConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if the session
    /// secret is missing in production or fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
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
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        let host = or_default("APPSESSION_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APPSESSION_HOST".to_string(), e.to_string()))?;
        let port = or_default("APPSESSION_PORT", "5001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APPSESSION_PORT".to_string(), e.to_string()))?;
        let environment = Environment::parse(&or_default("APPSESSION_ENV", "development"))?;

        let (session_secret, ephemeral_secret_in_use) = match optional("APPSESSION_SESSION_SECRET") {
            Some(value) => {
                let secret = SecretString::from(value);
                validate_session_secret(&secret, "APPSESSION_SESSION_SECRET")?;
                validate_secret_strength(secret.expose_secret(), "APPSESSION_SESSION_SECRET")?;
                (secret, false)
            }
            None if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar(
                    "APPSESSION_SESSION_SECRET".to_string(),
                ));
            }
            None => (ephemeral_secret(), true),
        };

        let allowed_origins = optional("APPSESSION_ALLOWED_ORIGINS").map_or_else(
            || DEFAULT_ALLOWED_ORIGINS.iter().map(ToString::to_string).collect(),
            |value| parse_origins(&value),
        );

        Ok(Self {
            host,
            port,
            environment,
            cookie_domain: optional("APPSESSION_COOKIE_DOMAIN"),
            session_secret,
            ephemeral_secret: ephemeral_secret_in_use,
            session_ttl: TimeDelta::hours(SESSION_TTL_HOURS),
            allowed_origins,
            credentials_file: optional("APPSESSION_CREDENTIALS_FILE").map(PathBuf::from),
            log_json: optional("APPSESSION_LOG_JSON").is_some(),
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Development configuration with an ephemeral secret and default origins.
    ///
    /// Used by tests and embedders that do not read the environment.
    #[must_use]
    pub fn development() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5001,
            environment: Environment::Development,
            cookie_domain: None,
            session_secret: ephemeral_secret(),
            ephemeral_secret: true,
            session_ttl: TimeDelta::hours(SESSION_TTL_HOURS),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(ToString::to_string).collect(),
            credentials_file: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// 256 random bits, base64url encoded.
fn ephemeral_secret() -> SecretString {
    let bytes: [u8; 32] = rand::random();
    SecretString::from(URL_SAFE_NO_PAD.encode(bytes))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Secret length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
