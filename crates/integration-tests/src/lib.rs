//! Integration test support.
//!
//! Starts the authority in-process on an ephemeral port so tests can drive it
//! over real HTTP with the session client or a bare `reqwest` client.
//!
//! ```bash
//! cargo test -p appsession-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use appsession_authority::{app, config::AuthorityConfig, state::AppState};
use appsession_client::{ClientConfig, RecordingNavigator, SessionClient};
use tokio::task::JoinHandle;

/// A running authority. Stopped on drop.
pub struct TestAuthority {
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl TestAuthority {
    /// Start an authority with development settings and the demo credentials.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built or no port can be bound.
    pub async fn start() -> Self {
        let state = AppState::from_config(AuthorityConfig::development())
            .expect("Failed to build authority state");
        Self::with_state(state).await
    }

    /// Start an authority over prepared state.
    ///
    /// # Panics
    ///
    /// Panics if no port can be bound.
    pub async fn with_state(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app(state)).await {
                tracing::error!(error = %e, "Test authority stopped");
            }
        });

        Self { addr, server }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// A fresh session client (own cookie store, empty cache) and the
    /// navigator it redirects through.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> (SessionClient, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let config = ClientConfig::new(&self.base_url()).expect("Invalid test base URL");
        let client =
            SessionClient::new(&config, navigator.clone()).expect("Failed to build client");
        (client, navigator)
    }

    /// A bare HTTP client with no cookie store, for inspecting raw headers.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn raw_client() -> reqwest::Client {
        reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client")
    }
}

impl Drop for TestAuthority {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// `Set-Cookie` value for the session cookie, if the response carries one.
#[must_use]
pub fn session_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("AppSession="))
        .map(String::from)
}

/// `name=value` part of a `Set-Cookie` value.
#[must_use]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}
