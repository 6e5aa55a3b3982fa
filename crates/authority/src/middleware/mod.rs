//! HTTP middleware stack for the authority.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, binary only)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (record on span, echo in response)
//! 4. CORS (credentialed, explicit origins)
//! 5. Session (decode cookie into extensions, slide expiry)

pub mod auth;
pub mod cors;
pub mod request_id;
pub mod session;

pub use auth::CurrentSession;
pub use cors::cors_layer;
pub use request_id::request_id_middleware;
pub use session::{CookiePolicy, SESSION_COOKIE_NAME, SessionCookies, session_middleware};
