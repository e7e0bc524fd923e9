//! Middleware for the web front-end.

pub mod auth;
pub mod rate_limit;
pub mod security;

pub use auth::{
    authorize, removal_cookie, require_session, session_cookie, session_token, CurrentSession,
    SESSION_COOKIE,
};
pub use rate_limit::{login_rate_limit, RateLimitState};
pub use security::security_headers;
