//! Session guard middleware.
//!
//! [`require_session`] runs in front of every file route. It validates the
//! session cookie and stores the [`Session`] in request extensions, or
//! short-circuits with a redirect to the login page.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::auth::{Session, SessionManager};
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::LockerError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "locker_session";

/// Build the session cookie for `token`.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// A cookie that, once added to a jar, clears the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Read the session token from the request cookies.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Resolve the request's session, or fail with `Unauthenticated`.
pub fn authorize(sessions: &SessionManager, headers: &HeaderMap) -> Result<Session, LockerError> {
    let token = session_token(headers).ok_or(LockerError::Unauthenticated)?;
    sessions
        .validate(&token)
        .ok_or(LockerError::Unauthenticated)
}

/// Middleware gating a router on a valid session.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&state.sessions, request.headers()) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), "Redirecting unauthenticated request");
            WebError::from(e).into_response()
        }
    }
}

/// Extractor for the session placed by [`require_session`].
///
/// Rejects with a login redirect if the guard did not run.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| LockerError::Unauthenticated.into())
    }
}
