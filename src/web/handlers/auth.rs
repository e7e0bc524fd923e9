//! Login and logout handlers.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{CredentialStore, SessionManager};
use crate::storage::StorageGateway;
use crate::web::error::WebError;
use crate::web::middleware::{removal_cookie, session_cookie, SESSION_COOKIE};
use crate::web::{redirect, render};
use crate::LockerError;

/// Application state shared across handlers.
pub struct AppState {
    /// The single configured user.
    pub credentials: Arc<CredentialStore>,
    /// Session token issuer/validator.
    pub sessions: SessionManager,
    /// The storage root.
    pub storage: StorageGateway,
    /// Maximum upload size in bytes.
    pub max_upload_size: usize,
    /// Mark the session cookie `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        credentials: CredentialStore,
        sessions: SessionManager,
        storage: StorageGateway,
        max_upload_size: usize,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions,
            storage,
            max_upload_size,
            secure_cookie: false,
        }
    }

    /// Set whether the session cookie is marked `Secure`.
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }
}

/// Login form fields. Missing fields are treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login - Show the login form.
pub async fn login_form() -> Html<String> {
    Html(render::login_page(None))
}

/// POST /login - Verify credentials and start a session.
///
/// Bad credentials, or a body that is not a login form, re-render the
/// form with a generic notice.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<(CookieJar, Response), WebError> {
    let Form(form) = form.map_err(|e| {
        tracing::warn!("Unreadable login form: {}", e);
        LockerError::AuthFailure
    })?;
    let username = form.username.clone();

    // Argon2 is deliberately slow; keep it off the async workers
    let credentials = state.credentials.clone();
    let verified =
        tokio::task::spawn_blocking(move || credentials.verify(&form.username, &form.password))
            .await
            .map_err(|e| {
                tracing::error!("Credential check failed to run: {}", e);
                WebError::internal("Login failed")
            })?;

    if !verified {
        tracing::warn!(username = %username, "Login failed");
        return Err(LockerError::AuthFailure.into());
    }

    // Replace whatever session this client held before
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(previous.value());
    }

    let token = state.sessions.create(&username).map_err(|e| {
        tracing::error!("Failed to create session: {}", e);
        WebError::internal("Failed to create session")
    })?;

    tracing::info!(username = %username, "Login succeeded");

    let jar = jar.add(session_cookie(token, state.secure_cookie));
    Ok((jar, redirect("/")))
}

/// GET /logout - End the session and return to the login form.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Response) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(session) = state.sessions.validate(cookie.value()) {
            tracing::info!(username = %session.username, "Logged out");
        }
        state.sessions.destroy(cookie.value());
    }

    (jar.remove(removal_cookie()), redirect("/login"))
}
