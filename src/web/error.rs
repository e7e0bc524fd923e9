//! HTTP error handling for the locker.
//!
//! Every failure reaching the client is one of a handful of categories.
//! Bodies are short HTML pages; internal detail (paths, I/O errors) is
//! logged and never rendered.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{redirect, render};
use crate::LockerError;

/// Error categories surfaced over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad credentials: the login form is shown again.
    AuthFailure,
    /// No valid session: redirect to the login page.
    Unauthenticated,
    /// Bad request (400), including rejected file names.
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Upload exceeds the configured limit (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::AuthFailure => StatusCode::OK,
            ErrorCode::Unauthenticated => StatusCode::FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Web error type.
#[derive(Debug)]
pub struct WebError {
    code: ErrorCode,
    message: String,
}

impl WebError {
    /// Create a new web error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.code {
            ErrorCode::Unauthenticated => redirect("/login"),
            ErrorCode::AuthFailure => Html(render::login_page(Some(&self.message))).into_response(),
            code => {
                let status = code.status_code();
                (status, Html(render::error_page(status, &self.message))).into_response()
            }
        }
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<LockerError> for WebError {
    fn from(err: LockerError) -> Self {
        match &err {
            LockerError::AuthFailure => {
                WebError::new(ErrorCode::AuthFailure, "Invalid username or password")
            }
            LockerError::Unauthenticated => {
                WebError::new(ErrorCode::Unauthenticated, "Login required")
            }
            LockerError::InvalidName(_) => WebError::bad_request(err.to_string()),
            LockerError::NotFound(_) => WebError::not_found("File not found"),
            LockerError::BadRequest(msg) => WebError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Internal error: {}", err);
                WebError::internal("An internal error occurred")
            }
        }
    }
}
