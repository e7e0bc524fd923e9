//! Web front-end for the locker.
//!
//! Thin HTTP layer: login/logout, and the file operations behind the
//! session guard.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod router;
pub mod server;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};

pub use error::WebError;
pub use router::create_router;
pub use server::WebServer;

/// A `302 Found` redirect to `location`.
pub fn redirect(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
