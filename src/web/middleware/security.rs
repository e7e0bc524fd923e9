//! Security headers middleware.

use axum::{
    extract::Request,
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

/// Adds browser hardening headers to every response:
/// - X-Content-Type-Options: nosniff
/// - X-Frame-Options: DENY
/// - Referrer-Policy: same-origin
/// - Cache-Control: no-store (unless a handler set its own)
///
/// Strict-Transport-Security belongs at the reverse proxy, which terminates HTTPS.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("same-origin"));

    // Pages and files are private to the logged-in user
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}
