//! File handlers.
//!
//! Every handler here sits behind the session guard and receives the
//! current session through [`CurrentSession`].

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::storage::sanitize_name;
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::middleware::CurrentSession;
use crate::web::{redirect, render};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Build an inline `Content-Disposition` value for `filename`.
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename` parameter so the header cannot be split or broken out
/// of. Non-ASCII names also get an RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && sanitized == filename {
        return format!("inline; filename=\"{filename}\"");
    }

    let ascii_fallback: String = sanitized
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback,
        urlencoding::encode(filename)
    )
}

fn multipart_error(e: MultipartError) -> WebError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected: {}", e);
        WebError::payload_too_large("File too large")
    } else {
        tracing::warn!("Failed to read multipart upload: {}", e);
        WebError::bad_request("Invalid upload")
    }
}

/// GET / - List stored files.
pub async fn index(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Result<Html<String>, WebError> {
    let files = state.storage.list()?;
    Ok(Html(render::files_page(&session.username, &files)))
}

/// POST /upload - Store the submitted file under its own name.
///
/// Request body: multipart/form-data with a "file" field. An existing file
/// with the same name is replaced.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, content.to_vec()));
        break;
    }

    let (filename, content) = upload.ok_or_else(|| WebError::bad_request("No file provided"))?;

    let stored = state.storage.save(&filename, &content)?;

    tracing::info!(
        username = %session.username,
        file = %stored.name,
        size = stored.size,
        "File uploaded"
    );

    Ok(redirect("/"))
}

/// GET /files/:name - Return a stored file's raw bytes.
pub async fn download(
    State(state): State<Arc<AppState>>,
    CurrentSession(_session): CurrentSession,
    Path(name): Path<String>,
) -> Result<Response, WebError> {
    let content = state.storage.fetch(&name)?;
    let name = sanitize_name(&name).map_err(crate::LockerError::from)?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition_header(&name)),
            // Served files must not run script in our origin
            (header::CONTENT_SECURITY_POLICY, "sandbox".to_string()),
        ],
        content,
    )
        .into_response())
}

/// GET /delete/:name - Remove a stored file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Path(name): Path<String>,
) -> Result<Response, WebError> {
    state.storage.delete(&name)?;

    tracing::info!(username = %session.username, file = %name, "File deleted");

    Ok(redirect("/"))
}
