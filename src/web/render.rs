//! HTML pages.
//!
//! Pure presentation: handlers pass in plain data and get markup back.
//! Every interpolated value is escaped; file names in links are also
//! percent-encoded.

use axum::http::StatusCode;

/// Application title shown on every page.
pub const TITLE: &str = "Locker";

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// The login form, optionally with an error notice.
pub fn login_page(error: Option<&str>) -> String {
    let notice = error
        .map(|msg| format!("<p class=\"error\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default();

    page(&format!(
        "<h2>Login</h2>\n{notice}<form method=\"post\" action=\"/login\">\n  \
         <input type=\"text\" name=\"username\" placeholder=\"Username\"><br>\n  \
         <input type=\"password\" name=\"password\" placeholder=\"Password\"><br>\n  \
         <button type=\"submit\">Sign in</button>\n</form>\n"
    ))
}

/// The file list with upload form.
pub fn files_page(username: &str, files: &[String]) -> String {
    let mut items = String::new();
    for name in files {
        let label = escape_html(name);
        let encoded = urlencoding::encode(name);
        items.push_str(&format!(
            "  <li>{label} - <a href=\"/files/{encoded}\">View</a> | \
             <a href=\"/delete/{encoded}\">Delete</a></li>\n"
        ));
    }

    page(&format!(
        "<h2>{TITLE}</h2>\n<p>Signed in as {} | <a href=\"/logout\">Logout</a></p>\n\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n  \
         <input type=\"file\" name=\"file\">\n  \
         <button type=\"submit\">Upload</button>\n</form>\n<ul>\n{items}</ul>\n",
        escape_html(username)
    ))
}

/// A generic error page.
pub fn error_page(status: StatusCode, message: &str) -> String {
    page(&format!(
        "<h2>{}</h2>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>\n",
        status.as_u16(),
        escape_html(message)
    ))
}
