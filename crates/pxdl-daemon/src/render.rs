//! Turning pipeline outcomes into HTTP responses.
//!
//! Success is always the CSV attachment. Failures share one status code and
//! one sanitized message per [`DownloadError`]; [`ErrorStyle`] only picks the
//! body format.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use pxdl_config::ErrorStyle;
use pxdl_export::{CsvArtifact, DownloadError};

use crate::api_types::ErrorResponse;

pub fn csv_response(artifact: CsvArtifact) -> Response {
    let disposition = artifact.content_disposition();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.content,
    )
        .into_response()
}

pub fn error_response(style: ErrorStyle, err: &DownloadError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = err.user_message();

    match style {
        ErrorStyle::Plain => (status, message).into_response(),
        ErrorStyle::Json => (
            status,
            Json(ErrorResponse {
                error: err.kind().as_str().to_string(),
                message,
            }),
        )
            .into_response(),
        ErrorStyle::Alert => (status, Html(alert_page(&message))).into_response(),
    }
}

/// Pop the message in a browser dialog, then return to the form.
pub fn alert_page(message: &str) -> String {
    format!(
        "<script>alert(\"{}\");window.history.back();</script>",
        escape_js_string(message)
    )
}

/// Escape for a double-quoted JS literal inside an inline `<script>`.
///
/// `<`, `>` and `&` are emitted as `\uXXXX` so the text can never close the
/// script element or start an entity.
fn escape_js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
