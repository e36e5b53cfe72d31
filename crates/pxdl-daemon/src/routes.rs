//! Axum router and all HTTP handlers for pxdl-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Tests compose the bare router directly.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use pxdl_export::{pipeline, RawDownloadForm};
use tracing::{info, warn};

use crate::{api_types::HealthResponse, page, render, state::AppState};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (tracing) are **not** applied here; `main.rs` attaches
/// them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/download", post(download))
        .route("/v1/health", get(health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub(crate) async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

// ---------------------------------------------------------------------------
// POST /download
// ---------------------------------------------------------------------------

/// The body is decoded as ordered pairs rather than a struct so that every
/// ticked `fields` checkbox survives. A body that cannot be decoded at all is
/// treated as an empty form and fails validation like any other bad input.
pub(crate) async fn download(
    State(st): State<Arc<AppState>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(rejection) => {
            warn!(error = %rejection, "undecodable download form");
            Vec::new()
        }
    };
    let raw = RawDownloadForm::from_pairs(pairs);

    match pipeline::run(st.provider.as_ref(), &raw, st.market).await {
        Ok(artifact) => render::csv_response(artifact),
        Err(err) => {
            if err.status() >= 500 {
                warn!(kind = %err.kind(), error = %err, "download failed");
            } else {
                info!(kind = %err.kind(), error = %err, "download rejected");
            }
            render::error_response(st.error_style, &err)
        }
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}
