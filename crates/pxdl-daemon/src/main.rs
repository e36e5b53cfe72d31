//! pxdl-daemon entry point.
//!
//! Thin on purpose: loads configuration, sets up tracing, builds the shared
//! state, wires middleware, and serves until Ctrl-C. Route handlers live in
//! `routes.rs`; shared state types live in `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use pxdl_config::{split_path_list, ENV_CONFIG_PATHS};
use pxdl_daemon::{routes, state};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Dev convenience; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let paths = std::env::var(ENV_CONFIG_PATHS)
        .map(|raw| split_path_list(&raw))
        .unwrap_or_default();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let loaded = pxdl_config::load(&path_refs, |k| std::env::var(k).ok())
        .context("failed to load configuration")?;
    let cfg = &loaded.config;
    info!(
        config_hash = %loaded.config_hash,
        market = cfg.market.as_str(),
        provider = %cfg.provider.base_url,
        error_style = cfg.errors.style.as_str(),
        "configuration loaded"
    );

    let shared = Arc::new(state::AppState::from_config(cfg)?);

    let app = routes::build_router(shared).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let addr = cfg.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("pxdl-daemon listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("pxdl-daemon stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server simply runs until killed.
        warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
