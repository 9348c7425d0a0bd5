//! Frontend server using axum + embedded static assets
//!
//! Serves the prebuilt console bundle and two JSON endpoints: the ledger
//! state and the server configuration (including the mocked auth mode
//! read from `STRATUM_AUTH_MODE`, defaulting to edit).

use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use rust_embed::Embed;
use serde::Serialize;
use st_ledger::{RevisionStore, Target};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::{GlobalArgs, ServeArgs};
use crate::commands::common::{load_config, open_backend};
use crate::revisions;

/// Environment variable selecting the mocked auth mode
const AUTH_MODE_VAR: &str = "STRATUM_AUTH_MODE";

/// Embedded static assets from the `static/` directory
#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

/// Pre-computed application state shared across all handlers
struct AppState {
    /// Ledger JSON (records, applied state, current revision)
    ledger_json: String,
    /// Server config JSON (project name, auth mode)
    config_json: String,
}

/// One ledger record in the API payload
#[derive(Debug, Serialize)]
struct LedgerEntry {
    revision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    description: String,
    applied: bool,
}

/// Response for /api/ledger.json
#[derive(Debug, Serialize)]
struct LedgerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<String>,
    records: Vec<LedgerEntry>,
}

/// Response for /api/config.json
#[derive(Debug, Serialize)]
struct ConfigResponse {
    project: String,
    auth_mode: String,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let auth_mode =
        std::env::var(AUTH_MODE_VAR).unwrap_or_else(|_| "edit".to_string());

    let state = Arc::new(build_app_state(&config, global, &auth_mode)?);

    let app = Router::new()
        .route("/api/ledger.json", get(get_ledger))
        .route("/api/config.json", get(get_config))
        .fallback(get(static_handler))
        .with_state(state);

    let host = args.host.as_deref().unwrap_or(&config.serve.host);
    let port = args.port.unwrap_or(config.serve.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid host:port")?;

    println!("Serving Stratum console at http://{host}:{port} (auth mode: {auth_mode})");
    println!("Press Ctrl+C to stop.\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Build all pre-computed state from the ledger and database
fn build_app_state(
    config: &crate::config::Config,
    global: &GlobalArgs,
    auth_mode: &str,
) -> Result<AppState> {
    let ledger = revisions::ledger()?;
    let mut backend = open_backend(config, global)?;
    let current = backend.current()?;

    let applied: HashSet<String> = match &current {
        Some(revision) => ledger
            .resolve(None, &Target::Revision(revision.clone()))
            .map(|steps| {
                steps
                    .iter()
                    .map(|s| s.record.revision.to_string())
                    .collect()
            })
            .unwrap_or_default(),
        None => HashSet::new(),
    };

    let records = ledger
        .records()
        .map(|record| LedgerEntry {
            revision: record.revision.to_string(),
            parent: record.parent.as_ref().map(|p| p.to_string()),
            description: record.description.clone(),
            applied: applied.contains(record.revision.as_str()),
        })
        .collect();

    let ledger_response = LedgerResponse {
        current: current.map(|r| r.to_string()),
        records,
    };
    let config_response = ConfigResponse {
        project: config.name.clone(),
        auth_mode: auth_mode.to_string(),
    };

    Ok(AppState {
        ledger_json: serde_json::to_string(&ledger_response)?,
        config_json: serde_json::to_string(&config_response)?,
    })
}

/// GET /api/ledger.json
async fn get_ledger(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.ledger_json.clone(),
    )
}

/// GET /api/config.json
async fn get_config(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.config_json.clone(),
    )
}

/// Fallback handler: serve embedded static assets
async fn static_handler(uri: axum::http::Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    // Default to index.html for root or SPA routes
    let path = if path.is_empty() { "index.html" } else { path };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => match StaticAssets::get("index.html") {
            Some(content) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/html".to_string()),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response(),
            None => (StatusCode::NOT_FOUND, "Not found").into_response(),
        },
    }
}
