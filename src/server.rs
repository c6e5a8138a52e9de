//! HTTP surface
//!
//! ```text
//! GET /                                      dashboard page
//! GET /api/callbacks/patch-pref-time?value=  cohort figure JSON
//! GET /api/callbacks/patch-pref-dist?value=  cohort figure JSON
//! GET /api/figures/{id}                      static figure JSON
//! GET /api/health                            {"status":"ok", ...}
//! ```
//!
//! Handlers only read the shared [`Dashboard`]; unknown keys answer 404
//! with a JSON error body.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::figure::Figure;
use crate::page::Callback;
use crate::{Error, Result};

type SharedDashboard = Arc<Dashboard>;

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    value: String,
}

/// Build the router over a built dashboard.
pub fn router(dashboard: SharedDashboard) -> Router {
    Router::new()
        .route("/", get(index))
        .route(Callback::PatchPrefTime.path(), get(patch_pref_time))
        .route(Callback::PatchPrefDist.path(), get(patch_pref_dist))
        .route("/api/figures/{id}", get(figure))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns `Server` if the address cannot be bound or serving fails.
pub async fn serve(config: &DashboardConfig, dashboard: SharedDashboard) -> Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_or_else(|_| addr.clone(), |a| a.to_string());
    info!(addr = %local, "Serving presocial dashboard");

    axum::serve(listener, router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(format!("Server on {local} failed: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    info!("Shutting down");
}

async fn index(State(dashboard): State<SharedDashboard>) -> Html<String> {
    Html(dashboard.html().to_owned())
}

async fn patch_pref_time(
    State(dashboard): State<SharedDashboard>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    figure_response(dashboard.patch_pref_time_figure(&query.value))
}

async fn patch_pref_dist(
    State(dashboard): State<SharedDashboard>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    figure_response(dashboard.patch_pref_dist_figure(&query.value))
}

async fn figure(State(dashboard): State<SharedDashboard>, Path(id): Path<String>) -> Response {
    figure_response(dashboard.figure(&id))
}

async fn health(State(dashboard): State<SharedDashboard>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "sessions": dashboard.sessions(),
        "cohorts": dashboard.cohort_labels().len(),
        "figures": dashboard.figure_ids().len(),
    }))
}

fn figure_response(result: Result<&Figure>) -> Response {
    match result {
        Ok(figure) => Json(figure).into_response(),
        Err(e) if e.is_not_found() => {
            warn!(error = %e, "Rejected figure lookup");
            error_response(StatusCode::NOT_FOUND, &e)
        }
        Err(e) => {
            error!(error = %e, "Figure lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

fn error_response(status: StatusCode, e: &Error) -> Response {
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}
