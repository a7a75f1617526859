//! Web interface
//!
//! Routes:
//! - `GET /` status page with the history table
//! - `GET /set-time?date=YYYY-MM-DD&time=HH:MM`
//! - `GET /set-message?message=...`
//! - `GET /download` history as CSV
//! - `GET /clear-log`
//! - `GET /api/status` JSON summary

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pressurelog_core::datalog::{to_csv_string, LogEntry, DEFAULT_LOG_FILE};
use pressurelog_core::sensor::ClockSource;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::pages::{render_index, IndexView};
use crate::state::AppState;

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/set-time", get(handle_set_time))
        .route("/set-message", get(handle_set_message))
        .route("/download", get(handle_download))
        .route("/clear-log", get(handle_clear_log))
        .route("/api/status", get(handle_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until `shutdown` resolves
pub async fn serve(
    state: AppState,
    bind: &str,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Web interface listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_root(State(state): State<AppState>) -> Html<String> {
    let entries = state.entries();
    let message = state.message();
    let last_save_error = state.last_save_error();

    Html(render_index(&IndexView {
        now: state.clock().now(),
        message: &message,
        live_psi: state.live_reading(),
        last_save_error: last_save_error.as_deref(),
        entries: &entries,
        capacity: state.store().capacity(),
        build_id: crate::BUILD_ID,
    }))
}

#[derive(Debug, Deserialize)]
struct SetTimeParams {
    date: String,
    time: String,
}

/// Parse the `date` and `time` form fields
fn parse_form_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(date.and_time(time))
}

async fn handle_set_time(
    State(state): State<AppState>,
    Query(params): Query<SetTimeParams>,
) -> Response {
    match parse_form_time(&params.date, &params.time) {
        Some(target) => {
            state.clock().adjust(target);
            Redirect::to("/").into_response()
        }
        None => (StatusCode::BAD_REQUEST, "Invalid date or time").into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SetMessageParams {
    message: String,
}

async fn handle_set_message(
    State(state): State<AppState>,
    Query(params): Query<SetMessageParams>,
) -> Redirect {
    state.set_message(&params.message);
    Redirect::to("/")
}

async fn handle_download(State(state): State<AppState>) -> Response {
    let entries = state.entries();
    if entries.is_empty() {
        return (StatusCode::NOT_FOUND, "No log available.").into_response();
    }

    let disposition = format!("attachment; filename=\"{DEFAULT_LOG_FILE}\"");
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        to_csv_string(&entries),
    )
        .into_response()
}

async fn handle_clear_log(State(state): State<AppState>) -> Redirect {
    state.clear_history();
    Redirect::to("/")
}

/// `GET /api/status` body
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub build_id: String,
    pub entries: usize,
    pub capacity: usize,
    pub latest: Option<LogEntry>,
    pub live_psi: Option<f64>,
    pub last_save_error: Option<String>,
}

async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.store();
    Json(StatusResponse {
        version: pressurelog_core::VERSION.to_string(),
        build_id: crate::BUILD_ID.to_string(),
        entries: store.len(),
        capacity: store.capacity(),
        latest: store.latest(),
        live_psi: state.live_reading(),
        last_save_error: state.last_save_error(),
    })
}
