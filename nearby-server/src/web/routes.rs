//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::CachedOutcome;
use crate::export::{export_filename, to_csv};
use crate::pipeline::{InvalidInput, PipelineError};

use super::dto::*;
use super::session::SESSION_HEADER;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/search/export", get(export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Run a search and return ranked results as JSON.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let outcome = run_search(&state, &headers, &params).await?;
    Ok(Json(SearchResponse::from_outcome(&outcome)))
}

/// Run a search and return ranked results as a CSV download.
async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let outcome = run_search(&state, &headers, &params).await?;
    let body = to_csv(&outcome.results).map_err(|e| AppError::Internal {
        message: e.to_string(),
    })?;
    let filename = export_filename(Local::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

async fn run_search(
    state: &AppState,
    headers: &HeaderMap,
    params: &SearchParams,
) -> Result<CachedOutcome, AppError> {
    let query = params.to_query()?;
    let session = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());
    let token = state.sessions.begin(session).await;

    Ok(state.search.search(&query, token).await?)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Conflict { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<InvalidInput> for AppError {
    fn from(e: InvalidInput) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidInput(e) => e.into(),
            PipelineError::Timeout(_) => AppError::Timeout {
                message: e.to_string(),
            },
            PipelineError::Superseded => AppError::Conflict {
                message: e.to_string(),
            },
            PipelineError::Config(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
