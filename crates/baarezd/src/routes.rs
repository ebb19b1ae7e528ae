//! API routes for baarezd

use crate::handlers::{self, QueryRequest, QueryResponse};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use baarez_common::BaarezError;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

type AppStateArc = Arc<AppState>;

/// Error half of a handler result: status plus `{"detail": ...}` body
type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, detail: Value) -> ApiError {
    (status, Json(json!({ "detail": detail })))
}

/// 500 with the error message and its code
fn internal_error(e: &BaarezError) -> ApiError {
    if e.is_storage() {
        error!("  Storage failed (code {}): {}", e.code(), e);
    } else {
        error!("  Request failed (code {}): {}", e.code(), e);
    }
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": e.to_string(), "code": e.code() }),
    )
}

// ============================================================================
// Agent Routes
// ============================================================================

pub fn agent_routes() -> Router<AppStateArc> {
    Router::new().route("/agent/query", post(agent_query))
}

async fn agent_query(
    State(state): State<AppStateArc>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let store = state.store.clone();
    let prompt = req.prompt;

    // The fact store is synchronous SQLite
    let (prompt, decision) = tokio::task::spawn_blocking(move || {
        let decision = handlers::dispatch(&store, &prompt);
        (prompt, decision)
    })
    .await
    .map_err(|e| internal_error(&BaarezError::Internal(format!("dispatch task failed: {}", e))))?;

    let decision = decision.map_err(|e| internal_error(&e))?;

    if !decision.is_dispatched() {
        return Err(api_error(StatusCode::BAD_REQUEST, decision.result));
    }

    match decision.into_response(&prompt) {
        Some(response) => {
            info!("  {} -> {}", response.chosen_tool, response.tool_input);
            Ok(Json(response))
        }
        None => Err(internal_error(&BaarezError::Internal(
            "dispatched decision without a tool".to_string(),
        ))),
    }
}

// ============================================================================
// Info Routes
// ============================================================================

pub fn info_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(root))
}

async fn root(State(state): State<AppStateArc>) -> Json<Value> {
    let store = state.store.clone();
    let facts = match tokio::task::spawn_blocking(move || store.count()).await {
        Ok(Ok(count)) => Some(count),
        Ok(Err(e)) => {
            warn!("  Fact count unavailable: {}", e);
            None
        }
        Err(e) => {
            warn!("  Fact count task failed: {}", e);
            None
        }
    };

    Json(json!({
        "message": "Baarez Agent Backend Running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "facts": facts,
    }))
}
