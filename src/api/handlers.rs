//! HTTP request handlers

use super::types::{
    ErrorResponse, SessionCreatedResponse, SessionResponse, SuccessResponse, TreeIssuesResponse,
};
use super::AppState;
use crate::runtime::{Reply, RuntimeError};
use crate::state_machine::{Event, InboundEvent, TransitionError};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session).delete(delete_session),
        )
        // Platform input
        .route("/api/sessions/:id/events", post(send_event))
        // Tree diagnostics
        .route("/api/tree/issues", get(tree_issues))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionCreatedResponse>, AppError> {
    let (session_id, reply) = state.runtime.open().await?;
    Ok(Json(SessionCreatedResponse { session_id, reply }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let stored = state
        .runtime
        .stored(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown session {id}")))?;

    Ok(Json(SessionResponse {
        session_id: id,
        attributes: stored.attributes,
        updated_at: stored.updated_at,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.runtime.discard(&id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("Unknown session {id}")))
    }
}

async fn send_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<InboundEvent>, JsonRejection>,
) -> Result<Json<Reply>, AppError> {
    let Json(inbound) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if inbound.intent_name.trim().is_empty() {
        return Err(AppError::BadRequest("intentName is required".to_string()));
    }

    let reply = state.runtime.handle(&id, Event::from(inbound)).await?;
    Ok(Json(reply))
}

// ============================================================
// Tree
// ============================================================

async fn tree_issues(State(state): State<AppState>) -> Json<TreeIssuesResponse> {
    let store = &state.runtime.context().store;
    Json(TreeIssuesResponse {
        root: store.root().to_string(),
        nodes: store.len(),
        issues: state.issues.as_ref().clone(),
    })
}

async fn get_version() -> &'static str {
    concat!("voxbot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(error: RuntimeError) -> Self {
        match error {
            RuntimeError::Transition(TransitionError::SessionEnded) => {
                AppError::Conflict(error.to_string())
            }
            RuntimeError::CorruptSession(_) | RuntimeError::Storage(_) | RuntimeError::Silent => {
                tracing::error!(error = %error, "Runtime failure");
                AppError::Internal(error.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
