use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session = Session::new();
    state.sessions.save(&session).await?;
    info!("Created session {}", session.id);
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.session(id).await?))
}

/// DELETE /api/v1/sessions/:id/chat
pub async fn handle_clear_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut session = state.session(id).await?;
    session.clear_chat();
    state.sessions.save(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
