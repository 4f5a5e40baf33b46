//! Axum route handlers for the Advisor API: chat, recommendations, roadmap, news.
//!
//! Completion failures are answered with 200 and the rendered error text;
//! the structured failure rides along in `error`.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::orchestrator::{
    complete, display_text, run_prompt, CompletionFailure, PromptSpec,
};
use crate::errors::AppError;
use crate::jobs::handlers::{render_listings, ListingsResponse};
use crate::llm_client::ChatMessage;
use crate::session::{NewsDigest, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub error: Option<CompletionFailure>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub text: String,
    pub error: Option<CompletionFailure>,
    #[serde(flatten)]
    pub parsed: ListingsResponse,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub text: String,
    pub error: Option<CompletionFailure>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub text: String,
    pub updated_label: String,
    pub error: Option<CompletionFailure>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation steps shared with the profile handler
// ────────────────────────────────────────────────────────────────────────────

/// Generates job recommendations for the session's profile and stores the raw text.
pub async fn generate_recommendations(
    state: &AppState,
    session: &mut Session,
) -> RecommendationsResponse {
    let spec = PromptSpec::recommendations(&session.user_skills, &session.user_interests);
    let outcome = run_prompt(state.llm.as_ref(), &spec).await;
    let text = display_text(&outcome);
    session.current_jobs = text.clone();

    RecommendationsResponse {
        parsed: render_listings(&text),
        text,
        error: outcome.err(),
    }
}

/// Generates a learning roadmap for the session's profile and stores it.
pub async fn generate_roadmap(state: &AppState, session: &mut Session) -> RoadmapResponse {
    let spec = PromptSpec::roadmap(&session.user_skills, &session.user_interests);
    let outcome = run_prompt(state.llm.as_ref(), &spec).await;
    let text = display_text(&outcome);
    session.current_roadmap = text.clone();

    RoadmapResponse {
        text,
        error: outcome.err(),
    }
}

fn require_profile_inputs(session: &Session) -> Result<(), AppError> {
    if session.has_profile_inputs() {
        Ok(())
    } else {
        Err(AppError::Precondition(
            "Save a profile with skills and interests first".to_string(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/chat
///
/// Resends the full conversation with the new question. The reply (or the
/// apology text on failure) is appended to the history.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let mut session = state.session(id).await?;

    let outcome = complete(
        state.llm.as_ref(),
        None,
        &request.message,
        Some(session.messages.as_slice()),
    )
    .await;
    let reply = display_text(&outcome);

    session.record_turn(&request.message, &reply);
    state.sessions.save(&session).await?;

    Ok(Json(ChatResponse {
        reply,
        error: outcome.err(),
        messages: session.messages,
    }))
}

/// POST /api/v1/sessions/:id/recommendations/refresh
pub async fn handle_refresh_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let mut session = state.session(id).await?;
    require_profile_inputs(&session)?;

    let response = generate_recommendations(&state, &mut session).await;
    state.sessions.save(&session).await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/roadmap/refresh
pub async fn handle_refresh_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let mut session = state.session(id).await?;
    require_profile_inputs(&session)?;

    let response = generate_roadmap(&state, &mut session).await;
    state.sessions.save(&session).await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/news
///
/// Only available once a profile has been saved in this session.
pub async fn handle_generate_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsResponse>, AppError> {
    let mut session = state.session(id).await?;
    if !session.profile_saved {
        return Err(AppError::Precondition(
            "Save a profile before requesting industry news".to_string(),
        ));
    }

    let spec = PromptSpec::weekly_news(&session.user_interests);
    let outcome = run_prompt(state.llm.as_ref(), &spec).await;
    let digest = NewsDigest {
        text: display_text(&outcome),
        generated_at: Utc::now(),
    };
    let response = NewsResponse {
        text: digest.text.clone(),
        updated_label: digest.updated_label(),
        error: outcome.err(),
    };

    session.last_news = Some(digest);
    state.sessions.save(&session).await?;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/news
pub async fn handle_get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsResponse>, AppError> {
    let session = state.session(id).await?;
    let digest = session
        .last_news
        .ok_or_else(|| AppError::NotFound("No news digest generated yet".to_string()))?;

    Ok(Json(NewsResponse {
        updated_label: digest.updated_label(),
        text: digest.text,
        error: None,
    }))
}
