//! Axum route handler for saving a profile.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::handlers::{
    generate_recommendations, generate_roadmap, RecommendationsResponse, RoadmapResponse,
};
use crate::errors::AppError;
use crate::profile::store::{save_profile, SavedProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub skills: String,
    pub interests: String,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub profile: SavedProfile,
    pub recommendations: RecommendationsResponse,
    pub roadmap: RoadmapResponse,
}

/// POST /api/v1/sessions/:id/profile
///
/// Saves the profile, then generates recommendations and a roadmap.
/// Generation only runs once the upsert has succeeded.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    if request.skills.trim().is_empty() || request.interests.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter both skills and interests".to_string(),
        ));
    }

    let mut session = state.session(id).await?;
    session.set_profile_inputs(&request.skills, &request.interests);

    let saved = save_profile(
        state.llm.as_ref(),
        state.index.as_ref(),
        state.index_dimension,
        &request.skills,
        &request.interests,
    )
    .await;

    let profile = match saved {
        Ok(profile) => profile,
        Err(e) => {
            state.sessions.save(&session).await?;
            return Err(AppError::Upstream(format!(
                "Failed to save profile to database: {e}"
            )));
        }
    };
    session.mark_profile_saved();

    let recommendations = generate_recommendations(&state, &mut session).await;
    let roadmap = generate_roadmap(&state, &mut session).await;
    session.show_recommendations = true;
    state.sessions.save(&session).await?;

    Ok(Json(SaveProfileResponse {
        profile,
        recommendations,
        roadmap,
    }))
}
