//! Profile Store — embeds a skills/interests profile and upserts it by a
//! deterministic id, so re-saving the same text overwrites the same record.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::llm_client::CompletionService;
use crate::profile::embedding::{fallback_embedding, normalize};
use crate::vector_index::{VectorIndex, VectorIndexError, VectorRecord};

pub const PROFILE_TYPE: &str = "user_profile";

/// Outcome of a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SavedProfile {
    pub profile_id: String,
    pub dimension: usize,
    /// Set when the embedding call failed and the fallback vector was stored.
    pub embedding_warning: Option<String>,
}

/// Text sent to the embedding endpoint.
pub fn profile_text(skills: &str, interests: &str) -> String {
    format!("Skills: {skills}. Interests: {interests}")
}

/// `"user_"` plus the first 10 hex characters of MD5(`"{skills}_{interests}"`).
pub fn profile_id(skills: &str, interests: &str) -> String {
    let digest = md5::compute(format!("{skills}_{interests}").as_bytes());
    let hex = format!("{digest:x}");
    format!("user_{}", &hex[..10])
}

/// Embeds and upserts the profile.
///
/// An embedding failure is not fatal: the fallback vector is stored and the
/// error is returned as `embedding_warning`. Upsert failures are returned.
pub async fn save_profile(
    llm: &dyn CompletionService,
    index: &dyn VectorIndex,
    dimension: usize,
    skills: &str,
    interests: &str,
) -> Result<SavedProfile, VectorIndexError> {
    let (vector, embedding_warning) = match llm.embed(&profile_text(skills, interests)).await {
        Ok(embedding) => (normalize(embedding, dimension), None),
        Err(e) => {
            warn!("Embedding error, storing fallback vector: {e}");
            (fallback_embedding(dimension), Some(format!("Embedding error: {e}")))
        }
    };

    let id = profile_id(skills, interests);

    let mut metadata = Map::new();
    metadata.insert("skills".to_string(), Value::from(skills));
    metadata.insert("interests".to_string(), Value::from(interests));
    metadata.insert("type".to_string(), Value::from(PROFILE_TYPE));
    metadata.insert("dimension".to_string(), Value::from(vector.len()));
    metadata.insert("timestamp".to_string(), Value::from(Utc::now().to_rfc3339()));

    index
        .upsert(vec![VectorRecord {
            id: id.clone(),
            values: vector,
            metadata,
        }])
        .await?;

    info!("Saved profile {id}");

    Ok(SavedProfile {
        profile_id: id,
        dimension,
        embedding_warning,
    })
}
