use std::sync::Arc;

use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::session::{Session, SessionStore};
use crate::vector_index::VectorIndex;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Azure OpenAI client, or a stand-in reporting missing configuration.
    pub llm: Arc<dyn CompletionService>,
    /// Pinecone index, or a stand-in reporting missing configuration.
    pub index: Arc<dyn VectorIndex>,
    pub sessions: Arc<dyn SessionStore>,
    /// Dimensionality every stored profile vector is normalized to.
    pub index_dimension: usize,
}

impl AppState {
    pub async fn session(&self, id: Uuid) -> Result<Session, AppError> {
        self.sessions
            .load(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }
}
