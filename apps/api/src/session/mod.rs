//! Per-session state.
//!
//! Each session is an isolated unit: one client's chat history, profile
//! inputs and last generated texts. Nothing is shared across sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::ChatMessage;

pub mod handlers;
pub mod store;

pub use store::{InMemorySessionStore, RedisSessionStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl NewsDigest {
    pub fn updated_label(&self) -> String {
        format!("Last updated: {}", self.generated_at.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    pub user_skills: String,
    pub user_interests: String,
    /// Set once a profile upsert succeeds; never cleared.
    pub profile_saved: bool,
    pub show_recommendations: bool,
    pub current_jobs: String,
    pub current_roadmap: String,
    pub last_news: Option<NewsDigest>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            messages: Vec::new(),
            user_skills: String::new(),
            user_interests: String::new(),
            profile_saved: false,
            show_recommendations: false,
            current_jobs: String::new(),
            current_roadmap: String::new(),
            last_news: None,
        }
    }

    pub fn record_turn(&mut self, user_input: &str, reply: &str) {
        self.messages.push(ChatMessage::user(user_input));
        self.messages.push(ChatMessage::assistant(reply));
    }

    pub fn clear_chat(&mut self) {
        self.messages.clear();
    }

    /// Remembers the inputs of a save attempt, successful or not.
    pub fn set_profile_inputs(&mut self, skills: &str, interests: &str) {
        self.user_skills = skills.to_string();
        self.user_interests = interests.to_string();
    }

    pub fn mark_profile_saved(&mut self) {
        self.profile_saved = true;
    }

    pub fn has_profile_inputs(&self) -> bool {
        !self.user_skills.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session persistence. Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError>;
    async fn save(&self, session: &Session) -> Result<(), SessionError>;
}
