//! In-process fakes for the remote services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{ChatMessage, CompletionParams, CompletionService, LlmError};
use crate::session::InMemorySessionStore;
use crate::state::AppState;
use crate::vector_index::{VectorIndex, VectorIndexError, VectorRecord};

fn api_error(message: &str) -> LlmError {
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Answers every chat call with `reply` and every embed call with `embedding`.
/// Construct with `failing` to make both calls fail.
pub struct FakeLlm {
    reply: Result<String, String>,
    embedding: Result<Vec<f32>, String>,
    calls: Mutex<Vec<(Vec<ChatMessage>, CompletionParams)>>,
}

impl FakeLlm {
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            embedding: Ok(vec![0.5; 4]),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_embedding(embedding: Vec<f32>) -> Self {
        Self {
            reply: Ok("ok".to_string()),
            embedding: Ok(embedding),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            embedding: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<(Vec<ChatMessage>, CompletionParams)> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for FakeLlm {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: CompletionParams,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((messages.to_vec(), params));
        self.reply.clone().map_err(|m| api_error(&m))
    }

    async fn embed(&self, _input: &str) -> Result<Vec<f32>, LlmError> {
        self.embedding.clone().map_err(|m| api_error(&m))
    }
}

/// Keeps upserted records in a map keyed by id.
#[derive(Default)]
pub struct FakeIndex {
    records: Mutex<HashMap<String, VectorRecord>>,
    upserts: Mutex<usize>,
    failure: Option<String>,
}

impl FakeIndex {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn records(&self) -> HashMap<String, VectorRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn upsert_calls(&self) -> usize {
        *self.upserts.lock().unwrap()
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<u32, VectorIndexError> {
        *self.upserts.lock().unwrap() += 1;
        if let Some(message) = &self.failure {
            return Err(VectorIndexError::Api {
                status: 503,
                message: message.clone(),
            });
        }
        let count = records.len() as u32;
        let mut stored = self.records.lock().unwrap();
        for record in records {
            stored.insert(record.id.clone(), record);
        }
        Ok(count)
    }
}

/// App state wired to the given fakes and an in-memory session store.
pub fn test_state(llm: Arc<FakeLlm>, index: Arc<FakeIndex>) -> AppState {
    AppState {
        llm,
        index,
        sessions: Arc::new(InMemorySessionStore::new(60 * 60)),
        index_dimension: 8,
    }
}
