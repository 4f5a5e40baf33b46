/// LLM Client — the single point of entry for all Azure OpenAI calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion service directly.
/// Handlers and services depend on the `CompletionService` trait, carried in
/// `AppState` as `Arc<dyn CompletionService>`.
///
/// Every call is attempted exactly once. No retries, no application-level timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AzureOpenAiConfig, MissingEnv};

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("completion service is not configured ({0})")]
    NotConfigured(MissingEnv),
}

/// Role of a single chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The completion/embedding service. Implement this to swap backends without
/// touching the orchestrator or handlers.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends the ordered messages and returns the generated text.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: CompletionParams,
    ) -> Result<String, LlmError>;

    /// Returns the provider's embedding for `input`, at whatever length it chooses.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text of the first choice.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct AzureError {
    error: AzureErrorBody,
}

#[derive(Debug, Deserialize)]
struct AzureErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Azure OpenAI client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Azure OpenAI chat-completions and embeddings endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: AzureOpenAiConfig,
}

impl LlmClient {
    pub fn new(config: AzureOpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn chat_deployment(&self) -> &str {
        &self.config.chat_deployment
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint, deployment, operation, self.config.api_version
        )
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AzureError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Azure OpenAI returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: CompletionParams,
    ) -> Result<String, LlmError> {
        let deployment = &self.config.chat_deployment;
        let request_body = ChatCompletionRequest {
            model: deployment,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response: ChatCompletionResponse = self
            .post(&self.deployment_url(deployment, "chat/completions"), &request_body)
            .await?
            .json()
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Chat completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response.into_text().ok_or(LlmError::EmptyContent)
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let deployment = &self.config.embedding_deployment;
        let request_body = EmbeddingRequest {
            model: deployment,
            input,
        };

        let response: EmbeddingResponse = self
            .post(&self.deployment_url(deployment, "embeddings"), &request_body)
            .await?
            .json()
            .await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(LlmError::EmptyContent)?;

        debug!("Embedding received: {} dimensions", embedding.len());
        Ok(embedding)
    }
}

/// Stand-in used when the Azure OpenAI settings are incomplete.
/// Every call fails with the list of missing variables.
pub struct UnconfiguredLlm(pub MissingEnv);

#[async_trait]
impl CompletionService for UnconfiguredLlm {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _params: CompletionParams,
    ) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured(self.0.clone()))
    }

    async fn embed(&self, _input: &str) -> Result<Vec<f32>, LlmError> {
        Err(LlmError::NotConfigured(self.0.clone()))
    }
}
