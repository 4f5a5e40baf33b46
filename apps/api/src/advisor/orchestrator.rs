//! Prompt Orchestrator — assembles system instructions, optional chat history
//! and the user turn into one completion call.
//!
//! Completion failures are returned as `CompletionFailure`, never raised.
//! Handlers turn them into display text with `render()`, so a conversation
//! turn always produces a reply.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::advisor::prompts::{
    RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM, ROADMAP_PROMPT_TEMPLATE,
    ROADMAP_SYSTEM, WEEKLY_NEWS_PROMPT_TEMPLATE, WEEKLY_NEWS_SYSTEM,
};
use crate::llm_client::prompts::DEFAULT_ADVISOR_SYSTEM;
use crate::llm_client::{ChatMessage, CompletionParams, CompletionService};

pub const TEMPERATURE: f32 = 0.7;
pub const CHAT_MAX_TOKENS: u32 = 800;
pub const DIRECT_MAX_TOKENS: u32 = 1000;

/// Chat turns resend history; direct calls send one system and one user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Chat,
    Direct,
}

impl CallKind {
    pub fn params(self) -> CompletionParams {
        CompletionParams {
            temperature: TEMPERATURE,
            max_tokens: match self {
                CallKind::Chat => CHAT_MAX_TOKENS,
                CallKind::Direct => DIRECT_MAX_TOKENS,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct CompletionFailure {
    pub kind: CallKind,
    /// Description of the underlying remote error.
    pub message: String,
}

impl CompletionFailure {
    /// User-facing text for the failed call.
    pub fn render(&self) -> String {
        match self.kind {
            CallKind::Chat => format!(
                "I apologize, but I'm having trouble responding right now. Error: {}",
                self.message
            ),
            CallKind::Direct => format!("Error generating response: {}", self.message),
        }
    }
}

/// Renders either outcome as display text.
pub fn display_text(outcome: &Result<String, CompletionFailure>) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(failure) => failure.render(),
    }
}

/// Sends one completion request.
///
/// With `history`, the system message (explicit or the default advisor
/// instruction) is followed by every prior turn and then `user_input`.
/// Without it, exactly one system and one user message are sent.
pub async fn complete(
    llm: &dyn CompletionService,
    system_instructions: Option<&str>,
    user_input: &str,
    history: Option<&[ChatMessage]>,
) -> Result<String, CompletionFailure> {
    let system = system_instructions.unwrap_or(DEFAULT_ADVISOR_SYSTEM);
    let prior = history.unwrap_or_default();
    let kind = if history.is_some() {
        CallKind::Chat
    } else {
        CallKind::Direct
    };

    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend_from_slice(prior);
    messages.push(ChatMessage::user(user_input));

    llm.chat(&messages, kind.params()).await.map_err(|e| {
        warn!("{kind:?} completion failed: {e}");
        CompletionFailure {
            kind,
            message: e.to_string(),
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Role-specific prompts
// ────────────────────────────────────────────────────────────────────────────

/// System instructions plus the named values substituted into the user template.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub system_instructions: &'static str,
    pub template: &'static str,
    pub user_variables: Vec<(&'static str, String)>,
}

impl PromptSpec {
    pub fn recommendations(skills: &str, interests: &str) -> Self {
        Self {
            system_instructions: RECOMMENDATION_SYSTEM,
            template: RECOMMENDATION_PROMPT_TEMPLATE,
            user_variables: vec![
                ("skills", skills.to_string()),
                ("interests", interests.to_string()),
            ],
        }
    }

    pub fn roadmap(skills: &str, interests: &str) -> Self {
        Self {
            system_instructions: ROADMAP_SYSTEM,
            template: ROADMAP_PROMPT_TEMPLATE,
            user_variables: vec![
                ("skills", skills.to_string()),
                ("interests", interests.to_string()),
            ],
        }
    }

    pub fn weekly_news(interests: &str) -> Self {
        Self {
            system_instructions: WEEKLY_NEWS_SYSTEM,
            template: WEEKLY_NEWS_PROMPT_TEMPLATE,
            user_variables: vec![("interests", interests.to_string())],
        }
    }

    /// Fills each `{name}` placeholder in a single pass, so values that
    /// themselves contain braces are inserted verbatim. Unknown placeholders
    /// are left as written.
    pub fn render_user_prompt(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.user_variables
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (value, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Runs a role-specific prompt as a direct (history-free) call.
pub async fn run_prompt(
    llm: &dyn CompletionService,
    spec: &PromptSpec,
) -> Result<String, CompletionFailure> {
    complete(
        llm,
        Some(spec.system_instructions),
        &spec.render_user_prompt(),
        None,
    )
    .await
}
