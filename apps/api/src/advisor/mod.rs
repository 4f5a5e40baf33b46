// Advisor: chat, job recommendations, learning roadmap and weekly news.
// All LLM calls go through the orchestrator and the CompletionService trait.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
