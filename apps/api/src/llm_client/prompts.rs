// Shared prompt constants.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// Default system instruction for chat turns that do not supply their own.
pub const DEFAULT_ADVISOR_SYSTEM: &str =
    "You are a career advisor. Provide helpful career guidance.";
