// AI-assisted content: cover letters and improvement suggestions.
// All LLM calls go through llm_client. Every path has a rule-based result
// when the LLM is disabled or fails.

pub mod cover_letter;
pub mod handlers;
pub mod prompts;
pub mod suggestions;
pub mod tone;
