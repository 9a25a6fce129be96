// Interview question and feedback relay.
// All LLM calls go through llm_client — no direct upstream calls here.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod validation;
