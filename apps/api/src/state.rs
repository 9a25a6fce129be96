use std::sync::Arc;

use crate::llm_client::ChatCompletion;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a stub in handler tests.
    pub llm: Arc<dyn ChatCompletion>,
}
