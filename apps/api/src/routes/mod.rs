pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/question", post(handlers::handle_question))
        .route("/api/feedback", post(handlers::handle_feedback))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::interview::handlers::{FEEDBACK_FAILED_MESSAGE, MISSING_PAIR_MESSAGE};
    use crate::interview::validation::INVALID_ROLE_MESSAGE;
    use crate::llm_client::{ChatCompletion, LlmError};

    /// Records every prompt and answers with a canned reply (or an API error).
    struct StubLlm {
        reply: Option<String>,
        prompts: Mutex<Vec<(String, f32)>>,
    }

    impl StubLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<(String, f32)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletion for StubLlm {
        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            self.reply.clone().ok_or(LlmError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    async fn post_json(llm: Arc<StubLlm>, uri: &str, body: Value) -> (StatusCode, Value) {
        let app = build_router(AppState { llm });
        let response = app
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(AppState {
            llm: StubLlm::replying("unused"),
        });
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_question_success() {
        let llm = StubLlm::replying("  Explain the virtual DOM.\n");
        let (status, body) = post_json(
            llm.clone(),
            "/api/question",
            json!({ "role": "Frontend Developer", "category": "Technical" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "question": "Explain the virtual DOM." }));

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0].0,
            "Generate one technical interview question for a Frontend Developer."
        );
        assert_eq!(prompts[0].1, 0.7);
    }

    #[tokio::test]
    async fn test_question_defaults_category_to_technical() {
        let llm = StubLlm::replying("Q?");
        let (status, _) = post_json(
            llm.clone(),
            "/api/question",
            json!({ "role": "Data Engineer" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(llm.prompts()[0].0.contains("one technical interview question"));
    }

    #[tokio::test]
    async fn test_question_rejects_single_word_role_without_calling_llm() {
        let llm = StubLlm::replying("never");
        let (status, body) = post_json(
            llm.clone(),
            "/api/question",
            json!({ "role": "x", "category": "Technical" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": INVALID_ROLE_MESSAGE }));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_question_rejects_unknown_category() {
        let (status, body) = post_json(
            StubLlm::replying("never"),
            "/api/question",
            json!({ "role": "Backend Developer", "category": "Gossip" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Gossip"));
    }

    #[tokio::test]
    async fn test_question_upstream_failure_is_500() {
        let (status, body) = post_json(
            StubLlm::failing(),
            "/api/question",
            json!({ "role": "Backend Developer", "category": "Behavioral" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn test_feedback_success() {
        let llm = StubLlm::replying("Rating: 8/10\nFeedback: Clear and correct.\n");
        let (status, body) = post_json(
            llm.clone(),
            "/api/feedback",
            json!({ "question": "Explain the virtual DOM.", "answer": "A diffed copy." }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "feedback": "Rating: 8/10\nFeedback: Clear and correct." })
        );
        let prompts = llm.prompts();
        assert!(prompts[0].0.contains("Answer: A diffed copy."));
        assert_eq!(prompts[0].1, 0.5);
    }

    #[tokio::test]
    async fn test_feedback_requires_question_and_answer() {
        for body in [
            json!({ "question": "Q?" }),
            json!({ "answer": "A." }),
            json!({ "question": "Q?", "answer": "" }),
            json!({}),
        ] {
            let llm = StubLlm::replying("never");
            let (status, response) = post_json(llm.clone(), "/api/feedback", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": MISSING_PAIR_MESSAGE }));
            assert!(llm.prompts().is_empty());
        }
    }

    #[tokio::test]
    async fn test_feedback_accepts_whitespace_answer() {
        let llm = StubLlm::replying("Rating: 1/10\nFeedback: No answer was given.");
        let (status, body) = post_json(
            llm.clone(),
            "/api/feedback",
            json!({ "question": "Explain the virtual DOM.", "answer": "   " }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "feedback": "Rating: 1/10\nFeedback: No answer was given." })
        );
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_feedback_upstream_failure_is_generic_500() {
        let (status, body) = post_json(
            StubLlm::failing(),
            "/api/feedback",
            json!({ "question": "Q?", "answer": "A." }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": FEEDBACK_FAILED_MESSAGE }));
    }
}
