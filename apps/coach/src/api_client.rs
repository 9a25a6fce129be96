//! Client for the question and feedback endpoints.
//!
//! The controller only sees the `InterviewApi` trait; `HttpInterviewApi` is the
//! production backend and tests swap in a scripted fake.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::Category;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Non-2xx response. `message` is the body's `error` field when present.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Non-2xx response whose body is not JSON.
    #[error("Request failed with status {status}")]
    Unreadable { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
}

impl ServiceError {
    /// True when the service could not be reached or the response was unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Http(_) | ServiceError::Unreadable { .. })
    }
}

#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// POST /api/question
    async fn fetch_question(&self, role: &str, category: Category) -> Result<String, ServiceError>;

    /// POST /api/feedback
    async fn fetch_feedback(&self, question: &str, answer: &str) -> Result<String, ServiceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct QuestionRequest<'a> {
    role: &'a str,
    category: Category,
}

#[derive(Debug, Deserialize)]
struct QuestionReply {
    question: Option<String>,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    question: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct FeedbackReply {
    feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpInterviewApi {
    client: Client,
    base_url: String,
}

impl HttpInterviewApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(90))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let status = status.as_u16();
            let reply = response
                .json::<ErrorReply>()
                .await
                .map_err(|_| ServiceError::Unreadable { status })?;
            return Err(ServiceError::Rejected {
                status,
                message: reply.error.unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn fetch_question(&self, role: &str, category: Category) -> Result<String, ServiceError> {
        let reply: QuestionReply = self
            .post("/api/question", &QuestionRequest { role, category })
            .await?;
        reply.question.ok_or(ServiceError::MissingField("question"))
    }

    async fn fetch_feedback(&self, question: &str, answer: &str) -> Result<String, ServiceError> {
        let reply: FeedbackReply = self
            .post("/api/feedback", &FeedbackRequest { question, answer })
            .await?;
        reply.feedback.ok_or(ServiceError::MissingField("feedback"))
    }
}
