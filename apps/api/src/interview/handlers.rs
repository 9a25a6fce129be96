//! Axum route handlers for the Interview API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::interview::models::{
    Category, FeedbackRequest, FeedbackResponse, QuestionRequest, QuestionResponse,
};
use crate::interview::prompts::{
    feedback_prompt, question_prompt, FEEDBACK_TEMPERATURE, QUESTION_TEMPERATURE,
};
use crate::interview::validation::{validate_category, validate_role, INVALID_ROLE_MESSAGE};
use crate::state::AppState;

pub const MISSING_PAIR_MESSAGE: &str = "Question and answer are required.";
pub const FEEDBACK_FAILED_MESSAGE: &str = "Failed to get feedback.";

/// POST /api/question
///
/// Validates the job title and category, then asks the LLM for one question.
pub async fn handle_question(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionResponse>, AppError> {
    let Json(request) = payload.map_err(|_| AppError::Validation(INVALID_ROLE_MESSAGE.to_string()))?;

    let role = request.role.unwrap_or_default();
    validate_role(&role)?;
    let role = role.split_whitespace().collect::<Vec<_>>().join(" ");

    let category = match request.category.as_deref() {
        Some(raw) => validate_category(raw)?,
        None => Category::default(),
    };

    let prompt = question_prompt(&role, category.as_str());
    let question = state
        .llm
        .complete(&prompt, QUESTION_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm {
            public: e.to_string(),
            detail: format!("question generation failed for role '{role}': {e}"),
        })?;

    info!(%category, "Generated question for '{role}'");

    Ok(Json(QuestionResponse {
        question: question.trim().to_string(),
    }))
}

/// POST /api/feedback
///
/// Asks the LLM to rate an answer. The reply follows `Rating: <n>/10\nFeedback: <text>`.
pub async fn handle_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let Json(request) = payload.map_err(|_| AppError::Validation(MISSING_PAIR_MESSAGE.to_string()))?;

    let (question, answer) = match (request.question, request.answer) {
        // Only empty strings are missing; a blank-looking answer is still sent for rating.
        (Some(q), Some(a)) if !q.is_empty() && !a.is_empty() => (q, a),
        _ => return Err(AppError::Validation(MISSING_PAIR_MESSAGE.to_string())),
    };

    let prompt = feedback_prompt(&question, &answer);
    let feedback = state
        .llm
        .complete(&prompt, FEEDBACK_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm {
            public: FEEDBACK_FAILED_MESSAGE.to_string(),
            detail: format!("feedback failed: {e}"),
        })?;

    Ok(Json(FeedbackResponse {
        feedback: feedback.trim().to_string(),
    }))
}
