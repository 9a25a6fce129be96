//! Interview session: data model, events and the controller that drives them.

pub mod controller;
pub mod countdown;
pub mod phase;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::feedback::Feedback;
use crate::models::Category;

pub use controller::{SessionController, SessionHandle};
pub use phase::Phase;

/// Role used when the candidate leaves the job title empty.
pub const DEFAULT_ROLE: &str = "data engineer";

/// Seconds allowed per question unless configured otherwise.
pub const DEFAULT_TIME_LIMIT: u32 = 120;

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitSource {
    Manual,
    Timeout,
}

/// One answered question. Entries are stored in submission order and the
/// feedback lives on its entry, so a repeated question never overwrites an
/// earlier one's feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub feedback: Feedback,
    pub source: SubmitSource,
    pub submitted_at: DateTime<Utc>,
}

/// The whole state of one interview run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub role: String,
    pub category: Category,
    pub current_question: Option<String>,
    pub answer_draft: String,
    pub time_remaining: u32,
    pub history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(time_limit: u32) -> Self {
        Self {
            phase: Phase::Idle,
            role: String::new(),
            category: Category::default(),
            current_question: None,
            answer_draft: String::new(),
            time_remaining: time_limit,
            history: Vec::new(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase.is_active()
    }

    /// Mean of the ratings that could be parsed, if any.
    pub fn average_rating(&self) -> Option<f32> {
        let ratings: Vec<u8> = self
            .history
            .iter()
            .filter_map(|entry| entry.feedback.rating)
            .collect();
        if ratings.is_empty() {
            return None;
        }
        let total: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
        Some(total as f32 / ratings.len() as f32)
    }
}

/// Failures surfaced to the front end. None of them end the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The question service rejected the role or category.
    #[error("{0}")]
    Validation(String),

    /// The question service failed or could not be reached.
    #[error("{0}")]
    Upstream(String),

    /// The controller task is gone.
    #[error("Interview session has shut down")]
    Closed,
}

/// Notifications for front ends, in the order the controller applied them.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    QuestionLoaded { question: String, time_limit: u32 },
    Tick { remaining: u32 },
    Submitted { source: SubmitSource },
    FeedbackRecorded { index: usize, entry: HistoryEntry },
    Failed(SessionError),
    Ended,
}
