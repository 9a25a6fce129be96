//! Feedback text and the rating embedded in it.
//!
//! The feedback service answers in the form `Rating: <1-10>/10\nFeedback: <text>`.
//! The model does not always comply, so the rating is optional.

/// Shown when the feedback service answered but carried no feedback.
pub const NO_FEEDBACK: &str = "No feedback received.";
/// Shown when the feedback service could not be reached.
pub const FEEDBACK_ERROR: &str = "Error getting feedback.";

/// Ratings at or above this are highlighted as strong answers.
pub const STRONG_RATING: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub rating: Option<u8>,
}

impl Feedback {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let rating = parse_rating(&text);
        Self { text, rating }
    }

    /// Placeholder used when no real feedback is available.
    pub fn placeholder(text: &str) -> Self {
        Self {
            text: text.to_string(),
            rating: None,
        }
    }

    pub fn is_strong(&self) -> bool {
        self.rating.is_some_and(|r| r >= STRONG_RATING)
    }
}

/// Extracts `n` from the first `Rating: n` (optionally `n/10`), case-insensitive.
/// Returns `None` unless `n` is within 1–10.
pub fn parse_rating(text: &str) -> Option<u8> {
    let lower = text.to_lowercase();
    let start = lower.find("rating:")? + "rating:".len();
    let digits: String = lower[start..]
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let rating = digits.parse::<u8>().ok()?;
    (1..=10).contains(&rating).then_some(rating)
}
