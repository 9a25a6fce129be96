use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Question style requested by the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Technical,
    Behavioral,
    #[serde(rename = "Problem-solving")]
    ProblemSolving,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Technical,
        Category::Behavioral,
        Category::ProblemSolving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Behavioral => "Behavioral",
            Category::ProblemSolving => "Problem-solving",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown category '{s}'. Choose Technical, Behavioral or Problem-solving.")
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Fields are optional so a missing value surfaces as our own 400 body
/// instead of the extractor's rejection.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}
