use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Question style selected on the setup screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
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

    /// Accepts the display name (any case) or its 1-based position in the menu.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Category::ALL.get(i).copied())
                .ok_or_else(|| format!("No category number {n}"));
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category '{s}'"))
    }
}
