//! Terminal rendering and input parsing for the interview front end.

use std::fmt::Write as _;

use crate::models::Category;
use crate::session::{HistoryEntry, Session, SessionEvent, SubmitSource};

pub const ROLE_PROMPT: &str = "What job are you applying for? (e.g. Frontend Developer)";

pub const HELP: &str = "\
Type your answer; each line is added to the draft.
  /next   submit the answer and get the next question
  /clear  discard the draft
  /end    end the interview and show your answers
  /quit   exit";

/// A line typed while a question is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Next,
    Clear,
    End,
    Quit,
    Help,
}

pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/next" | "/n" => Input::Next,
        "/clear" => Input::Clear,
        "/end" => Input::End,
        "/quit" | "/q" => Input::Quit,
        "/help" | "/?" => Input::Help,
        _ => Input::Text(line.trim_end().to_string()),
    }
}

pub fn category_prompt() -> String {
    let options: Vec<String> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}) {}", i + 1, c))
        .collect();
    format!("Category [{}] (Enter for Technical)", options.join("  "))
}

/// Countdown values worth printing; every second would flood the terminal.
pub fn should_announce(remaining: u32) -> bool {
    matches!(remaining, 60 | 30 | 10) || (1..=5).contains(&remaining)
}

pub fn render_event(event: &SessionEvent) -> Option<String> {
    let text = match event {
        SessionEvent::QuestionLoaded {
            question,
            time_limit,
        } => format!("\nQuestion: {question}\n(You have {time_limit} seconds. /help for commands.)"),
        SessionEvent::Tick { remaining } if should_announce(*remaining) => {
            let urgency = if *remaining <= 5 { "!" } else { "" };
            format!("Time left: {remaining} seconds{urgency}")
        }
        SessionEvent::Tick { .. } => return None,
        SessionEvent::Submitted {
            source: SubmitSource::Timeout,
        } => "Time's up! Submitting your answer...".to_string(),
        SessionEvent::Submitted {
            source: SubmitSource::Manual,
        } => "Submitting your answer...".to_string(),
        SessionEvent::FeedbackRecorded { index, entry } => {
            format!("Feedback #{} {}", index + 1, render_feedback(entry))
        }
        SessionEvent::Failed(error) => format!("Error: {error}"),
        SessionEvent::Ended => "Interview ended.".to_string(),
    };
    Some(text)
}

fn render_feedback(entry: &HistoryEntry) -> String {
    let label = match entry.feedback.rating {
        Some(_) if entry.feedback.is_strong() => "[strong]",
        Some(_) => "[needs work]",
        None => "[unrated]",
    };
    format!("{label}\n{}", entry.feedback.text)
}

/// The answer list shown when an interview ends.
pub fn render_summary(session: &Session) -> String {
    if session.history.is_empty() {
        return "No answers recorded.".to_string();
    }

    let mut out = String::from("Your Answers\n");
    for (i, entry) in session.history.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, entry.question);
        let _ = writeln!(out, "   Your answer: {}", entry.answer);
        let trigger = match entry.source {
            SubmitSource::Manual => "",
            SubmitSource::Timeout => " (time ran out)",
        };
        let _ = writeln!(
            out,
            "   Submitted {}{trigger}",
            entry.submitted_at.format("%H:%M:%S UTC")
        );
        let _ = writeln!(out, "   Feedback {}", render_feedback(entry));
    }
    if let Some(average) = session.average_rating() {
        let _ = writeln!(out, "\nAverage rating: {average:.1}/10");
    }
    out
}
