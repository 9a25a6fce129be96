mod api_client;
mod config;
mod console;
mod feedback;
mod models;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::HttpInterviewApi;
use crate::config::Config;
use crate::console::{
    category_prompt, parse_input, render_event, render_summary, Input, HELP, ROLE_PROMPT,
};
use crate::models::Category;
use crate::session::{Phase, SessionController, SessionEvent, SessionHandle};

/// What the next typed line means.
enum Screen {
    Role,
    Category { role: String },
    /// Between submission/start and the next question.
    Waiting,
    Answering,
}

enum Flow {
    Continue,
    Quit,
}

struct Driver {
    handle: SessionHandle,
    screen: Screen,
}

impl Driver {
    fn new(handle: SessionHandle) -> Self {
        println!("AI Interview Prep");
        println!("{ROLE_PROMPT}");
        Self {
            handle,
            screen: Screen::Role,
        }
    }

    fn on_line(&mut self, line: &str) -> Result<Flow> {
        match std::mem::replace(&mut self.screen, Screen::Waiting) {
            Screen::Role => {
                println!("{}", category_prompt());
                self.screen = Screen::Category {
                    role: line.trim().to_string(),
                };
            }
            Screen::Category { role } => {
                let category = match line.trim() {
                    "" => None,
                    raw => match raw.parse::<Category>() {
                        Ok(category) => Some(category),
                        Err(e) => {
                            println!("{e}");
                            println!("{}", category_prompt());
                            self.screen = Screen::Category { role };
                            return Ok(Flow::Continue);
                        }
                    },
                };
                self.handle.start(&role, category)?;
                println!("Loading your first question...");
            }
            Screen::Waiting => match parse_input(line) {
                Input::Quit => return Ok(Flow::Quit),
                Input::End => self.end_interview()?,
                _ => println!("Please wait for the next question."),
            },
            Screen::Answering => {
                self.screen = Screen::Answering;
                match parse_input(line) {
                    Input::Text(text) if text.is_empty() => {}
                    Input::Text(text) => self.handle.append_answer(text)?,
                    Input::Next => self.handle.submit()?,
                    Input::Clear => {
                        self.handle.edit_answer(String::new())?;
                        println!("Draft cleared.");
                    }
                    Input::End => self.end_interview()?,
                    Input::Quit => return Ok(Flow::Quit),
                    Input::Help => println!("{HELP}"),
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn on_event(&mut self, event: SessionEvent) {
        // Until the next start, anything still buffered belongs to an interview
        // the user already left.
        if matches!(self.screen, Screen::Role | Screen::Category { .. }) {
            return;
        }
        if let SessionEvent::QuestionLoaded { question, .. } = &event {
            let session = self.handle.snapshot();
            if session.phase != Phase::QuestionActive
                || session.current_question.as_ref() != Some(question)
            {
                return;
            }
        }

        if let Some(text) = render_event(&event) {
            println!("{text}");
        }

        match event {
            SessionEvent::QuestionLoaded { .. } => self.screen = Screen::Answering,
            SessionEvent::Submitted { .. } => self.screen = Screen::Waiting,
            SessionEvent::Failed(_) => {
                let session = self.handle.snapshot();
                if !session.history.is_empty() {
                    println!("{}", render_summary(&session));
                }
                self.screen = Screen::Role;
                println!("{ROLE_PROMPT}");
            }
            _ => {}
        }
    }

    fn end_interview(&mut self) -> Result<()> {
        let session = self.handle.snapshot();
        self.handle.end()?;
        println!("{}", render_summary(&session));
        self.screen = Screen::Role;
        println!("\n{ROLE_PROMPT}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they do not interleave with the interview.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting interview coach v{} (api: {}, {}s per question)",
        env!("CARGO_PKG_VERSION"),
        config.api_url,
        config.time_limit
    );

    let api = Arc::new(HttpInterviewApi::new(&config.api_url));
    let handle = SessionController::spawn(api, config.time_limit);
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut driver = Driver::new(handle.clone());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                if let Flow::Quit = driver.on_line(&line)? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => driver.on_event(event),
                Err(RecvError::Lagged(missed)) => warn!("Missed {missed} session events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.end()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{InterviewApi, ServiceError};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedApi;

    #[async_trait]
    impl InterviewApi for FixedApi {
        async fn fetch_question(&self, _: &str, _: Category) -> Result<String, ServiceError> {
            Ok("Explain the virtual DOM.".to_string())
        }

        async fn fetch_feedback(&self, _: &str, _: &str) -> Result<String, ServiceError> {
            Ok("Rating: 7/10\nFeedback: Solid.".to_string())
        }
    }

    async fn started_driver() -> (Driver, SessionHandle) {
        let handle = SessionController::spawn(Arc::new(FixedApi), 120);
        let mut driver = Driver::new(handle.clone());
        driver.on_line("Frontend Developer").unwrap();
        driver.on_line("1").unwrap();
        handle
            .watch()
            .wait_for(|s| s.phase == Phase::QuestionActive)
            .await
            .unwrap();
        (driver, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_loaded_question_opens_answering() {
        let (mut driver, handle) = started_driver().await;
        let mut events = handle.subscribe();
        assert!(matches!(driver.screen, Screen::Waiting));

        handle.end().unwrap();
        handle.start("Frontend Developer", None).unwrap();
        loop {
            let event = events.recv().await.unwrap();
            let loaded = matches!(event, SessionEvent::QuestionLoaded { .. });
            driver.on_event(event);
            if loaded {
                break;
            }
        }
        assert!(matches!(driver.screen, Screen::Answering));

        driver.on_line("A lightweight copy of the DOM.").unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().answer_draft, "A lightweight copy of the DOM.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_buffered_before_end_do_not_reopen_answering() {
        let handle = SessionController::spawn(Arc::new(FixedApi), 120);
        let mut events = handle.subscribe();
        let mut driver = Driver::new(handle.clone());
        driver.on_line("Frontend Developer").unwrap();
        driver.on_line("1").unwrap();
        handle
            .watch()
            .wait_for(|s| s.phase == Phase::QuestionActive)
            .await
            .unwrap();

        // QuestionLoaded is still queued when the user ends the interview.
        driver.on_line("/end").unwrap();
        handle
            .watch()
            .wait_for(|s| s.phase == Phase::Idle)
            .await
            .unwrap();
        while let Ok(event) = events.try_recv() {
            driver.on_event(event);
        }
        assert!(matches!(driver.screen, Screen::Role));

        driver.on_line("Backend Developer").unwrap();
        assert!(matches!(&driver.screen, Screen::Category { role } if role == "Backend Developer"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        let session = handle.snapshot();
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.answer_draft, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_question_after_restart_is_ignored() {
        let (mut driver, handle) = started_driver().await;
        let stale = SessionEvent::QuestionLoaded {
            question: "An older question".to_string(),
            time_limit: 120,
        };

        driver.on_event(stale);
        assert!(matches!(driver.screen, Screen::Waiting));
    }
}
