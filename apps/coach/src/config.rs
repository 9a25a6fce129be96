use anyhow::{ensure, Context, Result};

use crate::session::DEFAULT_TIME_LIMIT;

/// Front-end configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the interview API.
    pub api_url: String,
    /// Seconds allowed per question.
    pub time_limit: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let time_limit = match std::env::var("QUESTION_TIME_LIMIT") {
            Ok(raw) => raw
                .parse::<u32>()
                .context("QUESTION_TIME_LIMIT must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIME_LIMIT,
        };
        ensure!(time_limit > 0, "QUESTION_TIME_LIMIT must be greater than zero");

        Ok(Config {
            api_url: std::env::var("COACH_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            time_limit,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}
