use crate::errors::AppError;
use crate::interview::models::Category;

/// Message returned for any rejected job title.
pub const INVALID_ROLE_MESSAGE: &str =
    "Please enter a real, appropriate job title (e.g. \"Frontend Developer\").";

/// Minimum number of words a job title must contain.
const MIN_ROLE_WORDS: usize = 2;

/// Terms that disqualify a job title. Matched against whole lowercase words.
const BLOCKED_TERMS: &[&str] = &[
    "anal", "arse", "ass", "asshole", "bastard", "bitch", "bollocks", "boob", "cock", "crap",
    "cunt", "damn", "dick", "dildo", "douche", "fag", "fuck", "fucker", "fucking", "hell",
    "jerk", "nazi", "nigger", "penis", "piss", "porn", "pussy", "rape", "retard", "sex", "shit",
    "slut", "twat", "vagina", "wank", "whore",
];

/// Checks a job title against the format and profanity rules.
///
/// PASS conditions:
/// - Two or more whitespace-separated words
/// - Every word is purely alphabetic
/// - No word is a blocked term
pub fn validate_role(role: &str) -> Result<(), AppError> {
    let words: Vec<&str> = role.split_whitespace().collect();

    let well_formed = words.len() >= MIN_ROLE_WORDS
        && words
            .iter()
            .all(|word| word.chars().all(char::is_alphabetic));

    if !well_formed {
        return Err(AppError::Validation(INVALID_ROLE_MESSAGE.to_string()));
    }

    let blocked = words.iter().any(|word| {
        let lower = word.to_lowercase();
        BLOCKED_TERMS.contains(&lower.as_str())
    });

    if blocked {
        return Err(AppError::Validation(INVALID_ROLE_MESSAGE.to_string()));
    }

    Ok(())
}

/// Parses the category string sent by the client.
pub fn validate_category(category: &str) -> Result<Category, AppError> {
    category.parse::<Category>().map_err(AppError::Validation)
}
