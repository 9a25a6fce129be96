// All LLM prompt constants for the Interview module.

/// Sampling temperature for question generation.
pub const QUESTION_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for feedback. Lower keeps the rating format stable.
pub const FEEDBACK_TEMPERATURE: f32 = 0.5;

/// Question prompt template. Replace `{category}` and `{role}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str =
    "Generate one {category} interview question for a {role}.";

/// Feedback prompt template. Replace `{question}` and `{answer}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"
You are an interview coach. Evaluate the following answer to an interview question.
Provide constructive feedback and rate the answer from 1 to 10.
Be concise.

Question: {question}

Answer: {answer}

Respond in this format:
Rating: <number>/10
Feedback: <short feedback>
"#;

pub fn question_prompt(role: &str, category: &str) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{category}", &category.to_lowercase())
        .replace("{role}", role)
}

pub fn feedback_prompt(question: &str, answer: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_lowercases_category() {
        assert_eq!(
            question_prompt("Frontend Developer", "Problem-solving"),
            "Generate one problem-solving interview question for a Frontend Developer."
        );
    }

    #[test]
    fn test_feedback_prompt_embeds_pair_and_format() {
        let prompt = feedback_prompt("Explain the virtual DOM.", "A diffed copy of the DOM.");
        assert!(prompt.contains("Question: Explain the virtual DOM."));
        assert!(prompt.contains("Answer: A diffed copy of the DOM."));
        assert!(prompt.contains("Rating: <number>/10"));
    }
}
