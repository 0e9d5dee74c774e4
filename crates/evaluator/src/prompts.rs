use crate::models::WeightedParameter;

/// Longest slice of submission text sent to the model, in characters.
pub const MAX_SUBMISSION_CHARS: usize = 25_000;

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn criterion_prompt(
        hackathon_title: Option<&str>,
        criterion: &WeightedParameter,
        submission_text: &str,
    ) -> String {
        let context = match hackathon_title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => format!(
                "You are evaluating a submission for the \"{title}\" hackathon based on the following criterion:"
            ),
            None => {
                "You are evaluating a hackathon submission based on the following criterion:"
                    .to_string()
            }
        };

        let criterion_line = if criterion.description.trim().is_empty() {
            format!("\"{}\"", criterion.name)
        } else {
            format!("\"{}\": {}", criterion.name, criterion.description.trim())
        };

        let (text, truncated) = truncate_chars(submission_text, MAX_SUBMISSION_CHARS);
        let suffix = if truncated {
            " ... (content truncated for brevity)"
        } else {
            ""
        };

        format!(
            r#"{context}
{criterion_line}

Here is the submission text:
"""
{text}{suffix}
"""

Based solely on this criterion, rate the submission on a scale of 0-100, where:
- 0-20: Poor (Does not meet the criterion at all)
- 21-40: Below Average (Barely meets the criterion)
- 41-60: Average (Partially meets the criterion)
- 61-80: Good (Largely meets the criterion)
- 81-100: Excellent (Completely fulfills the criterion)

Be objective and fair in your evaluation.
Respond with ONLY a number between 0-100."#
        )
    }
}

/// Cuts `text` to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

/// First integer in the model's reply, clamped to 0..=100. Replies without a number score 0.
pub fn extract_score(reply: &str) -> f64 {
    let digits: String = reply
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        tracing::warn!("Could not extract score from response: {:?}", reply);
        return 0.0;
    }

    // Overlong digit runs overflow u64; they are far above 100 anyway.
    digits.parse::<u64>().map_or(100.0, |n| n.min(100) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(description: &str) -> WeightedParameter {
        WeightedParameter::new("Innovation", description, 40.0)
    }

    #[test]
    fn test_prompt_includes_title_and_rubric() {
        let prompt = PromptBuilder::criterion_prompt(
            Some("Green Tech"),
            &criterion("Novelty of the idea"),
            "We built a compost sensor.",
        );
        assert!(prompt.contains("for the \"Green Tech\" hackathon"));
        assert!(prompt.contains("\"Innovation\": Novelty of the idea"));
        assert!(prompt.contains("We built a compost sensor."));
        assert!(prompt.ends_with("Respond with ONLY a number between 0-100."));
        assert!(!prompt.contains("truncated"));
    }

    #[test]
    fn test_prompt_without_title_uses_generic_context() {
        let prompt = PromptBuilder::criterion_prompt(Some("  "), &criterion(""), "text");
        assert!(prompt.starts_with("You are evaluating a hackathon submission"));
        assert!(prompt.contains("\n\"Innovation\"\n"));
    }

    #[test]
    fn test_long_text_is_truncated_on_char_boundary() {
        let text = "é".repeat(MAX_SUBMISSION_CHARS + 10);
        let (cut, truncated) = truncate_chars(&text, MAX_SUBMISSION_CHARS);
        assert!(truncated);
        assert_eq!(cut.chars().count(), MAX_SUBMISSION_CHARS);

        let prompt = PromptBuilder::criterion_prompt(None, &criterion(""), &text);
        assert!(prompt.contains("... (content truncated for brevity)"));
    }

    #[test]
    fn test_extract_score() {
        assert_eq!(extract_score("85"), 85.0);
        assert_eq!(extract_score("Score: 72/100"), 72.0);
        assert_eq!(extract_score("150"), 100.0);
        assert_eq!(extract_score("no idea"), 0.0);
        assert_eq!(extract_score("99999999999999999999999"), 100.0);
    }
}
