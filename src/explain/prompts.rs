//! Recruiter prompt construction for the generative summarizer

const PROMPT_TEMPLATE: &str = r#"You are a technical recruiter. Analyze how well this candidate matches the job.

Job Description:
{job}

Candidate Profile:
{candidate}

Instruction:
{instruction}"#;

pub const DEFAULT_INSTRUCTION: &str =
    "Summarize fit quality, skills match, experience, certifications, and any unique strength.";

/// Build the bounded prompt sent to the summarizer. Both documents are
/// truncated to `max_doc_chars` characters so the request stays within
/// provider limits regardless of resume length.
pub fn build_prompt(
    job_text: &str,
    candidate_text: &str,
    instruction: &str,
    max_doc_chars: usize,
) -> String {
    let instruction = if instruction.trim().is_empty() {
        DEFAULT_INSTRUCTION
    } else {
        instruction
    };

    PROMPT_TEMPLATE
        .replace("{job}", &truncate_chars(job_text, max_doc_chars))
        .replace("{candidate}", &truncate_chars(candidate_text, max_doc_chars))
        .replace("{instruction}", instruction)
}

/// Character-based truncation, safe on multi-byte text.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_both_documents() {
        let prompt = build_prompt("Rust backend role", "Rust engineer resume", "", 1500);
        assert!(prompt.contains("Rust backend role"));
        assert!(prompt.contains("Rust engineer resume"));
        assert!(prompt.contains(DEFAULT_INSTRUCTION));
        assert!(prompt.starts_with("You are a technical recruiter."));
    }

    #[test]
    fn test_custom_instruction_replaces_default() {
        let prompt = build_prompt("job", "resume", "Focus on cloud skills.", 1500);
        assert!(prompt.contains("Focus on cloud skills."));
        assert!(!prompt.contains(DEFAULT_INSTRUCTION));
    }

    #[test]
    fn test_documents_truncated() {
        let long = "x".repeat(5000);
        let prompt = build_prompt(&long, &long, "", 1500);
        // Template text plus two 1500-char documents and the instruction.
        assert!(prompt.len() < 3400);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 4), "héll");
        assert_eq!(truncate_chars(text, 100), text);
    }
}
