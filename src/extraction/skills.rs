//! Controlled-vocabulary skill extraction

use crate::error::{EngineError, Result};
use aho_corasick::AhoCorasick;
use std::collections::BTreeSet;

/// Extracts known skills from free text with a single Aho-Corasick scan.
///
/// The vocabulary is a fixed controlled set (languages, frameworks, tools,
/// clouds, libraries, soft skills). Matches are gated on word boundaries so
/// `c` does not fire inside `react`, while symbol-bearing skills like
/// `c++`, `c#`, and `.net` still work where a regex `\b` would not.
pub struct SkillExtractor {
    matcher: AhoCorasick,
    vocabulary: Vec<String>,
}

impl SkillExtractor {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(Self::default_vocabulary())
    }

    pub fn with_vocabulary(vocabulary: Vec<String>) -> Result<Self> {
        let vocabulary: Vec<String> = vocabulary
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&vocabulary)
            .map_err(|e| {
                EngineError::Configuration(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self { matcher, vocabulary })
    }

    /// All vocabulary skills present in `text`, lowercased and sorted.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut detected = BTreeSet::new();

        for mat in self.matcher.find_iter(text) {
            if !Self::on_word_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            detected.insert(self.vocabulary[mat.pattern()].clone());
        }

        detected.into_iter().collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// A match is standalone when the characters on either side are not
    /// alphanumeric. The pattern itself may carry symbols (`+`, `#`, `.`).
    fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    }

    fn default_vocabulary() -> Vec<String> {
        [
            // Languages
            "python", "java", "c#", "c++", "typescript", "javascript", "html", "css", "sql", "c",
            // Frameworks
            "react", "django", ".net", "asp.net", "spring", "flask", "express", "tailwind",
            "nunit",
            // Tools
            "postman", "swagger", "vscode", "eclipse", "jupyter", "powerbi", "figma", "github",
            // Clouds
            "aws", "azure", "gcp", "google cloud", "cloud", "oracle",
            // Libraries
            "jwt", "entity framework", "pandas", "numpy", "llm",
            // Soft skills
            "public speaking", "mentoring", "technical writing", "community",
            "event management",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}
