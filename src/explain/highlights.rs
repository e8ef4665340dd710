//! Evidentiary excerpt scanning
//!
//! Pulls the resume lines that actually mention matched skills or detected
//! signals, stripped of contact details and boilerplate, so an explanation
//! can quote the candidate's own words.

use crate::config::HighlightRules;
use crate::error::{EngineError, Result};
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct HighlightScanner {
    contact: Regex,
    bullet: Regex,
    rules: HighlightRules,
}

impl HighlightScanner {
    pub fn new(rules: HighlightRules) -> Result<Self> {
        // Emails, URLs, github/linkedin handles, and phone-number digit runs.
        let contact = Regex::new(
            r"(?i)\b[\w.+-]+@[\w.-]+\.\w+\b|https?://\S+|(?:www\.)?(?:github|linkedin)\.com/\S+|\+?\d[\d\s()\-]{7,}\d|\b\d{10}\b",
        )
        .map_err(|e| EngineError::Configuration(format!("Bad contact pattern: {}", e)))?;

        let bullet = Regex::new(r"^\s*(?:[-*•]|\d+[.)\-])\s*")
            .map_err(|e| EngineError::Configuration(format!("Bad bullet pattern: {}", e)))?;

        Ok(Self {
            contact,
            bullet,
            rules,
        })
    }

    /// Scan `text` line by line for any of `keywords` (case-insensitive
    /// substring). Kept lines are cleaned of contact info and bullet
    /// prefixes, must retain a minimum word count, must clear the
    /// boilerplate denylist, and are deduplicated in order up to the cap.
    pub fn extract(&self, text: &str, keywords: &[String]) -> Vec<String> {
        if keywords.is_empty() {
            return Vec::new();
        }

        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for line in text.lines() {
            let lower = line.to_lowercase();
            if !keywords.iter().any(|k| lower.contains(k.as_str())) {
                continue;
            }

            let clean = self.contact.replace_all(line, "");
            let clean = self.bullet.replace(&clean, "").trim().to_string();

            if clean.unicode_words().count() < self.rules.min_words {
                continue;
            }

            let clean_lower = clean.to_lowercase();
            if self
                .rules
                .denylist
                .iter()
                .any(|bad| clean_lower.contains(bad.as_str()))
            {
                continue;
            }

            if seen.insert(clean.clone()) {
                found.push(clean);
                if found.len() == self.rules.max_highlights {
                    break;
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn scanner() -> HighlightScanner {
        HighlightScanner::new(EngineConfig::default().highlights).unwrap()
    }

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_lines_with_keywords() {
        let text = "Built python services for payments\nEnjoys long walks on weekends";
        let lines = scanner().extract(text, &keywords(&["python"]));
        assert_eq!(lines, vec!["Built python services for payments"]);
    }

    #[test]
    fn test_strips_contact_info() {
        let text = "Python work, reach me at jane@example.com or +1 (555) 123-4567 anytime";
        let lines = scanner().extract(text, &keywords(&["python"]));
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].contains("example.com"));
        assert!(!lines[0].contains("555"));
    }

    #[test]
    fn test_strips_bullet_prefixes() {
        let text = "- Deployed python pipelines to production";
        let lines = scanner().extract(text, &keywords(&["python"]));
        assert_eq!(lines, vec!["Deployed python pipelines to production"]);
    }

    #[test]
    fn test_drops_short_lines_after_cleaning() {
        let text = "python jane@example.com";
        let lines = scanner().extract(text, &keywords(&["python"]));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_drops_denylisted_boilerplate() {
        let text = "Bachelor of python studies at State University";
        let lines = scanner().extract(text, &keywords(&["python"]));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_dedup_and_cap() {
        let repeated = "Shipped python tooling for internal analytics\n".repeat(3);
        let mut text = repeated;
        for i in 0..8 {
            text.push_str(&format!("Shipped python feature number {} to production\n", i));
        }

        let lines = scanner().extract(&text, &keywords(&["python"]));
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines
                .iter()
                .filter(|l| l.contains("internal analytics"))
                .count(),
            1
        );
    }

    #[test]
    fn test_no_keywords_yields_nothing() {
        let lines = scanner().extract("Built python services", &[]);
        assert!(lines.is_empty());
    }
}
