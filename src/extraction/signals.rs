//! Line-based certification/project/experience extraction and vertical
//! inference

use crate::embedding::{cosine_similarity, Embedder};
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashSet;

const CERT_KEYWORDS: &[&str] = &[
    "certified",
    "certification",
    "certifications",
    "certificate",
    "aws certified",
    "azure certified",
    "google cloud",
    "scrum",
    "pmp",
    "ccna",
    "cissp",
];

const PROJECT_TRIGGERS: &[&str] = &[
    "developed",
    "built",
    "implemented",
    "designed",
    "launched",
    "led a team",
    "engineered",
    "created",
    "architected",
];

/// Certification lines from resume text, cleaned and capped at 5.
///
/// A line must carry a certification keyword and pass a whole-word gate on
/// `certified|certification|certificate` so stray keyword fragments do not
/// qualify.
pub fn extract_certifications(text: &str) -> Vec<String> {
    let word_gate = Regex::new(r"\b(certified|certification|certificate)\b").unwrap();
    let strip = Regex::new(r"[^a-zA-Z0-9,\-\(\)\.\s]").unwrap();

    let mut found = Vec::new();
    for line in text.lines() {
        let lower = line.to_lowercase();
        if !CERT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }
        if !word_gate.is_match(&lower) {
            continue;
        }

        let clean = strip.replace_all(line, "").trim().to_string();
        if clean.len() > 6 {
            found.push(clean);
        }
    }

    found.truncate(5);
    found
}

/// Project lines from resume text, triggered by delivery verbs, deduplicated
/// in order and capped at 5. Team-building lines are excluded so leadership
/// statements do not double as project evidence.
pub fn extract_projects(text: &str) -> Vec<String> {
    let mut projects = Vec::new();
    let mut seen = HashSet::new();

    for line in text.lines() {
        let lower = line.to_lowercase();
        if !PROJECT_TRIGGERS.iter().any(|trigger| lower.contains(trigger)) {
            continue;
        }

        let clean = line.trim();
        if clean.len() < 10 || lower.contains("team") {
            continue;
        }

        if seen.insert(clean.to_string()) {
            projects.push(clean.to_string());
        }
    }

    projects.truncate(5);
    projects
}

/// First `N years`/`N yrs` figure in the text, if any.
pub fn extract_experience_years(text: &str) -> Option<f32> {
    let pattern = Regex::new(r"(\d{1,2})\+?\s?(?:years?|yrs?)").unwrap();
    pattern
        .captures(&text.to_lowercase())
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok())
}

/// Best-matching vertical for a document, by embedding similarity against
/// each vertical's concept description. Returns `None` below 0.5 or when
/// embedding fails.
pub fn infer_vertical(
    text: &str,
    verticals: &BTreeMap<String, String>,
    embedder: &dyn Embedder,
) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    let text_vec = match embedder.embed(text) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("vertical inference skipped: {}", e);
            return None;
        }
    };

    let mut best: Option<(String, f32)> = None;
    for (vertical, concept) in verticals {
        let Ok(concept_vec) = embedder.embed(concept) else {
            continue;
        };
        let Ok(sim) = cosine_similarity(&text_vec, &concept_vec) else {
            continue;
        };
        if best.as_ref().map_or(true, |(_, s)| sim > *s) {
            best = Some((vertical.clone(), sim));
        }
    }

    best.filter(|(_, score)| *score > 0.5).map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::embedding::HashEmbedder;

    #[test]
    fn test_extract_certifications() {
        let text = "AWS Certified Solutions Architect\nLoves dogs\nScrum Master Certification, 2023";
        let certs = extract_certifications(text);
        assert_eq!(certs.len(), 2);
        assert!(certs[0].contains("AWS Certified"));
    }

    #[test]
    fn test_certification_requires_whole_word_gate() {
        // "scrum" keyword alone without certified/certification wording
        let certs = extract_certifications("Daily scrum standups with the squad");
        assert!(certs.is_empty());
    }

    #[test]
    fn test_certifications_capped_at_five() {
        let text = (0..8)
            .map(|i| format!("Certified specialist number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extract_certifications(&text).len(), 5);
    }

    #[test]
    fn test_extract_projects() {
        let text = "Developed a payments gateway in Rust\nshort\nBuilt and led team onboarding";
        let projects = extract_projects(text);
        assert_eq!(projects, vec!["Developed a payments gateway in Rust"]);
    }

    #[test]
    fn test_projects_deduplicated() {
        let text = "Designed the ingestion pipeline\nDesigned the ingestion pipeline";
        assert_eq!(extract_projects(text).len(), 1);
    }

    #[test]
    fn test_extract_experience_years() {
        assert_eq!(extract_experience_years("requires 5+ years of Python"), Some(5.0));
        assert_eq!(extract_experience_years("3 yrs in fintech"), Some(3.0));
        assert_eq!(extract_experience_years("no figure here"), None);
    }

    #[test]
    fn test_infer_vertical_on_matching_text() {
        let embedder = HashEmbedder::default();
        let verticals = EngineConfig::default().concepts.verticals;
        // Token-identical to the Cloud concept description.
        let inferred = infer_vertical(
            "cloud-native, devops, aws, azure, kubernetes, lambda",
            &verticals,
            &embedder,
        );
        assert_eq!(inferred.as_deref(), Some("Cloud"));
    }

    #[test]
    fn test_infer_vertical_none_for_unrelated_text() {
        let embedder = HashEmbedder::default();
        let verticals = EngineConfig::default().concepts.verticals;
        let inferred = infer_vertical("gardening and pottery weekends", &verticals, &embedder);
        assert_eq!(inferred, None);
    }
}
