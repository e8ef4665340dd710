//! Structured explanation generation
//!
//! Turns a (job text, candidate text) pair into a human-readable breakdown:
//! exact and semantic skill matches, experience comparison, evidentiary
//! resume lines, and detected certification/bonus/project signals, with an
//! optional generative narrative on top. The structured part is always
//! computed from embeddings; the narrative is strictly additive and every
//! failure of the generative collaborator degrades to a fallback note.

pub mod highlights;
pub mod prompts;

use crate::config::EngineConfig;
use crate::embedding::{cosine_similarity, Embedder};
use crate::error::{EngineError, Result};
use crate::extraction::signals::extract_experience_years;
use crate::extraction::skills::SkillExtractor;
use crate::genai::{GenAiConfigSource, Summarizer};
use crate::scoring::skill_matcher::{match_skills, SkillPair};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use highlights::HighlightScanner;

/// Whether a generative narrative made it into the explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplanationSource {
    #[serde(rename = "embedding")]
    Embedding,
    #[serde(rename = "generative-ai")]
    GenerativeAi,
}

impl ExplanationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationSource::Embedding => "embedding",
            ExplanationSource::GenerativeAi => "generative-ai",
        }
    }
}

/// Snapshot explaining one comparison. Computed per call; never retained
/// beyond the match record it lands in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    /// Exact skill intersection, sorted. Together with `skills_missing`
    /// this partitions the job's extracted skills.
    pub skills_matched: Vec<String>,
    pub skills_missing: Vec<String>,
    /// Top semantic pairs (capped at 5 for the snapshot).
    pub skills_semantic: Vec<SkillPair>,
    /// Fraction of job skills that found a semantic match, over the full
    /// pair list before the snapshot cap.
    pub coverage_ratio: f32,
    pub experience_match: bool,
    pub experience_years_candidate: Option<f32>,
    pub experience_years_job: Option<f32>,
    /// Evidentiary resume lines, cleaned and capped.
    pub highlights: Vec<String>,
    pub certifications: Vec<String>,
    pub bonus_signals: Vec<String>,
    pub project_signals: Vec<String>,
    pub narrative: Option<String>,
    pub source: ExplanationSource,
}

pub struct ExplanationGenerator {
    embedder: Arc<dyn Embedder>,
    skills: SkillExtractor,
    scanner: HighlightScanner,
    genai_source: Arc<dyn GenAiConfigSource>,
    summarizer: Option<Arc<dyn Summarizer>>,
    config: EngineConfig,
}

impl ExplanationGenerator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        config: EngineConfig,
        genai_source: Arc<dyn GenAiConfigSource>,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Result<Self> {
        let skills = SkillExtractor::new()?;
        let scanner = HighlightScanner::new(config.highlights.clone())?;

        Ok(Self {
            embedder,
            skills,
            scanner,
            genai_source,
            summarizer,
            config,
        })
    }

    /// Build the explanation for one pair. The structured fields either
    /// all succeed or the call fails with an `Explanation` error for the
    /// orchestrator to isolate; generative failures never surface here.
    pub async fn explain(
        &self,
        job_text: &str,
        candidate_text: &str,
        use_generative: bool,
    ) -> Result<Explanation> {
        let mut explanation = self.build_structured(job_text, candidate_text)?;

        if use_generative {
            self.attach_narrative(&mut explanation, job_text, candidate_text)
                .await;
        }

        Ok(explanation)
    }

    fn build_structured(&self, job_text: &str, candidate_text: &str) -> Result<Explanation> {
        let job_skills = self.skills.extract(job_text);
        let candidate_skills = self.skills.extract(candidate_text);

        // Both extractor outputs are sorted, so intersection and difference
        // stay sorted without another pass.
        let skills_matched: Vec<String> = job_skills
            .iter()
            .filter(|s| candidate_skills.contains(s))
            .cloned()
            .collect();
        let skills_missing: Vec<String> = job_skills
            .iter()
            .filter(|s| !candidate_skills.contains(s))
            .cloned()
            .collect();

        let (mut semantic_pairs, coverage_ratio) = match_skills(
            self.embedder.as_ref(),
            &job_skills,
            &candidate_skills,
            self.config.thresholds.semantic_match,
        )
        .map_err(|e| EngineError::Explanation(format!("semantic skill matching failed: {}", e)))?;
        let semantic_count = semantic_pairs.len();
        semantic_pairs.truncate(5);

        let experience_years_job = extract_experience_years(job_text);
        let experience_years_candidate = extract_experience_years(candidate_text);
        let experience_match = match (experience_years_candidate, experience_years_job) {
            (Some(candidate), Some(job)) => (candidate - job).abs() <= 1.0,
            _ => false,
        };

        let candidate_vec = self.embedder.embed(candidate_text).map_err(|e| {
            EngineError::Explanation(format!("failed to embed candidate text: {}", e))
        })?;
        let concepts = &self.config.concepts;
        let certifications = self.detect_signals(&candidate_vec, &concepts.certification_signals);
        let bonus_signals = self.detect_signals(&candidate_vec, &concepts.bonus_signals);
        let project_signals = self.detect_signals(&candidate_vec, &concepts.project_signals);

        let mut highlight_keywords = skills_matched.clone();
        highlight_keywords.extend(certifications.iter().cloned());
        highlight_keywords.extend(bonus_signals.iter().cloned());
        let highlights = self.scanner.extract(candidate_text, &highlight_keywords);

        let summary = format!(
            "{} exact, {} semantic skills. Experience: {} vs {} yrs - {}",
            skills_matched.len(),
            semantic_count,
            format_years(experience_years_candidate),
            format_years(experience_years_job),
            if experience_match { "ok" } else { "mismatch" },
        );

        Ok(Explanation {
            summary,
            skills_matched,
            skills_missing,
            skills_semantic: semantic_pairs,
            coverage_ratio,
            experience_match,
            experience_years_candidate,
            experience_years_job,
            highlights,
            certifications,
            bonus_signals,
            project_signals,
            narrative: None,
            source: ExplanationSource::Embedding,
        })
    }

    /// Concept phrases whose embedding clears the semantic threshold
    /// against the candidate text. Per-phrase embedding failures skip that
    /// phrase only.
    fn detect_signals(&self, text_vec: &[f32], phrases: &[String]) -> Vec<String> {
        let threshold = self.config.thresholds.semantic_match;
        let mut found = Vec::new();

        for phrase in phrases {
            let Ok(phrase_vec) = self.embedder.embed(phrase) else {
                continue;
            };
            let Ok(sim) = cosine_similarity(text_vec, &phrase_vec) else {
                continue;
            };
            if sim >= threshold {
                found.push(phrase.clone());
            }
        }

        found
    }

    /// Try to attach a generative narrative. Consults the live runtime
    /// configuration on every call; any failure keeps the structured
    /// fields, records a fallback note, and leaves the source as
    /// `embedding`.
    async fn attach_narrative(
        &self,
        explanation: &mut Explanation,
        job_text: &str,
        candidate_text: &str,
    ) {
        let genai = self.genai_source.fetch();
        if !genai.is_usable() {
            return;
        }
        let Some(summarizer) = self.summarizer.as_ref() else {
            return;
        };
        if !summarizer.provider().eq_ignore_ascii_case(genai.provider.trim()) {
            log::debug!(
                "generative summary skipped: configured provider {:?} does not match {:?}",
                genai.provider,
                summarizer.provider()
            );
            return;
        }

        let settings = &self.config.genai;
        let prompt = prompts::build_prompt(
            job_text,
            candidate_text,
            &genai.prompt_template,
            settings.max_prompt_doc_chars,
        );

        let deadline = Duration::from_secs(settings.timeout_secs);
        let outcome = tokio::time::timeout(deadline, summarizer.summarize(&prompt)).await;

        let error = match outcome {
            Ok(Ok(text)) => {
                explanation.narrative =
                    Some(prompts::truncate_chars(text.trim(), settings.max_narrative_chars));
                explanation.source = ExplanationSource::GenerativeAi;
                return;
            }
            Ok(Err(e)) => EngineError::Summarization(e.to_string()),
            Err(_) => EngineError::Summarization(format!(
                "summarizer timed out after {}s",
                settings.timeout_secs
            )),
        };

        log::warn!("{}: {} (method=attach_narrative)", error.tag(), error);
        explanation.narrative = Some(format!("Generative summary unavailable: {}", error));
        explanation.source = ExplanationSource::Embedding;
    }
}

fn format_years(years: Option<f32>) -> String {
    match years {
        Some(y) => format!("{}", y),
        None => "?".to_string(),
    }
}
