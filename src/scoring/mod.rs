//! Weighted composite scoring
//!
//! Blends dense cosine similarity with bounded heuristic sub-scores into
//! one final score in [0, 1]. All weights, thresholds, and concept lists
//! come from [`EngineConfig`]; nothing here is a literal.

pub mod skill_matcher;

use crate::config::EngineConfig;
use crate::embedding::{cosine_similarity, Embedder};
use crate::error::Result;
use crate::extraction::signals::{
    extract_certifications, extract_experience_years, extract_projects, infer_vertical,
};
use crate::extraction::skills::SkillExtractor;
use crate::profile::{CandidateProfile, JobDescription};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub use skill_matcher::SkillPair;

/// Every sub-score behind one final score, kept for explainability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub cosine_similarity: f32,
    pub skill_overlap: f32,
    pub experience_alignment: f32,
    pub project_alignment: f32,
    pub certification_boost: f32,
    pub human_signal_boost: f32,
    pub vertical_boost: f32,
    /// Weighted blend, clamped to [0, 1] and rounded to 4 decimals.
    pub final_score: f32,
}

impl ScoreBreakdown {
    /// The degraded breakdown returned when scoring a pair fails.
    pub fn zeroed() -> Self {
        Self {
            cosine_similarity: 0.0,
            skill_overlap: 0.0,
            experience_alignment: 0.0,
            project_alignment: 0.0,
            certification_boost: 0.0,
            human_signal_boost: 0.0,
            vertical_boost: 0.0,
            final_score: 0.0,
        }
    }
}

/// Recommendation tier for a final score. One canonical threshold table,
/// applied everywhere.
pub fn label_for(score: f32, config: &EngineConfig) -> &'static str {
    let labels = &config.labels;
    if score >= labels.highly_recommended {
        "Highly Recommended"
    } else if score >= labels.recommended {
        "Recommended"
    } else if score >= labels.decent {
        "Decent – Can Explore"
    } else {
        "Not Recommended"
    }
}

pub struct CompositeScorer {
    embedder: Arc<dyn Embedder>,
    skills: SkillExtractor,
    config: EngineConfig,
}

impl CompositeScorer {
    pub fn new(embedder: Arc<dyn Embedder>, config: EngineConfig) -> Result<Self> {
        Ok(Self {
            embedder,
            skills: SkillExtractor::new()?,
            config,
        })
    }

    /// Score one (job, candidate) pair. Never fails: any error is logged
    /// under its tag and degrades to the zeroed breakdown, because a
    /// scoring failure must not abort the surrounding batch.
    pub fn score_pair(&self, job: &JobDescription, candidate: &CandidateProfile) -> ScoreBreakdown {
        match self.try_score_pair(job, candidate) {
            Ok(breakdown) => breakdown,
            Err(e) => {
                log::error!("{}: {} (method=score_pair)", e.tag(), e);
                ScoreBreakdown::zeroed()
            }
        }
    }

    pub fn try_score_pair(
        &self,
        job: &JobDescription,
        candidate: &CandidateProfile,
    ) -> Result<ScoreBreakdown> {
        let cosine = cosine_similarity(&job.embedding, &candidate.embedding)?;

        let text = candidate.text.as_deref().filter(|t| !t.trim().is_empty());

        // Stored evidence lists win; a text-only candidate falls back to
        // the default extractors so it still earns the heuristic
        // sub-scores.
        let extracted_skills;
        let skills: &[String] = if candidate.skills.is_empty() {
            extracted_skills = text.map(|t| self.skills.extract(t)).unwrap_or_default();
            &extracted_skills
        } else {
            &candidate.skills
        };
        let extracted_projects;
        let projects: &[String] = if candidate.projects.is_empty() {
            extracted_projects = text.map(extract_projects).unwrap_or_default();
            &extracted_projects
        } else {
            &candidate.projects
        };
        let extracted_certifications;
        let certifications: &[String] = if candidate.certifications.is_empty() {
            extracted_certifications = text.map(extract_certifications).unwrap_or_default();
            &extracted_certifications
        } else {
            &candidate.certifications
        };

        let skill_overlap = self.skill_overlap(&job.text, skills);
        let experience_alignment = self.experience_alignment(job, candidate.experience_years);
        let project_alignment =
            self.signal_hits(projects, &self.config.concepts.project_concepts);
        let certification_boost =
            self.signal_hits(certifications, &self.config.concepts.certification_concepts);
        let human_signal_boost = self.human_signal_boost(candidate.text.as_deref());
        let vertical_boost = self.vertical_boost(job);

        let w = &self.config.weights;
        let total = cosine * w.cosine
            + skill_overlap * w.skill_overlap
            + experience_alignment * w.experience
            + project_alignment * w.projects
            + certification_boost * w.certifications
            + human_signal_boost * w.human_signals
            + vertical_boost * w.vertical;

        Ok(ScoreBreakdown {
            cosine_similarity: round4(cosine),
            skill_overlap: round4(skill_overlap),
            experience_alignment: round4(experience_alignment),
            project_alignment: round4(project_alignment),
            certification_boost: round4(certification_boost),
            human_signal_boost: round4(human_signal_boost),
            vertical_boost: round4(vertical_boost),
            final_score: round4(total.clamp(0.0, 1.0)),
        })
    }

    /// Semantic pairing of job skills to candidate skills, see
    /// [`skill_matcher::match_skills`].
    pub fn match_skills(
        &self,
        job_skills: &[String],
        candidate_skills: &[String],
        threshold: Option<f32>,
    ) -> Result<(Vec<SkillPair>, f32)> {
        skill_matcher::match_skills(
            self.embedder.as_ref(),
            job_skills,
            candidate_skills,
            threshold.unwrap_or(self.config.thresholds.semantic_match),
        )
    }

    /// Token-set overlap between job text and candidate skill strings,
    /// normalized by an assumed required-token count. Cheap lexical
    /// supplement to the semantic matcher.
    fn skill_overlap(&self, job_text: &str, skills: &[String]) -> f32 {
        if job_text.is_empty() || skills.is_empty() {
            return 0.0;
        }

        let job_tokens: HashSet<String> = job_text
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.to_string())
            .collect();
        let skill_tokens: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();

        let overlap = job_tokens.intersection(&skill_tokens).count() as f32;
        (overlap / self.config.thresholds.skill_overlap_denominator).min(1.0)
    }

    /// Ratio of candidate to required years, clamped to 1.2 and penalized
    /// by 0.2, so an exact match yields 0.8 and only 1.2x the requirement
    /// reaches 1.0. May go slightly negative for heavy under-qualification.
    fn experience_alignment(&self, job: &JobDescription, candidate_years: Option<f32>) -> f32 {
        let required = job
            .required_experience_years
            .or_else(|| extract_experience_years(&job.text));

        match (required, candidate_years) {
            (Some(required), Some(years)) if required > 0.0 => {
                let t = &self.config.thresholds;
                (years / required).clamp(0.0, t.experience_ratio_cap) - t.experience_penalty
            }
            _ => 0.0,
        }
    }

    /// Count concept-phrase hits across candidate evidence strings, each
    /// hit worth a fixed value, capped.
    fn signal_hits(&self, entries: &[String], concepts: &[String]) -> f32 {
        if entries.is_empty() {
            return 0.0;
        }

        let t = &self.config.thresholds;
        let hits = entries
            .iter()
            .flat_map(|entry| {
                let entry = entry.to_lowercase();
                concepts
                    .iter()
                    .filter(move |concept| entry.contains(&concept.to_lowercase()))
            })
            .count();

        (hits as f32 * t.signal_hit_value).min(t.signal_cap)
    }

    /// Semantic match count against the rare-achievement concept list.
    /// Embedding failures degrade this sub-score to 0.0 so one bad text
    /// never zeroes the whole pair.
    fn human_signal_boost(&self, text: Option<&str>) -> f32 {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return 0.0;
        };

        let text_vec = match self.embedder.embed(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("{}: {} (method=human_signal_boost)", e.tag(), e);
                return 0.0;
            }
        };

        let t = &self.config.thresholds;
        let mut hits = 0usize;
        for concept in &self.config.concepts.human_signal_concepts {
            let Ok(concept_vec) = self.embedder.embed(concept) else {
                continue;
            };
            let Ok(sim) = cosine_similarity(&text_vec, &concept_vec) else {
                continue;
            };
            if sim >= t.semantic_match {
                hits += 1;
            }
        }

        (hits as f32 * t.signal_hit_value).min(t.signal_cap)
    }

    /// Similarity of the job text to the concept description of its
    /// vertical, when the similarity clears the semantic threshold. An
    /// untagged job falls back to vertical inference over the catalog; an
    /// explicit tag outside the catalog scores nothing.
    fn vertical_boost(&self, job: &JobDescription) -> f32 {
        if job.text.trim().is_empty() {
            return 0.0;
        }

        let vertical = match job.vertical.clone() {
            Some(tag) => tag,
            None => {
                match infer_vertical(
                    &job.text,
                    &self.config.concepts.verticals,
                    self.embedder.as_ref(),
                ) {
                    Some(inferred) => inferred,
                    None => return 0.0,
                }
            }
        };
        let Some(concept) = self.config.concepts.verticals.get(&vertical) else {
            return 0.0;
        };

        let result = self.embedder.embed(&job.text).and_then(|job_vec| {
            let concept_vec = self.embedder.embed(concept)?;
            cosine_similarity(&job_vec, &concept_vec)
        });
        let sim = match result {
            Ok(sim) => sim,
            Err(e) => {
                log::warn!("{}: {} (method=vertical_boost)", e.tag(), e);
                return 0.0;
            }
        };

        if sim > self.config.thresholds.semantic_match {
            sim.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn scorer() -> CompositeScorer {
        CompositeScorer::new(Arc::new(HashEmbedder::default()), EngineConfig::default()).unwrap()
    }

    fn embedded(text: &str) -> Vec<f32> {
        HashEmbedder::default().embed(text).unwrap()
    }

    fn basic_pair() -> (JobDescription, CandidateProfile) {
        let job_text = "Backend engineer, 5 years experience with python and aws";
        let candidate_text = "Python developer. Built services on aws for 4 years";
        let job = JobDescription::new("jd-1", job_text, embedded(job_text));
        let candidate = CandidateProfile::new("EMP-1", embedded(candidate_text))
            .with_text(candidate_text)
            .with_skills(vec!["python".to_string(), "aws".to_string()])
            .with_experience_years(4.0);
        (job, candidate)
    }

    #[test]
    fn test_score_in_range_and_rounded() {
        let scorer = scorer();
        let (job, candidate) = basic_pair();

        let breakdown = scorer.score_pair(&job, &candidate);

        assert!((0.0..=1.0).contains(&breakdown.final_score));
        let scaled = breakdown.final_score * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-3);
    }

    #[test]
    fn test_score_is_idempotent() {
        let scorer = scorer();
        let (job, candidate) = basic_pair();

        let first = scorer.score_pair(&job, &candidate);
        let second = scorer.score_pair(&job, &candidate);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mismatched_embeddings_degrade_to_zero() {
        let scorer = scorer();
        let job = JobDescription::new("jd-1", "some job", vec![0.1, 0.2]);
        let candidate = CandidateProfile::new("EMP-1", vec![0.1, 0.2, 0.3]);

        let breakdown = scorer.score_pair(&job, &candidate);
        assert_eq!(breakdown, ScoreBreakdown::zeroed());
    }

    #[test]
    fn test_empty_embedding_degrades_to_zero() {
        let scorer = scorer();
        let job = JobDescription::new("jd-1", "some job", Vec::new());
        let candidate = CandidateProfile::new("EMP-1", vec![0.1]);

        let breakdown = scorer.score_pair(&job, &candidate);
        assert_eq!(breakdown.final_score, 0.0);
    }

    #[test]
    fn test_experience_alignment_monotonic_below_requirement() {
        let scorer = scorer();
        let job = JobDescription::new("jd-1", "role needs 6 years experience", vec![0.1]);

        let mut previous = f32::MIN;
        for years in [0.0_f32, 1.0, 2.5, 4.0, 5.0, 6.0] {
            let score = scorer.experience_alignment(&job, Some(years));
            assert!(
                score >= previous,
                "alignment dropped at {} years: {} < {}",
                years,
                score,
                previous
            );
            previous = score;
        }
        // Exact match lands on 0.8 after the penalty; only 1.2x the
        // requirement reaches 1.0.
        assert!((previous - 0.8).abs() < 1e-6);
        let at_cap = scorer.experience_alignment(&job, Some(7.2));
        assert!((at_cap - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_experience_missing_inputs_score_zero() {
        let scorer = scorer();
        let with_figure = JobDescription::new("jd-1", "needs 5 years", vec![0.1]);
        let without_figure = JobDescription::new("jd-2", "needs experience", vec![0.1]);

        assert_eq!(scorer.experience_alignment(&with_figure, None), 0.0);
        assert_eq!(scorer.experience_alignment(&without_figure, Some(4.0)), 0.0);
    }

    #[test]
    fn test_overqualification_capped() {
        let scorer = scorer();
        let job = JobDescription::new("jd-1", "needs 2 years", vec![0.1]);
        let score = scorer.experience_alignment(&job, Some(20.0));
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_signal_hits_capped() {
        let scorer = scorer();
        let projects: Vec<String> = (0..6)
            .map(|i| format!("designed architecture for system {}", i))
            .collect();

        let score = scorer.signal_hits(&projects, &scorer.config.concepts.project_concepts);
        assert_eq!(score, 0.15);
    }

    #[test]
    fn test_signal_hits_empty_inputs() {
        let scorer = scorer();
        assert_eq!(
            scorer.signal_hits(&[], &scorer.config.concepts.project_concepts),
            0.0
        );
    }

    #[test]
    fn test_vertical_boost_tagged_and_inferred() {
        let scorer = scorer();
        let text = "cloud-native, devops, aws, azure, kubernetes, lambda";
        let tagged = JobDescription::new("jd-1", text, embedded(text)).with_vertical("Cloud");
        let unknown = JobDescription::new("jd-2", text, embedded(text)).with_vertical("Zeppelins");
        let untagged = JobDescription::new("jd-3", text, embedded(text));

        assert!(scorer.vertical_boost(&tagged) > 0.5);
        // An explicit tag outside the catalog scores nothing, even when
        // the text itself would infer a vertical.
        assert_eq!(scorer.vertical_boost(&unknown), 0.0);
        // An untagged job falls back to inference over the catalog.
        assert!(scorer.vertical_boost(&untagged) > 0.5);

        let off_topic = "gardening and pottery weekends";
        let unrelated = JobDescription::new("jd-4", off_topic, embedded(off_topic));
        assert_eq!(scorer.vertical_boost(&unrelated), 0.0);
    }

    #[test]
    fn test_text_only_candidate_earns_heuristic_scores() {
        let scorer = scorer();
        let job_text = "Cloud engineer, 4 years experience with python and aws";
        let job = JobDescription::new("jd-1", job_text, embedded(job_text));
        let candidate_text = "Python and aws engineer with 4 years experience.\n\
             Designed architecture for the payments platform.\n\
             AWS Cloud Certified Solutions Architect certificate holder.";
        let candidate = CandidateProfile::new("EMP-1", embedded(candidate_text))
            .with_text(candidate_text)
            .with_experience_years(4.0);

        let breakdown = scorer.score_pair(&job, &candidate);
        assert!(breakdown.skill_overlap > 0.0);
        assert!(breakdown.project_alignment > 0.0);
        assert!(breakdown.certification_boost > 0.0);
    }

    #[test]
    fn test_stored_candidate_lists_win_over_text() {
        let scorer = scorer();
        let job_text = "Cloud engineer needing python and aws";
        let job = JobDescription::new("jd-1", job_text, embedded(job_text));
        let candidate_text = "Designed architecture for the payments platform.";
        let candidate = CandidateProfile::new("EMP-1", embedded(candidate_text))
            .with_text(candidate_text)
            .with_projects(vec!["maintained a wiki".to_string()]);

        let breakdown = scorer.score_pair(&job, &candidate);
        // The stored project list has no concept hits, and its presence
        // suppresses extraction from the text.
        assert_eq!(breakdown.project_alignment, 0.0);
    }

    #[test]
    fn test_label_table() {
        let config = EngineConfig::default();
        assert_eq!(label_for(0.86, &config), "Highly Recommended");
        assert_eq!(label_for(0.70, &config), "Recommended");
        assert_eq!(label_for(0.50, &config), "Decent – Can Explore");
        assert_eq!(label_for(0.10, &config), "Not Recommended");
    }
}
