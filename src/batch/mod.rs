//! Batch match orchestration
//!
//! Runs one job against a candidate pool (or one candidate against a job
//! pool), scoring and explaining each pair with per-pair fault isolation:
//! a failed pair is logged, counted, and absent from the ranked output, and
//! only a structural failure on the anchor document aborts the batch.
//! Pairs run as a sequential loop, which doubles as backpressure on the
//! embedding and generative collaborators; output order comes from the
//! final sort, never from completion order.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::explain::{Explanation, ExplanationGenerator, ExplanationSource};
use crate::profile::{CandidateProfile, JobDescription};
use crate::scoring::{label_for, CompositeScorer, ScoreBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Text-extraction collaborator. File-format parsing lives outside the
/// engine; `Ok(None)` means the source had no usable text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    #[serde(rename = "job-to-candidates")]
    JobToCandidates,
    #[serde(rename = "candidate-to-jobs")]
    CandidateToJobs,
    #[serde(rename = "one-to-one")]
    OneToOne,
}

/// Persisted outcome of one comparison. Append-only: re-running a
/// comparison creates a new record; nothing updates an old one. Storage is
/// the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub job_id: String,
    pub candidate_id: String,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub explanation: Explanation,
    pub match_kind: MatchKind,
    /// Explanation source tag, recorded for per-record provenance.
    pub method: ExplanationSource,
    pub score_latency_ms: u64,
    pub explanation_latency_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// One successfully scored pair, before ranking.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Identity of the non-anchor side (candidate id or job id).
    pub counterpart_id: String,
    pub score: f32,
    pub record: MatchRecord,
}

/// One isolated per-pair failure. Never aborts the batch.
#[derive(Debug, Clone)]
pub struct PairFailure {
    pub counterpart_id: String,
    pub tag: &'static str,
    pub method: &'static str,
    pub message: String,
}

impl PairFailure {
    /// Map back to the error variant the tag came from, so single-pair
    /// callers see the original failure kind instead of a generic one.
    fn into_error(self) -> EngineError {
        match self.tag {
            "InvalidEmbeddingError" => EngineError::InvalidEmbedding(self.message),
            "ExtractionUnavailableError" => EngineError::ExtractionUnavailable(self.message),
            "ExplanationError" => EngineError::Explanation(self.message),
            "SummarizationError" => EngineError::Summarization(self.message),
            _ => EngineError::Scoring(self.message),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    pub counterpart_id: String,
    pub score: f32,
    pub label: String,
    /// 1-based position after the final sort.
    pub rank: usize,
    pub record: MatchRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_pairs: usize,
    pub scored: usize,
    /// Pairs dropped for missing text.
    pub skipped: usize,
    /// Pairs dropped for any other isolated failure.
    pub failed: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub matches: Vec<RankedMatch>,
    pub stats: BatchStats,
}

pub struct MatchOrchestrator {
    scorer: CompositeScorer,
    explainer: ExplanationGenerator,
    extractor: Arc<dyn TextExtractor>,
    config: EngineConfig,
}

impl MatchOrchestrator {
    pub fn new(
        scorer: CompositeScorer,
        explainer: ExplanationGenerator,
        extractor: Arc<dyn TextExtractor>,
        config: EngineConfig,
    ) -> Self {
        Self {
            scorer,
            explainer,
            extractor,
            config,
        }
    }

    /// Score every candidate against one job and return the ranked top-K.
    /// The job must carry usable text; nothing else aborts the batch.
    pub async fn match_job_to_candidates(
        &self,
        job: &JobDescription,
        candidates: &[CandidateProfile],
    ) -> Result<BatchReport> {
        if job.text.trim().is_empty() {
            return Err(EngineError::ExtractionUnavailable(format!(
                "job {} has no usable text",
                job.id
            )));
        }

        let started = Instant::now();
        let mut outcomes = Vec::new();
        let mut stats = BatchStats {
            total_pairs: candidates.len(),
            ..BatchStats::default()
        };

        for candidate in candidates {
            match self
                .score_candidate(job, candidate, MatchKind::JobToCandidates)
                .await
            {
                Ok(outcome) => {
                    stats.scored += 1;
                    outcomes.push(outcome);
                }
                Err(failure) => self.record_failure(&failure, &mut stats),
            }
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(BatchReport {
            matches: self.rank_and_truncate(outcomes),
            stats,
        })
    }

    /// The symmetric batch: one candidate against a pool of jobs.
    pub async fn match_candidate_to_jobs(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobDescription],
    ) -> Result<BatchReport> {
        let candidate_text = self.resolve_candidate_text(candidate)?;
        let candidate = candidate.clone().with_text(candidate_text.clone());

        let started = Instant::now();
        let mut outcomes = Vec::new();
        let mut stats = BatchStats {
            total_pairs: jobs.len(),
            ..BatchStats::default()
        };

        for job in jobs {
            if job.text.trim().is_empty() {
                let failure = PairFailure {
                    counterpart_id: job.id.clone(),
                    tag: "ExtractionUnavailableError",
                    method: "match_candidate_to_jobs",
                    message: format!("job {} has no usable text", job.id),
                };
                self.record_failure(&failure, &mut stats);
                continue;
            }

            match self
                .score_pair_inner(job, &candidate, &candidate_text, MatchKind::CandidateToJobs)
                .await
            {
                Ok(mut outcome) => {
                    outcome.counterpart_id = job.id.clone();
                    stats.scored += 1;
                    outcomes.push(outcome);
                }
                Err(failure) => self.record_failure(&failure, &mut stats),
            }
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(BatchReport {
            matches: self.rank_and_truncate(outcomes),
            stats,
        })
    }

    /// One-to-one comparison. Unlike the batch operations, missing text on
    /// either side is a hard error.
    pub async fn match_one(
        &self,
        job: &JobDescription,
        candidate: &CandidateProfile,
    ) -> Result<MatchOutcome> {
        if job.text.trim().is_empty() {
            return Err(EngineError::ExtractionUnavailable(format!(
                "job {} has no usable text",
                job.id
            )));
        }
        let candidate_text = self.resolve_candidate_text(candidate)?;
        let candidate = candidate.clone().with_text(candidate_text.clone());

        self.score_pair_inner(job, &candidate, &candidate_text, MatchKind::OneToOne)
            .await
            .map_err(PairFailure::into_error)
    }

    /// Recommendation label for a final score, using the canonical table.
    pub fn label(&self, score: f32) -> String {
        label_for(score, &self.config).to_string()
    }

    async fn score_candidate(
        &self,
        job: &JobDescription,
        candidate: &CandidateProfile,
        kind: MatchKind,
    ) -> std::result::Result<MatchOutcome, PairFailure> {
        let candidate_text =
            self.resolve_candidate_text(candidate)
                .map_err(|e| PairFailure {
                    counterpart_id: candidate.id.clone(),
                    tag: e.tag(),
                    method: "resolve_candidate_text",
                    message: e.to_string(),
                })?;
        let candidate = candidate.clone().with_text(candidate_text.clone());

        self.score_pair_inner(job, &candidate, &candidate_text, kind)
            .await
    }

    async fn score_pair_inner(
        &self,
        job: &JobDescription,
        candidate: &CandidateProfile,
        candidate_text: &str,
        kind: MatchKind,
    ) -> std::result::Result<MatchOutcome, PairFailure> {
        let score_start = Instant::now();
        let breakdown = self.scorer.score_pair(job, candidate);
        let score_latency_ms = score_start.elapsed().as_millis() as u64;

        let explanation_start = Instant::now();
        let explanation = self
            .explainer
            .explain(
                &job.text,
                candidate_text,
                self.config.batch.use_generative_summaries,
            )
            .await
            .map_err(|e| PairFailure {
                counterpart_id: candidate.id.clone(),
                tag: e.tag(),
                method: "explain",
                message: e.to_string(),
            })?;
        let explanation_latency_ms = explanation_start.elapsed().as_millis() as u64;

        let record = MatchRecord {
            job_id: job.id.clone(),
            candidate_id: candidate.id.clone(),
            score: breakdown.final_score,
            method: explanation.source,
            explanation,
            breakdown: breakdown.clone(),
            match_kind: kind,
            score_latency_ms,
            explanation_latency_ms,
            created_at: Utc::now(),
        };

        Ok(MatchOutcome {
            counterpart_id: candidate.id.clone(),
            score: breakdown.final_score,
            record,
        })
    }

    fn resolve_candidate_text(&self, candidate: &CandidateProfile) -> Result<String> {
        if let Some(text) = candidate.text.as_deref() {
            if !text.trim().is_empty() {
                return Ok(text.to_string());
            }
        }

        if let Some(source) = candidate.source_path.as_deref() {
            if let Some(text) = self.extractor.extract(source)? {
                if !text.trim().is_empty() {
                    return Ok(text);
                }
            }
        }

        Err(EngineError::ExtractionUnavailable(format!(
            "candidate {} has no usable text",
            candidate.id
        )))
    }

    fn record_failure(&self, failure: &PairFailure, stats: &mut BatchStats) {
        log::warn!(
            "{}: {} (method={}, counterpart={})",
            failure.tag,
            failure.message,
            failure.method,
            failure.counterpart_id
        );
        if failure.tag == "ExtractionUnavailableError" {
            stats.skipped += 1;
        } else {
            stats.failed += 1;
        }
    }

    /// Keep the first occurrence per counterpart identity, sort by score
    /// descending, assign 1-based ranks, and truncate to the configured
    /// top-K.
    fn rank_and_truncate(&self, outcomes: Vec<MatchOutcome>) -> Vec<RankedMatch> {
        let mut seen = HashSet::new();
        let mut unique: Vec<MatchOutcome> = outcomes
            .into_iter()
            .filter(|o| seen.insert(o.counterpart_id.clone()))
            .collect();

        unique.sort_by(|a, b| b.score.total_cmp(&a.score));
        unique.truncate(self.config.batch.top_k);

        unique
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| RankedMatch {
                label: self.label(outcome.score),
                rank: i + 1,
                counterpart_id: outcome.counterpart_id,
                score: outcome.score,
                record: outcome.record,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, HashEmbedder};
    use crate::genai::StaticGenAiConfig;

    struct NoopExtractor;

    impl TextExtractor for NoopExtractor {
        fn extract(&self, _source: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn orchestrator() -> MatchOrchestrator {
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::default());
        let config = EngineConfig::default();
        let scorer = CompositeScorer::new(embedder.clone(), config.clone()).unwrap();
        let explainer = ExplanationGenerator::new(
            embedder,
            config.clone(),
            Arc::new(StaticGenAiConfig::disabled()),
            None,
        )
        .unwrap();
        MatchOrchestrator::new(scorer, explainer, Arc::new(NoopExtractor), config)
    }

    fn outcome(id: &str, score: f32) -> MatchOutcome {
        let explanation = Explanation {
            summary: String::new(),
            skills_matched: Vec::new(),
            skills_missing: Vec::new(),
            skills_semantic: Vec::new(),
            coverage_ratio: 0.0,
            experience_match: false,
            experience_years_candidate: None,
            experience_years_job: None,
            highlights: Vec::new(),
            certifications: Vec::new(),
            bonus_signals: Vec::new(),
            project_signals: Vec::new(),
            narrative: None,
            source: ExplanationSource::Embedding,
        };

        MatchOutcome {
            counterpart_id: id.to_string(),
            score,
            record: MatchRecord {
                job_id: "jd-1".to_string(),
                candidate_id: id.to_string(),
                score,
                breakdown: ScoreBreakdown::zeroed(),
                explanation,
                match_kind: MatchKind::JobToCandidates,
                method: ExplanationSource::Embedding,
                score_latency_ms: 0,
                explanation_latency_ms: 0,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_pair_failure_maps_back_to_its_variant() {
        let failure = |tag: &'static str| PairFailure {
            counterpart_id: "EMP-1".to_string(),
            tag,
            method: "explain",
            message: "boom".to_string(),
        };

        assert!(matches!(
            failure("InvalidEmbeddingError").into_error(),
            EngineError::InvalidEmbedding(_)
        ));
        assert!(matches!(
            failure("ExtractionUnavailableError").into_error(),
            EngineError::ExtractionUnavailable(_)
        ));
        assert!(matches!(
            failure("ExplanationError").into_error(),
            EngineError::Explanation(_)
        ));
        assert!(matches!(
            failure("SummarizationError").into_error(),
            EngineError::Summarization(_)
        ));
        assert!(matches!(
            failure("IoError").into_error(),
            EngineError::Scoring(_)
        ));
    }

    #[test]
    fn test_rank_sorts_and_truncates() {
        let orchestrator = orchestrator();
        let ranked = orchestrator.rank_and_truncate(vec![
            outcome("a", 0.9),
            outcome("b", 0.2),
            outcome("c", 0.95),
            outcome("d", 0.5),
        ]);

        let scores: Vec<f32> = ranked.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![0.95, 0.9, 0.5]);
        let ranks: Vec<usize> = ranked.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let orchestrator = orchestrator();
        let ranked = orchestrator.rank_and_truncate(vec![
            outcome("a", 0.4),
            outcome("a", 0.9),
            outcome("b", 0.6),
        ]);

        assert_eq!(ranked.len(), 2);
        let a = ranked.iter().find(|m| m.counterpart_id == "a").unwrap();
        assert_eq!(a.score, 0.4);
    }

    #[test]
    fn test_match_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&MatchKind::JobToCandidates).unwrap(),
            "\"job-to-candidates\""
        );
        assert_eq!(
            serde_json::to_string(&MatchKind::CandidateToJobs).unwrap(),
            "\"candidate-to-jobs\""
        );
        assert_eq!(
            serde_json::to_string(&MatchKind::OneToOne).unwrap(),
            "\"one-to-one\""
        );
    }
}
