//! Talent match scoring and explanation engine
//!
//! Scores job requisitions against candidate profiles by blending dense
//! embedding similarity with bounded heuristic signals, explains every
//! score with a structured breakdown, and orchestrates ranked batch runs
//! with per-pair fault isolation. Embedding, text extraction, and
//! generative summarization are injected collaborator traits; this crate
//! owns only the scoring, explanation, and orchestration.

pub mod batch;
pub mod config;
pub mod embedding;
pub mod error;
pub mod explain;
pub mod extraction;
pub mod genai;
pub mod profile;
pub mod scoring;

pub use batch::{
    BatchReport, BatchStats, MatchKind, MatchOrchestrator, MatchOutcome, MatchRecord,
    PairFailure, RankedMatch, TextExtractor,
};
pub use config::EngineConfig;
pub use embedding::{cosine_similarity, CachedEmbedder, Embedder, HashEmbedder};
pub use error::{EngineError, Result};
pub use explain::{Explanation, ExplanationGenerator, ExplanationSource};
pub use genai::{CohereSummarizer, GenAiConfig, GenAiConfigSource, StaticGenAiConfig, Summarizer};
pub use profile::{CandidateProfile, JobDescription};
pub use scoring::{label_for, CompositeScorer, ScoreBreakdown, SkillPair};
