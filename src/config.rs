//! Configuration for the talent match engine
//!
//! Every weight, threshold, and concept list used by the scorer and the
//! explanation generator lives here as named configuration rather than
//! embedded literals, so alternate tunings can be tested without code
//! changes. `EngineConfig::default()` holds the canonical constants.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: ScoreWeights,
    pub thresholds: Thresholds,
    pub labels: LabelThresholds,
    pub concepts: ConceptLists,
    pub highlights: HighlightRules,
    pub batch: BatchSettings,
    pub genai: GenAiSettings,
}

/// Blend weights for the composite score. They are applied as
/// `final = cosine*w1 + skill_overlap*w2 + ...` and are expected to sum
/// to 1.0, though this is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub cosine: f32,
    pub skill_overlap: f32,
    pub experience: f32,
    pub projects: f32,
    pub certifications: f32,
    pub human_signals: f32,
    pub vertical: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum cosine similarity for a semantic match (skill pairs and
    /// concept detection alike).
    pub semantic_match: f32,
    /// Contribution of one detected signal hit (projects, certifications,
    /// human signals).
    pub signal_hit_value: f32,
    /// Cap on each hit-counted sub-score.
    pub signal_cap: f32,
    /// Assumed number of required tokens when normalizing token overlap
    /// between job text and candidate skills.
    pub skill_overlap_denominator: f32,
    /// Upper clamp on candidate/required experience ratio before the
    /// penalty is subtracted.
    pub experience_ratio_cap: f32,
    /// Penalty subtracted from the clamped experience ratio, so an exact
    /// match yields 1.0 and under-qualification scores below it.
    pub experience_penalty: f32,
}

/// Canonical label table. A second table (0.8/0.6/0.4) existed at one call
/// site of the system this engine replaces; that was a defect and this
/// single table applies everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelThresholds {
    pub highly_recommended: f32,
    pub recommended: f32,
    pub decent: f32,
}

/// Fixed concept phrase lists consumed by scoring and explanation.
///
/// The `*_concepts` lists are matched by substring against candidate
/// project/certification strings (scoring); the `*_signals` lists are
/// matched semantically against candidate text (explanation); `verticals`
/// maps a business-domain tag to the concept description embedded for the
/// vertical boost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptLists {
    pub human_signal_concepts: Vec<String>,
    pub certification_concepts: Vec<String>,
    pub project_concepts: Vec<String>,
    pub certification_signals: Vec<String>,
    pub bonus_signals: Vec<String>,
    pub project_signals: Vec<String>,
    pub verticals: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightRules {
    /// Minimum word count a highlight line must keep after contact-info
    /// stripping.
    pub min_words: usize,
    /// Maximum number of evidentiary lines returned.
    pub max_highlights: usize,
    /// Lines containing any of these substrings are dropped as
    /// education/location boilerplate. Substring matching is deliberate
    /// (parity with the system this replaces); deployments can tune the
    /// list here.
    pub denylist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Ranked results are truncated to this many entries.
    pub top_k: usize,
    /// Whether batch explanations request a generative narrative. The
    /// live GenAiConfig still gates the actual call.
    pub use_generative_summaries: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiSettings {
    /// Hard timeout on a single summarizer call.
    pub timeout_secs: u64,
    /// Per-document character budget when building the summarizer prompt.
    pub max_prompt_doc_chars: usize,
    /// Character cap applied to the returned narrative.
    pub max_narrative_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights {
                cosine: 0.5,
                skill_overlap: 0.15,
                experience: 0.10,
                projects: 0.10,
                certifications: 0.05,
                human_signals: 0.05,
                vertical: 0.05,
            },
            thresholds: Thresholds {
                semantic_match: 0.5,
                signal_hit_value: 0.05,
                signal_cap: 0.15,
                skill_overlap_denominator: 15.0,
                experience_ratio_cap: 1.2,
                experience_penalty: 0.2,
            },
            labels: LabelThresholds {
                highly_recommended: 0.85,
                recommended: 0.70,
                decent: 0.50,
            },
            concepts: ConceptLists {
                human_signal_concepts: vec![
                    "published research".to_string(),
                    "mentored juniors".to_string(),
                    "open source".to_string(),
                    "led a team".to_string(),
                    "speaker".to_string(),
                    "initiated project".to_string(),
                    "founded group".to_string(),
                    "recognized by org".to_string(),
                ],
                certification_concepts: vec![
                    "industry certification".to_string(),
                    "cloud certified".to_string(),
                    "cybersecurity certificate".to_string(),
                    "ai credential".to_string(),
                    "project management certified".to_string(),
                    "data engineering certification".to_string(),
                ],
                project_concepts: vec![
                    "built application".to_string(),
                    "deployed product".to_string(),
                    "end-to-end project".to_string(),
                    "designed architecture".to_string(),
                    "managed rollout".to_string(),
                    "handled migration".to_string(),
                ],
                certification_signals: vec![
                    "certified".to_string(),
                    "certification".to_string(),
                    "certificate".to_string(),
                    "aws certified".to_string(),
                    "google certified".to_string(),
                    "microsoft certified".to_string(),
                    "scrum master".to_string(),
                    "pmp".to_string(),
                    "ccna".to_string(),
                    "cissp".to_string(),
                    "azure certified".to_string(),
                ],
                bonus_signals: vec![
                    "open source".to_string(),
                    "published".to_string(),
                    "mentored".to_string(),
                    "led team".to_string(),
                    "founded".to_string(),
                    "speaker".to_string(),
                    "initiated".to_string(),
                    "whitepaper".to_string(),
                    "conference".to_string(),
                ],
                project_signals: vec![
                    "end-to-end".to_string(),
                    "architecture".to_string(),
                    "designed".to_string(),
                    "built".to_string(),
                    "launched".to_string(),
                    "deployed".to_string(),
                    "developed".to_string(),
                    "managed".to_string(),
                    "solution".to_string(),
                ],
                verticals: Self::default_verticals(),
            },
            highlights: HighlightRules {
                min_words: 3,
                max_highlights: 5,
                denylist: vec![
                    "phone".to_string(),
                    "linkedin".to_string(),
                    "github".to_string(),
                    "email".to_string(),
                    "college".to_string(),
                    "bachelor".to_string(),
                    "school".to_string(),
                    "university".to_string(),
                    "cgpa".to_string(),
                    "gpa".to_string(),
                    "education".to_string(),
                    "location".to_string(),
                    "designation".to_string(),
                ],
            },
            batch: BatchSettings {
                top_k: 3,
                use_generative_summaries: true,
            },
            genai: GenAiSettings {
                timeout_secs: 30,
                max_prompt_doc_chars: 1500,
                max_narrative_chars: 2000,
            },
        }
    }
}

impl EngineConfig {
    /// Load from the default config path, creating it with defaults on
    /// first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("talent-match")
            .join("config.toml")
    }

    /// Description of each known vertical, embedded against job text for
    /// the vertical boost and used by vertical inference.
    fn default_verticals() -> BTreeMap<String, String> {
        let mut verticals = BTreeMap::new();
        verticals.insert(
            "GEN-AI".to_string(),
            "generative ai, prompt engineering, llm applications".to_string(),
        );
        verticals.insert(
            "Banking".to_string(),
            "financial domain, credit risk, investment platforms".to_string(),
        );
        verticals.insert(
            "Insurance".to_string(),
            "insurance policies, claims processing, underwriting systems".to_string(),
        );
        verticals.insert(
            "GTT".to_string(),
            "network infrastructure, telecom operations, global routing".to_string(),
        );
        verticals.insert(
            "HTPS".to_string(),
            "clinical systems, healthcare workflows, diagnosis tools".to_string(),
        );
        verticals.insert(
            "Cloud".to_string(),
            "cloud-native, devops, aws, azure, kubernetes, lambda".to_string(),
        );
        verticals.insert(
            "Hexavarsity".to_string(),
            "training platform, student management, internal lms".to_string(),
        );
        verticals.insert(
            "Global Travel".to_string(),
            "travel booking, ifs erp, flight scheduling, international systems".to_string(),
        );
        verticals
    }
}
