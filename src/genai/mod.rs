//! Generative-AI collaborator seams
//!
//! The engine never talks to a provider directly; it goes through the
//! [`Summarizer`] trait, and the live on/off switch comes from a
//! [`GenAiConfigSource`] that is consulted once per explanation call so
//! administrative changes take effect without a restart.

pub mod cohere;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cohere::CohereSummarizer;

/// Generative narrative provider. May fail on auth, quota, transport, or
/// malformed responses; callers are expected to recover.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> anyhow::Result<String>;

    /// Provider name matched against the runtime configuration.
    fn provider(&self) -> &str;
}

/// Runtime switch for generative augmentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenAiConfig {
    pub enabled: bool,
    pub provider: String,
    pub api_key: String,
    /// Instruction appended to the recruiter prompt; the built-in default
    /// applies when empty.
    pub prompt_template: String,
}

impl GenAiConfig {
    /// Whether this configuration permits a generative call at all.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.provider.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Live-reloadable source of [`GenAiConfig`]. Implementations typically
/// read an admin store; the engine never caches the result across calls.
pub trait GenAiConfigSource: Send + Sync {
    fn fetch(&self) -> GenAiConfig;
}

/// Fixed configuration, for hosts without an admin store and for tests.
pub struct StaticGenAiConfig {
    config: GenAiConfig,
}

impl StaticGenAiConfig {
    pub fn new(config: GenAiConfig) -> Self {
        Self { config }
    }

    /// A source that always reports generative augmentation as off.
    pub fn disabled() -> Self {
        Self {
            config: GenAiConfig::default(),
        }
    }
}

impl GenAiConfigSource for StaticGenAiConfig {
    fn fetch(&self) -> GenAiConfig {
        self.config.clone()
    }
}
