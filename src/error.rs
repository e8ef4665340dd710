//! Error handling for the talent match engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error("Text extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Explanation error: {0}")]
    Explanation(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Stable tag used when a recovered error is written to the log,
    /// so operators can grep for a failure class across methods.
    pub fn tag(&self) -> &'static str {
        match self {
            EngineError::Io(_) => "IoError",
            EngineError::InvalidEmbedding(_) => "InvalidEmbeddingError",
            EngineError::ExtractionUnavailable(_) => "ExtractionUnavailableError",
            EngineError::Scoring(_) => "ScoringError",
            EngineError::Explanation(_) => "ExplanationError",
            EngineError::Summarization(_) => "SummarizationError",
            EngineError::Configuration(_) => "ConfigurationError",
            EngineError::Serialization(_) => "SerializationError",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Convert anyhow errors from collaborator clients to our error type
impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Summarization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_tags_are_stable() {
        assert_eq!(
            EngineError::Scoring("bad".into()).tag(),
            "ScoringError"
        );
        assert_eq!(
            EngineError::Summarization("timeout".into()).tag(),
            "SummarizationError"
        );
        assert_eq!(
            EngineError::InvalidEmbedding("empty".into()).tag(),
            "InvalidEmbeddingError"
        );
    }

    #[test]
    fn test_anyhow_bridge_maps_to_summarization() {
        let err: EngineError = anyhow::anyhow!("provider unreachable").into();
        assert!(matches!(err, EngineError::Summarization(_)));
        assert!(err.to_string().contains("provider unreachable"));
    }
}
