//! Cohere chat client, the default [`Summarizer`] implementation

use super::Summarizer;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const COHERE_CHAT_URL: &str = "https://api.cohere.ai/v1/chat";
const MODEL: &str = "command-r";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    text: Option<String>,
}

pub struct CohereSummarizer {
    client: Client,
    api_key: String,
}

impl CohereSummarizer {
    /// The client timeout is a transport-level guard; the engine applies
    /// its own tighter deadline around each call.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build Cohere HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Summarizer for CohereSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(COHERE_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                message: prompt,
                model: MODEL,
            })
            .send()
            .await
            .context("Cohere request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Cohere returned {}: {}", status, body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Cohere response")?;

        match chat.text {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(anyhow!("Cohere response carried no text")),
        }
    }

    fn provider(&self) -> &str {
        "cohere"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            message: "Summarize the fit.",
            model: MODEL,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "Summarize the fit.");
        assert_eq!(json["model"], "command-r");
    }

    #[test]
    fn test_response_deserialization() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"text": "Strong match.", "finish_reason": "COMPLETE"}"#)
                .unwrap();
        assert_eq!(chat.text.as_deref(), Some("Strong match."));

        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text.is_none());
    }

    #[test]
    fn test_provider_name() {
        let summarizer = CohereSummarizer::new("key").unwrap();
        assert_eq!(summarizer.provider(), "cohere");
    }
}
