// src/medreport.rs
//
// Report-generation boundary: aggregated journal text in, raw report text
// out. Production implementation talks to a local Ollama instance running
// the medreport model; a mock stands in for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("cannot reach model service at {0}")]
    Connection(String),
    #[error("model service request timed out after {0}s")]
    Timeout(u64),
    #[error("model service error (status {status}): {body}")]
    Upstream { status: u16, body: String },
    #[error("invalid model service response: {0}")]
    Response(String),
    #[error("http error: {0}")]
    Http(String),
}

/// The single external dependency of report generation. The aggregated
/// journal text is forwarded verbatim; the response text is returned
/// unmodified. No retries.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, journal_description: &str) -> Result<String, GenerateError>;
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Clone)]
pub struct MedreportClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl MedreportClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl ReportGenerator for MedreportClient {
    async fn generate(&self, journal_description: &str) -> Result<String, GenerateError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: journal_description,
            }],
            stream: false,
        };

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                GenerateError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                GenerateError::Timeout(self.timeout_secs)
            } else {
                GenerateError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Response(e.to_string()))?;

        Ok(parsed.message.content)
    }
}

/// Mock generator for tests — returns a configurable response or error.
pub struct MockGenerator {
    response: Result<String, String>,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl ReportGenerator for MockGenerator {
    async fn generate(&self, _journal_description: &str) -> Result<String, GenerateError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(GenerateError::Upstream {
                status: 500,
                body: msg.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_generator_returns_configured_response() {
        let generator = MockGenerator::new("Duration: 3 days");
        let text = generator.generate("Day 1 (2025-03-10): fine\n\n").await.unwrap();
        assert_eq!(text, "Duration: 3 days");
    }

    #[tokio::test]
    async fn mock_generator_surfaces_failure() {
        let generator = MockGenerator::failing("model not loaded");
        let err = generator.generate("anything").await.unwrap_err();
        assert!(matches!(err, GenerateError::Upstream { status: 500, .. }));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = MedreportClient::new("http://localhost:11434/", "medreport", 60).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model, "medreport");
    }

    #[test]
    fn chat_request_serializes_single_user_message() {
        let body = ChatRequest {
            model: "medreport",
            messages: vec![ChatMessage { role: "user", content: "hello" }],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "medreport");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["stream"], false);
    }
}
