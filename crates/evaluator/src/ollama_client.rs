use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{EvaluatorError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5:7b";

#[derive(Debug, Clone, Serialize)]
pub struct OllamaGenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    pub response: String,
    #[serde(default)]
    pub total_duration: Option<i64>,
}

/// Client for an Ollama-compatible `/api/generate` endpoint
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    default_options: OllamaOptions,
}

impl OllamaClient {
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "qwen2.5:7b")
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        // Scores are a short number; keep sampling tight.
        let default_options = OllamaOptions {
            temperature: Some(0.1),
            top_p: Some(0.9),
            num_predict: Some(16),
        };

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            default_options,
        })
    }

    /// Model every generation request is sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a non-streaming generation request and returns the raw reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: Some(self.default_options.clone()),
        };

        tracing::debug!(
            "Sending request to Ollama (model: {}, prompt length: {} chars)",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::ApiError { status, body });
        }

        let reply: OllamaGenerateResponse = response.json().await?;

        if let Some(total) = reply.total_duration {
            tracing::debug!(
                "Ollama generation complete: {:.2}s total, {} chars output",
                total as f64 / 1_000_000_000.0,
                reply.response.len()
            );
        }

        Ok(reply.response.trim().to_string())
    }

    /// Check if the service is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_shape() {
        let request = OllamaGenerateRequest {
            model: DEFAULT_MODEL,
            prompt: "Rate this",
            stream: false,
            options: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "qwen2.5:7b");
        assert_eq!(json["stream"], false);
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", DEFAULT_MODEL).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_health_check_fails_when_unreachable() {
        // Port 9 (discard) is not an HTTP server.
        let client = OllamaClient::new("http://127.0.0.1:9", DEFAULT_MODEL).unwrap();
        assert!(client.health_check().await.is_err());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[tokio::test]
    #[ignore] // Only run when Ollama is running
    async fn test_ollama_health_check() {
        let client = OllamaClient::new(DEFAULT_BASE_URL, DEFAULT_MODEL).unwrap();
        assert!(client.health_check().await.is_ok());
    }
}
