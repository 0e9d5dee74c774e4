use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::adapter::normalize_results;
use crate::error::{EvaluatorError, Result};
use crate::models::{EvaluationRequest, EvaluationResult};
use crate::traits::SubmissionEvaluator;

/// Forwards evaluation runs to an external evaluation service.
pub struct RemoteEvaluator {
    client: Client,
    base_url: String,
}

impl RemoteEvaluator {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/evaluate-custom", self.base_url)
    }
}

#[async_trait]
impl SubmissionEvaluator for RemoteEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Vec<EvaluationResult>> {
        tracing::info!(
            hackathon_id = %request.hackathon_id,
            submissions = request.submission_ids.len(),
            "Forwarding evaluation to {}",
            self.endpoint()
        );

        let response = self.client.post(self.endpoint()).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::ApiError { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        normalize_results(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path() {
        let evaluator = RemoteEvaluator::new("http://scoring.internal:8000/").unwrap();
        assert_eq!(evaluator.endpoint(), "http://scoring.internal:8000/evaluate-custom");
    }
}
