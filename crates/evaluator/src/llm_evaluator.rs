use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CriterionResult, EvaluationRequest, EvaluationResult, WeightedParameter};
use crate::ollama_client::OllamaClient;
use crate::prompts::{PromptBuilder, extract_score};
use crate::traits::{CriterionScorer, SubmissionEvaluator};

/// `CriterionScorer` backed by an Ollama-compatible model.
pub struct OllamaScorer {
    client: OllamaClient,
}

impl OllamaScorer {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CriterionScorer for OllamaScorer {
    async fn score(
        &self,
        hackathon_title: Option<&str>,
        criterion: &WeightedParameter,
        submission_text: &str,
    ) -> Result<f64> {
        let prompt = PromptBuilder::criterion_prompt(hackathon_title, criterion, submission_text);
        let reply = self.client.generate(&prompt).await?;
        Ok(extract_score(&reply))
    }
}

/// Scores each submission criterion by criterion and combines the weighted scores.
pub struct LlmEvaluator<S> {
    scorer: S,
}

impl<S: CriterionScorer> LlmEvaluator<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    async fn evaluate_one(
        &self,
        request: &EvaluationRequest,
        submission_id: uuid::Uuid,
    ) -> EvaluationResult {
        let Some(content) = request.content_for(submission_id) else {
            return EvaluationResult::failed(submission_id, "Submission content not available");
        };

        let text = content.text();
        let title = request.hackathon_title.as_deref();
        let mut scores = Vec::with_capacity(request.parameters.len());

        for parameter in &request.parameters {
            let started = Instant::now();
            match self.scorer.score(title, parameter, &text).await {
                Ok(score) => {
                    let weighted_score = score * parameter.weight / 100.0;
                    tracing::info!(
                        %submission_id,
                        "Evaluation for \"{}\" completed: score {}, weighted {:.2} ({:.1}s)",
                        parameter.name,
                        score,
                        weighted_score,
                        started.elapsed().as_secs_f64()
                    );
                    scores.push(CriterionResult {
                        parameter: parameter.name.clone(),
                        score,
                        weight: parameter.weight,
                        weighted_score,
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        %submission_id,
                        "Error evaluating parameter \"{}\": {}",
                        parameter.name,
                        e
                    );
                    scores.push(CriterionResult {
                        parameter: parameter.name.clone(),
                        score: 0.0,
                        weight: parameter.weight,
                        weighted_score: 0.0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let total_score = scores.iter().map(|s| s.weighted_score).sum::<f64>().round();
        let error = if !scores.is_empty() && scores.iter().all(|s| s.error.is_some()) {
            Some("Every criterion failed to evaluate".to_string())
        } else {
            None
        };

        EvaluationResult {
            submission_id,
            scores,
            total_score,
            error,
        }
    }
}

#[async_trait]
impl<S: CriterionScorer> SubmissionEvaluator for LlmEvaluator<S> {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Vec<EvaluationResult>> {
        tracing::info!(
            hackathon_id = %request.hackathon_id,
            submissions = request.submission_ids.len(),
            parameters = request.parameters.len(),
            "Starting evaluation"
        );

        let mut results = Vec::with_capacity(request.submission_ids.len());
        for &submission_id in &request.submission_ids {
            results.push(self.evaluate_one(request, submission_id).await);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluatorError;
    use crate::models::SubmissionContent;
    use uuid::Uuid;

    /// Scores by criterion name; unknown names fail.
    struct FakeScorer(Vec<(&'static str, f64)>);

    #[async_trait]
    impl CriterionScorer for FakeScorer {
        async fn score(
            &self,
            _hackathon_title: Option<&str>,
            criterion: &WeightedParameter,
            _submission_text: &str,
        ) -> Result<f64> {
            self.0
                .iter()
                .find(|(name, _)| *name == criterion.name)
                .map(|(_, score)| *score)
                .ok_or_else(|| EvaluatorError::EvaluationError("model offline".to_string()))
        }
    }

    fn request(submission_id: Uuid, parameters: Vec<WeightedParameter>) -> EvaluationRequest {
        EvaluationRequest::new(Uuid::new_v4(), vec![submission_id], parameters).with_submissions(
            vec![SubmissionContent {
                submission_id,
                description: Some("A tool for tracking bees".to_string()),
                ..Default::default()
            }],
        )
    }

    #[tokio::test]
    async fn test_weighted_total() {
        let id = Uuid::new_v4();
        let evaluator = LlmEvaluator::new(FakeScorer(vec![("Innovation", 80.0), ("Impact", 65.0)]));
        let req = request(
            id,
            vec![
                WeightedParameter::new("Innovation", "", 60.0),
                WeightedParameter::new("Impact", "", 40.0),
            ],
        );

        let results = evaluator.evaluate(&req).await.unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.is_success());
        assert_eq!(result.scores[0].weighted_score, 48.0);
        assert_eq!(result.scores[1].weighted_score, 26.0);
        assert_eq!(result.total_score, 74.0);
    }

    #[tokio::test]
    async fn test_failed_criterion_scores_zero() {
        let id = Uuid::new_v4();
        let evaluator = LlmEvaluator::new(FakeScorer(vec![("Innovation", 90.0)]));
        let req = request(
            id,
            vec![
                WeightedParameter::new("Innovation", "", 50.0),
                WeightedParameter::new("Design", "", 50.0),
            ],
        );

        let result = evaluator.evaluate(&req).await.unwrap().remove(0);
        assert!(result.is_success());
        assert_eq!(result.scores[1].score, 0.0);
        assert!(result.scores[1].error.is_some());
        assert_eq!(result.total_score, 45.0);
    }

    #[tokio::test]
    async fn test_all_criteria_failing_marks_result_failed() {
        let id = Uuid::new_v4();
        let evaluator = LlmEvaluator::new(FakeScorer(vec![]));
        let req = request(id, vec![WeightedParameter::new("Design", "", 100.0)]);

        let result = evaluator.evaluate(&req).await.unwrap().remove(0);
        assert!(!result.is_success());
        assert_eq!(result.total_score, 0.0);
    }

    #[tokio::test]
    async fn test_missing_content_is_reported() {
        let evaluator = LlmEvaluator::new(FakeScorer(vec![("Design", 50.0)]));
        let missing = Uuid::new_v4();
        let req = EvaluationRequest::new(
            Uuid::new_v4(),
            vec![missing],
            vec![WeightedParameter::new("Design", "", 100.0)],
        );

        let results = evaluator.evaluate(&req).await.unwrap();
        assert_eq!(results[0].submission_id, missing);
        assert!(results[0].error.is_some());
    }
}
