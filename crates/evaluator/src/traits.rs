use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EvaluationRequest, EvaluationResult, WeightedParameter};

/// Scores a batch of submissions against weighted parameters.
#[async_trait]
pub trait SubmissionEvaluator: Send + Sync {
    /// One result per requested submission, in request order.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Vec<EvaluationResult>>;
}

/// Scores one submission text against one criterion, 0 to 100.
#[async_trait]
pub trait CriterionScorer: Send + Sync {
    async fn score(
        &self,
        hackathon_title: Option<&str>,
        criterion: &WeightedParameter,
        submission_text: &str,
    ) -> Result<f64>;
}
