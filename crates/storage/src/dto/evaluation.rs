use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluationParameterInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Percentage.
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EvaluateRequest {
    #[validate(length(min = 1, message = "Select at least one submission"))]
    pub submission_ids: Vec<Uuid>,

    /// Overrides the hackathon's selected parameters when present.
    pub parameters: Option<Vec<EvaluationParameterInput>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EvaluationResultView {
    pub submission_id: Uuid,
    pub total_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluateResponse {
    pub results: Vec<EvaluationResultView>,
    pub evaluated: usize,
    pub failed: usize,
}

impl EvaluateResponse {
    pub fn new(results: Vec<EvaluationResultView>) -> Self {
        let failed = results.iter().filter(|r| r.error.is_some()).count();
        Self {
            evaluated: results.len() - failed,
            failed,
            results,
        }
    }
}
