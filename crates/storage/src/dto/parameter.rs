use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Parameter;
use crate::services::weights::{self, WeightChange};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParameterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Percentage; new parameters start unselected at 0 when omitted.
    #[validate(range(min = 0.0, max = 100.0))]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateParameterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustWeightRequest {
    /// Requested percentage, clamped to `[1, 100]`.
    pub weight: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParameterListResponse {
    pub parameters: Vec<Parameter>,
    pub total_weight: f64,
    pub weight_valid: bool,
}

impl From<Vec<Parameter>> for ParameterListResponse {
    fn from(parameters: Vec<Parameter>) -> Self {
        Self {
            total_weight: weights::active_total(&parameters),
            weight_valid: weights::is_weight_valid(&parameters),
            parameters,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeightUpdateResponse {
    pub changes: Vec<WeightChange>,
    pub total_weight: f64,
    pub weight_valid: bool,
}
