use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use evaluator::SubmissionEvaluator;
use storage::{
    Database,
    dto::evaluation::{EvaluateRequest, EvaluateResponse},
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::features::parameters::debounce::WeightWriteQueue;

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/evaluate",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = EvaluateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Per-submission evaluation results", body = EvaluateResponse),
        (status = 400, description = "No submissions, no parameters, or weights not summing to 100%"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found"),
        (status = 502, description = "Evaluation service failed")
    ),
    tag = "evaluation"
)]
pub async fn evaluate_submissions(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    State(evaluator): State<Arc<dyn SubmissionEvaluator>>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, WebError> {
    req.validate()?;

    let results =
        services::evaluate(db.pool(), &queue, evaluator.as_ref(), hackathon_id, &req).await?;

    Ok(Json(EvaluateResponse::new(results)))
}
