use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::parameter::{
        AdjustWeightRequest, CreateParameterRequest, ParameterListResponse,
        UpdateParameterRequest, WeightUpdateResponse,
    },
    models::Parameter,
};
use uuid::Uuid;
use validator::Validate;

use super::{debounce::WeightWriteQueue, services};
use crate::error::WebError;

#[utoipa::path(
    get,
    path = "/api/hackathons/{hackathon_id}/parameters",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Parameters with the current weight total", body = ParameterListResponse),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "parameters"
)]
pub async fn list_parameters(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    Path(hackathon_id): Path<Uuid>,
) -> Result<Json<ParameterListResponse>, WebError> {
    let params = services::load_parameters(db.pool(), &queue, hackathon_id).await?;

    Ok(Json(ParameterListResponse::from(params)))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/parameters",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = CreateParameterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Parameter created", body = Parameter),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found"),
        (status = 409, description = "Parameter name already used in this hackathon")
    ),
    tag = "parameters"
)]
pub async fn create_parameter(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<CreateParameterRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let parameter = services::create_parameter(db.pool(), hackathon_id, &req).await?;

    Ok((StatusCode::CREATED, Json(parameter)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/hackathons/{hackathon_id}/parameters/{parameter_id}",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID"),
        ("parameter_id" = Uuid, Path, description = "Parameter ID")
    ),
    request_body = UpdateParameterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Parameter updated", body = Parameter),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Parameter not found"),
        (status = 409, description = "Parameter name already used in this hackathon")
    ),
    tag = "parameters"
)]
pub async fn update_parameter(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    Path((hackathon_id, parameter_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateParameterRequest>,
) -> Result<Json<Parameter>, WebError> {
    req.validate()?;

    let parameter =
        services::update_parameter(db.pool(), &queue, hackathon_id, parameter_id, &req).await?;

    Ok(Json(parameter))
}

#[utoipa::path(
    delete,
    path = "/api/hackathons/{hackathon_id}/parameters/{parameter_id}",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID"),
        ("parameter_id" = Uuid, Path, description = "Parameter ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Parameter deleted, weight handed to the remaining selection"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Parameter not found")
    ),
    tag = "parameters"
)]
pub async fn delete_parameter(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    Path((hackathon_id, parameter_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::delete_parameter(db.pool(), &queue, hackathon_id, parameter_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/parameters/{parameter_id}/toggle",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID"),
        ("parameter_id" = Uuid, Path, description = "Parameter ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Selection flipped and weights redistributed", body = WeightUpdateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon or parameter not found")
    ),
    tag = "parameters"
)]
pub async fn toggle_parameter(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    Path((hackathon_id, parameter_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WeightUpdateResponse>, WebError> {
    let response =
        services::toggle_parameter(db.pool(), &queue, hackathon_id, parameter_id).await?;

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/hackathons/{hackathon_id}/parameters/{parameter_id}/weight",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID"),
        ("parameter_id" = Uuid, Path, description = "Parameter ID")
    ),
    request_body = AdjustWeightRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 202, description = "Weights rebalanced; writes are debounced", body = WeightUpdateResponse),
        (status = 400, description = "Parameter is not selected"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon or parameter not found")
    ),
    tag = "parameters"
)]
pub async fn adjust_weight(
    State(db): State<Database>,
    State(queue): State<WeightWriteQueue>,
    Path((hackathon_id, parameter_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AdjustWeightRequest>,
) -> Result<Response, WebError> {
    if !req.weight.is_finite() {
        return Err(WebError::BadRequest("Weight must be a number".to_string()));
    }

    let response =
        services::adjust_weight(db.pool(), &queue, hackathon_id, parameter_id, req.weight)
            .await?;

    Ok((StatusCode::ACCEPTED, Json(response)).into_response())
}
