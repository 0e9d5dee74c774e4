use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::hackathon::{CreateHackathonRequest, HackathonSearchQuery, UpdateHackathonRequest},
    models::Hackathon,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/hackathons",
    params(
        HackathonSearchQuery
    ),
    responses(
        (status = 200, description = "List matching hackathons successfully", body = Vec<Hackathon>),
        (status = 400, description = "Start date range is reversed")
    ),
    tag = "hackathons"
)]
pub async fn list_hackathons(
    State(db): State<Database>,
    Query(search): Query<HackathonSearchQuery>,
) -> Result<Json<Vec<Hackathon>>, WebError> {
    search
        .validate_range()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let hackathons = services::list_hackathons(db.pool(), &search).await?;

    Ok(Json(hackathons))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{hackathon_id}",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Hackathon found", body = Hackathon),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn get_hackathon(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
) -> Result<Json<Hackathon>, WebError> {
    let hackathon = services::get_hackathon(db.pool(), hackathon_id).await?;

    Ok(Json(hackathon))
}

#[utoipa::path(
    post,
    path = "/api/hackathons",
    request_body = CreateHackathonRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Hackathon created successfully", body = Hackathon),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "hackathons"
)]
pub async fn create_hackathon(
    State(db): State<Database>,
    Json(req): Json<CreateHackathonRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let hackathon = services::create_hackathon(db.pool(), &req).await?;
    tracing::info!(hackathon_id = %hackathon.hackathon_id, "Created hackathon");

    Ok((StatusCode::CREATED, Json(hackathon)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/hackathons/{hackathon_id}",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = UpdateHackathonRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Hackathon updated successfully", body = Hackathon),
        (status = 400, description = "Validation error or end date before start date"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn update_hackathon(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(update_req): Json<UpdateHackathonRequest>,
) -> Result<Json<Hackathon>, WebError> {
    update_req.validate()?;

    let updated = services::update_hackathon(db.pool(), hackathon_id, &update_req).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/hackathons/{hackathon_id}",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Hackathon deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn delete_hackathon(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_hackathon(db.pool(), hackathon_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
