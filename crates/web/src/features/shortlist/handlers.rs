use axum::{
    Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::shortlist::{
        FinalizeShortlistRequest, FinalizeShortlistResponse, MoveEntryRequest, SaveOrderRequest,
        SendToAdminRequest, SendToAdminResponse, ShortlistResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;

#[utoipa::path(
    get,
    path = "/api/hackathons/{hackathon_id}/shortlist",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Shortlist in rank order", body = ShortlistResponse),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "shortlist"
)]
pub async fn get_shortlist(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
) -> Result<Json<ShortlistResponse>, WebError> {
    let shortlist = services::get_shortlist(db.pool(), hackathon_id).await?;

    Ok(Json(shortlist))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/shortlist",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = FinalizeShortlistRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Submissions marked as Shortlisted", body = FinalizeShortlistResponse),
        (status = 400, description = "No submissions given"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "shortlist"
)]
pub async fn finalize_shortlist(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<FinalizeShortlistRequest>,
) -> Result<Json<FinalizeShortlistResponse>, WebError> {
    req.validate()?;

    let shortlisted =
        services::finalize_shortlist(db.pool(), hackathon_id, &req.submission_ids).await?;

    Ok(Json(FinalizeShortlistResponse { shortlisted }))
}

#[utoipa::path(
    patch,
    path = "/api/hackathons/{hackathon_id}/shortlist/order",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = SaveOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order saved", body = ShortlistResponse),
        (status = 400, description = "Order does not match the shortlist"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "shortlist"
)]
pub async fn save_order(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<SaveOrderRequest>,
) -> Result<Json<ShortlistResponse>, WebError> {
    let shortlist = services::save_order(db.pool(), hackathon_id, &req.order).await?;

    Ok(Json(shortlist))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/shortlist/move",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = MoveEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Entry moved and order saved", body = ShortlistResponse),
        (status = 400, description = "Index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "shortlist"
)]
pub async fn move_entry(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<MoveEntryRequest>,
) -> Result<Json<ShortlistResponse>, WebError> {
    let shortlist =
        services::move_entry(db.pool(), hackathon_id, req.from_index, req.to_index).await?;

    Ok(Json(shortlist))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/shortlist/send-to-admin",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body(content = SendToAdminRequest, description = "Optional; an order to save before sending"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Shortlist sent", body = SendToAdminResponse),
        (status = 400, description = "Order does not match the shortlist"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "shortlist"
)]
pub async fn send_to_admin(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    body: Option<Json<SendToAdminRequest>>,
) -> Result<Json<SendToAdminResponse>, WebError> {
    let Json(req) = body.unwrap_or_default();

    let response = services::send_to_admin(db.pool(), hackathon_id, req.order.as_deref()).await?;

    Ok(Json(response))
}
