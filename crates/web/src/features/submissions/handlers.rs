use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::submission::{
        BulkStatusRequest, BulkStatusResponse, CreateSubmissionRequest, ManualScoreRequest,
        SelectTopRequest, SelectTopResponse, SubmissionListQuery, SubmissionPage,
        SubmissionStats,
    },
    models::Submission,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/hackathons/{hackathon_id}/submissions",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID"),
        SubmissionListQuery
    ),
    responses(
        (status = 200, description = "Filtered, sorted page of submissions", body = SubmissionPage),
        (status = 400, description = "Invalid page size"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "submissions"
)]
pub async fn list_submissions(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<SubmissionPage>, WebError> {
    let page = services::list_submissions(db.pool(), hackathon_id, &query).await?;

    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/submissions",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = CreateSubmissionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Submission created", body = Submission),
        (status = 400, description = "Validation error or file format not accepted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found"),
        (status = 409, description = "Student already submitted")
    ),
    tag = "submissions"
)]
pub async fn create_submission(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let submission = services::create_submission(db.pool(), hackathon_id, &req).await?;

    Ok((StatusCode::CREATED, Json(submission)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{hackathon_id}/submissions/stats",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Submission counts and average AI score", body = SubmissionStats),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "submissions"
)]
pub async fn submission_stats(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
) -> Result<Json<SubmissionStats>, WebError> {
    let stats = services::submission_stats(db.pool(), hackathon_id).await?;

    Ok(Json(stats))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{hackathon_id}/submissions/select-top",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = SelectTopRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Top rows shortlisted", body = SelectTopResponse),
        (status = 400, description = "Count is not a positive whole number"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "submissions"
)]
pub async fn select_top(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<SelectTopRequest>,
) -> Result<Json<SelectTopResponse>, WebError> {
    let count = req.count.resolve()?;

    let response = services::select_top(db.pool(), hackathon_id, &req, count).await?;

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/hackathons/{hackathon_id}/submissions/status",
    params(
        ("hackathon_id" = Uuid, Path, description = "Hackathon ID")
    ),
    request_body = BulkStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Statuses saved", body = BulkStatusResponse),
        (status = 400, description = "Illegal status transition or unknown submission"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "submissions"
)]
pub async fn update_statuses(
    State(db): State<Database>,
    Path(hackathon_id): Path<Uuid>,
    Json(req): Json<BulkStatusRequest>,
) -> Result<Json<BulkStatusResponse>, WebError> {
    req.validate()?;

    let updated = services::update_statuses(db.pool(), hackathon_id, &req.submissions).await?;

    Ok(Json(BulkStatusResponse { updated }))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission found", body = Submission),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn get_submission(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<Submission>, WebError> {
    let submission = services::get_submission(db.pool(), submission_id).await?;

    Ok(Json(submission))
}

#[utoipa::path(
    put,
    path = "/api/submissions/{submission_id}/review",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Submission marked as reviewed", body = Submission),
        (status = 400, description = "Rejected submissions must be reopened first"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn mark_reviewed(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<Submission>, WebError> {
    let submission = services::mark_reviewed(db.pool(), submission_id).await?;

    Ok(Json(submission))
}

#[utoipa::path(
    delete,
    path = "/api/submissions/{submission_id}/review",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review removed, submission back to Pending", body = Submission),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn remove_review(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<Submission>, WebError> {
    let submission = services::remove_review(db.pool(), submission_id).await?;

    Ok(Json(submission))
}

#[utoipa::path(
    put,
    path = "/api/submissions/{submission_id}/score",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = ManualScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Manual score saved", body = Submission),
        (status = 400, description = "Score outside 0-100"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn set_manual_score(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
    Json(req): Json<ManualScoreRequest>,
) -> Result<Json<Submission>, WebError> {
    req.validate()?;

    let submission = services::set_manual_score(db.pool(), submission_id, req.total_score).await?;

    Ok(Json(submission))
}
