use sqlx::PgPool;
use storage::{
    dto::hackathon::{CreateHackathonRequest, HackathonSearchQuery, UpdateHackathonRequest},
    error::Result,
    models::Hackathon,
    repository::hackathon::HackathonRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// List hackathons matching the search filters, most recent first
pub async fn list_hackathons(pool: &PgPool, search: &HackathonSearchQuery) -> Result<Vec<Hackathon>> {
    let repo = HackathonRepository::new(pool);
    repo.list(search).await
}

/// Get one hackathon by ID
pub async fn get_hackathon(pool: &PgPool, hackathon_id: Uuid) -> Result<Hackathon> {
    let repo = HackathonRepository::new(pool);
    repo.find_by_id(hackathon_id).await
}

/// Create a hackathon
pub async fn create_hackathon(pool: &PgPool, request: &CreateHackathonRequest) -> Result<Hackathon> {
    let repo = HackathonRepository::new(pool);
    repo.create(request).await
}

/// Update a hackathon, keeping fields the request leaves out
pub async fn update_hackathon(
    pool: &PgPool,
    hackathon_id: Uuid,
    request: &UpdateHackathonRequest,
) -> WebResult<Hackathon> {
    let repo = HackathonRepository::new(pool);

    let existing = repo.find_by_id(hackathon_id).await?;
    let start_date = request.start_date.unwrap_or(existing.start_date);
    let end_date = request.end_date.unwrap_or(existing.end_date);
    if end_date < start_date {
        return Err(WebError::BadRequest(
            "End date must be on or after start date".to_string(),
        ));
    }

    Ok(repo.update(&existing, request).await?)
}

/// Delete a hackathon with its parameters and submissions
pub async fn delete_hackathon(pool: &PgPool, hackathon_id: Uuid) -> Result<()> {
    let repo = HackathonRepository::new(pool);
    repo.delete(hackathon_id).await
}
