use sqlx::PgPool;
use storage::{
    dto::parameter::{CreateParameterRequest, UpdateParameterRequest, WeightUpdateResponse},
    error::Result,
    models::Parameter,
    repository::{hackathon::HackathonRepository, parameter::ParameterRepository},
    services::weights::{self, WeightChange},
};
use uuid::Uuid;

use super::debounce::WeightWriteQueue;
use crate::error::WebResult;

/// Parameters with pending weight writes applied.
pub async fn load_parameters(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
) -> Result<Vec<Parameter>> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;

    let mut params = ParameterRepository::new(pool)
        .list_for_hackathon(hackathon_id)
        .await?;
    queue.overlay(&mut params).await;
    Ok(params)
}

/// Add a parameter to a hackathon
pub async fn create_parameter(
    pool: &PgPool,
    hackathon_id: Uuid,
    request: &CreateParameterRequest,
) -> Result<Parameter> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;
    ParameterRepository::new(pool)
        .create(hackathon_id, request)
        .await
}

/// Update a parameter's name, description or weight
pub async fn update_parameter(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
    parameter_id: Uuid,
    request: &UpdateParameterRequest,
) -> Result<Parameter> {
    let repo = ParameterRepository::new(pool);
    let existing = repo.find(hackathon_id, parameter_id).await?;

    if request.weight.is_some() {
        queue.discard(&[parameter_id]).await;
    }
    repo.update(&existing, request).await
}

/// Deselects a selected parameter first so its weight goes to the others.
pub async fn delete_parameter(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
    parameter_id: Uuid,
) -> WebResult<()> {
    let mut params = load_parameters(pool, queue, hackathon_id).await?;
    let repo = ParameterRepository::new(pool);

    let target = params
        .iter()
        .find(|p| p.parameter_id == parameter_id)
        .ok_or(storage::error::StorageError::NotFound)?;

    if target.selected {
        let changes: Vec<WeightChange> = weights::toggle(&mut params, parameter_id)?
            .into_iter()
            .filter(|c| c.parameter_id != parameter_id)
            .collect();
        persist_now(&repo, queue, &changes).await?;
    }

    queue.discard(&[parameter_id]).await;
    repo.delete(hackathon_id, parameter_id).await?;
    Ok(())
}

/// Selection changes are written straight away, replacing any pending weight writes.
pub async fn toggle_parameter(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
    parameter_id: Uuid,
) -> WebResult<WeightUpdateResponse> {
    let mut params = load_parameters(pool, queue, hackathon_id).await?;
    let changes = weights::toggle(&mut params, parameter_id)?;

    persist_now(&ParameterRepository::new(pool), queue, &changes).await?;
    tracing::info!(
        %hackathon_id,
        %parameter_id,
        changed = changes.len(),
        "Toggled parameter"
    );

    Ok(weight_response(changes, &params))
}

/// Rebalances in memory and queues the weight writes.
pub async fn adjust_weight(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
    parameter_id: Uuid,
    value: f64,
) -> WebResult<WeightUpdateResponse> {
    let mut params = load_parameters(pool, queue, hackathon_id).await?;
    let changes = weights::adjust_weight(&mut params, parameter_id, value)?;

    for change in &changes {
        queue.schedule(change.parameter_id, change.weight).await;
    }

    Ok(weight_response(changes, &params))
}

async fn persist_now(
    repo: &ParameterRepository<'_>,
    queue: &WeightWriteQueue,
    changes: &[WeightChange],
) -> Result<()> {
    let ids: Vec<Uuid> = changes.iter().map(|c| c.parameter_id).collect();
    queue.discard(&ids).await;
    repo.apply_changes(changes).await
}

fn weight_response(changes: Vec<WeightChange>, params: &[Parameter]) -> WeightUpdateResponse {
    WeightUpdateResponse {
        changes,
        total_weight: weights::active_total(params),
        weight_valid: weights::is_weight_valid(params),
    }
}
