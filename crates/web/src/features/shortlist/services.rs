use sqlx::PgPool;
use storage::{
    dto::shortlist::{SendToAdminResponse, ShortlistResponse},
    repository::{
        hackathon::HackathonRepository, shortlist::ShortlistRepository,
        submission::SubmissionRepository,
    },
    services::shortlist_ranking::{RankAssignment, ShortlistRanker},
};
use uuid::Uuid;

use crate::error::WebResult;

async fn load_ranker(pool: &PgPool, hackathon_id: Uuid) -> WebResult<ShortlistRanker> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;
    let shortlisted = SubmissionRepository::new(pool)
        .list_shortlisted(hackathon_id)
        .await?;
    Ok(ShortlistRanker::new(hackathon_id, shortlisted))
}

async fn response(pool: &PgPool, ranker: ShortlistRanker) -> WebResult<ShortlistResponse> {
    let hackathon_id = ranker.hackathon_id();
    let sent_at = ShortlistRepository::new(pool).sent_at(hackathon_id).await?;

    Ok(ShortlistResponse {
        hackathon_id,
        entries: ranker.into_entries(),
        sent_at,
    })
}

/// Ranked shortlist with the last send time
pub async fn get_shortlist(pool: &PgPool, hackathon_id: Uuid) -> WebResult<ShortlistResponse> {
    let ranker = load_ranker(pool, hackathon_id).await?;
    response(pool, ranker).await
}

/// Marks the chosen submissions as Shortlisted
pub async fn finalize_shortlist(
    pool: &PgPool,
    hackathon_id: Uuid,
    submission_ids: &[Uuid],
) -> WebResult<u64> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;
    let shortlisted = SubmissionRepository::new(pool)
        .shortlist(hackathon_id, submission_ids)
        .await?;

    tracing::info!(%hackathon_id, shortlisted, "Finalized shortlist");
    Ok(shortlisted)
}

/// Replaces the order with a full client ranking and saves it
pub async fn save_order(
    pool: &PgPool,
    hackathon_id: Uuid,
    order: &[RankAssignment],
) -> WebResult<ShortlistResponse> {
    let mut ranker = load_ranker(pool, hackathon_id).await?;
    ranker.apply_order(order)?;
    ranker.save_order(&ShortlistRepository::new(pool)).await?;

    response(pool, ranker).await
}

/// Moves one entry and saves the new order when it changed
pub async fn move_entry(
    pool: &PgPool,
    hackathon_id: Uuid,
    from_index: usize,
    to_index: usize,
) -> WebResult<ShortlistResponse> {
    let mut ranker = load_ranker(pool, hackathon_id).await?;
    ranker.reorder(from_index, to_index)?;
    if ranker.order_changed() {
        ranker.save_order(&ShortlistRepository::new(pool)).await?;
    }

    response(pool, ranker).await
}

/// Save the order if it changed, then mark the shortlist as sent
pub async fn send_to_admin(
    pool: &PgPool,
    hackathon_id: Uuid,
    order: Option<&[RankAssignment]>,
) -> WebResult<SendToAdminResponse> {
    let mut ranker = load_ranker(pool, hackathon_id).await?;
    if let Some(order) = order {
        ranker.apply_order(order)?;
    }

    let order_saved = ranker.order_changed();
    let sent_at = ranker
        .send_to_admin(&ShortlistRepository::new(pool))
        .await?;

    tracing::info!(
        %hackathon_id,
        entries = ranker.entries().len(),
        order_saved,
        "Shortlist sent to admin"
    );

    Ok(SendToAdminResponse {
        sent_at,
        order_saved,
    })
}
