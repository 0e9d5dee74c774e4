use sqlx::PgPool;
use storage::{
    dto::submission::{
        CreateSubmissionRequest, SelectTopRequest, SelectTopResponse, StatusUpdate,
        SubmissionListQuery, SubmissionPage, SubmissionStats,
    },
    models::{Submission, SubmissionStatus},
    repository::{hackathon::HackathonRepository, submission::SubmissionRepository},
    services::submission_table::SubmissionTable,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

async fn load_table(pool: &PgPool, hackathon_id: Uuid) -> WebResult<SubmissionTable> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;
    let rows = SubmissionRepository::new(pool)
        .list_for_hackathon(hackathon_id)
        .await?;
    Ok(SubmissionTable::new(rows))
}

/// One page of the filtered, sorted submission table
pub async fn list_submissions(
    pool: &PgPool,
    hackathon_id: Uuid,
    query: &SubmissionListQuery,
) -> WebResult<SubmissionPage> {
    let mut table = load_table(pool, hackathon_id)
        .await?
        .with_page_size(query.page_size as usize)?;

    table.set_filter(query.effective_filter());
    table.set_search(query.search.clone());
    table.sort_by(query.sort);
    let page = table.go_to_page(query.page as usize);

    let data: Vec<Submission> = table.page_rows().into_iter().cloned().collect();
    Ok(SubmissionPage::new(
        data,
        page as u32,
        table.page_size() as u32,
        table.filtered_count() as i64,
    ))
}

/// Get a submission by ID
pub async fn get_submission(pool: &PgPool, submission_id: Uuid) -> WebResult<Submission> {
    Ok(SubmissionRepository::new(pool)
        .find_by_id(submission_id)
        .await?)
}

/// Create a submission, checking its files against the hackathon's formats
pub async fn create_submission(
    pool: &PgPool,
    hackathon_id: Uuid,
    request: &CreateSubmissionRequest,
) -> WebResult<Submission> {
    let hackathon = HackathonRepository::new(pool).find_by_id(hackathon_id).await?;

    if let Some(file) = request.files.iter().find(|f| !hackathon.accepts(f.format)) {
        return Err(WebError::BadRequest(format!(
            "This hackathon does not accept {} files",
            file.format.as_str()
        )));
    }

    Ok(SubmissionRepository::new(pool)
        .create(hackathon_id, request)
        .await?)
}

/// Status counts and average AI score for a hackathon
pub async fn submission_stats(pool: &PgPool, hackathon_id: Uuid) -> WebResult<SubmissionStats> {
    Ok(load_table(pool, hackathon_id).await?.stats())
}

/// Shortlists the top `count` rows under the request's filter and sort.
pub async fn select_top(
    pool: &PgPool,
    hackathon_id: Uuid,
    request: &SelectTopRequest,
    count: usize,
) -> WebResult<SelectTopResponse> {
    let mut table = load_table(pool, hackathon_id).await?;
    table.set_filter(request.filter);
    table.sort_by(request.sort);

    let outcome = table.select_top(count)?;
    if !outcome.changed.is_empty() {
        SubmissionRepository::new(pool)
            .update_statuses(hackathon_id, &outcome.changed)
            .await?;
    }

    tracing::info!(
        %hackathon_id,
        count,
        changed = outcome.changed.len(),
        skipped = outcome.skipped.len(),
        "Selected top submissions"
    );

    Ok(SelectTopResponse {
        shortlisted: table.shortlisted_ids(),
        changed: outcome.changed.len(),
        skipped: outcome.skipped,
    })
}

/// Applies every status in the request after checking each transition.
pub async fn update_statuses(
    pool: &PgPool,
    hackathon_id: Uuid,
    updates: &[StatusUpdate],
) -> WebResult<u64> {
    let table = load_table(pool, hackathon_id).await?;

    for update in updates {
        let row = table
            .rows()
            .iter()
            .find(|r| r.submission_id == update.submission_id)
            .ok_or_else(|| {
                WebError::BadRequest(format!(
                    "Submission {} does not belong to this hackathon",
                    update.submission_id
                ))
            })?;
        row.status.transition_to(update.status)?;
    }

    Ok(SubmissionRepository::new(pool)
        .update_statuses(hackathon_id, updates)
        .await?)
}

/// Mark a submission as reviewed
pub async fn mark_reviewed(pool: &PgPool, submission_id: Uuid) -> WebResult<Submission> {
    set_review(pool, submission_id, true, SubmissionStatus::Reviewed).await
}

/// Remove a review, moving the submission back to pending
pub async fn remove_review(pool: &PgPool, submission_id: Uuid) -> WebResult<Submission> {
    set_review(pool, submission_id, false, SubmissionStatus::Pending).await
}

async fn set_review(
    pool: &PgPool,
    submission_id: Uuid,
    reviewed: bool,
    status: SubmissionStatus,
) -> WebResult<Submission> {
    let repo = SubmissionRepository::new(pool);
    let existing = repo.find_by_id(submission_id).await?;
    let status = existing.status.transition_to(status)?;

    Ok(repo.set_review(submission_id, reviewed, status).await?)
}

/// Set the manual score of a submission
pub async fn set_manual_score(
    pool: &PgPool,
    submission_id: Uuid,
    total_score: f64,
) -> WebResult<Submission> {
    Ok(SubmissionRepository::new(pool)
        .set_manual_score(submission_id, total_score)
        .await?)
}
