use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::submission::{CreateSubmissionRequest, StatusUpdate};
use crate::error::{Result, StorageError};
use crate::models::{CriterionScore, Submission, SubmissionFile, SubmissionStatus};

const SUBMISSION_COLUMNS: &str = "submission_id, hackathon_id, student_id, files, description, \
     tags, ai_scores, total_ai_score, total_score, status, reviewed, shortlist_rank, submitted_at";

#[derive(Debug, FromRow)]
struct SubmissionRow {
    submission_id: Uuid,
    hackathon_id: Uuid,
    student_id: Uuid,
    files: Json<Vec<SubmissionFile>>,
    description: Option<String>,
    tags: Vec<String>,
    ai_scores: Json<Vec<CriterionScore>>,
    total_ai_score: f64,
    total_score: f64,
    status: String,
    reviewed: bool,
    shortlist_rank: Option<i32>,
    submitted_at: NaiveDateTime,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StorageError;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        let status = row
            .status
            .parse::<SubmissionStatus>()
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;

        Ok(Submission {
            submission_id: row.submission_id,
            hackathon_id: row.hackathon_id,
            student_id: row.student_id,
            files: row.files.0,
            description: row.description,
            tags: row.tags,
            ai_scores: row.ai_scores.0,
            total_ai_score: row.total_ai_score,
            total_score: row.total_score,
            status,
            reviewed: row.reviewed,
            shortlist_rank: row.shortlist_rank,
            submitted_at: row.submitted_at,
        })
    }
}

fn into_submissions(rows: Vec<SubmissionRow>) -> Result<Vec<Submission>> {
    rows.into_iter().map(Submission::try_from).collect()
}

pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    /// Create a new SubmissionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a hackathon's submissions, oldest first
    pub async fn list_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE hackathon_id = $1 ORDER BY submitted_at, submission_id"
        ))
        .bind(hackathon_id)
        .fetch_all(self.pool)
        .await?;

        into_submissions(rows)
    }

    /// List a hackathon's shortlisted submissions
    pub async fn list_shortlisted(&self, hackathon_id: Uuid) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS} FROM submissions
            WHERE hackathon_id = $1 AND status = $2
            ORDER BY shortlist_rank NULLS LAST, submitted_at
            "#
        ))
        .bind(hackathon_id)
        .bind(SubmissionStatus::Shortlisted.as_str())
        .fetch_all(self.pool)
        .await?;

        into_submissions(rows)
    }

    /// Loads the given submissions of one hackathon; unknown IDs are silently left out.
    pub async fn find_many(&self, hackathon_id: Uuid, ids: &[Uuid]) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS} FROM submissions
            WHERE hackathon_id = $1 AND submission_id = ANY($2)
            ORDER BY submitted_at
            "#
        ))
        .bind(hackathon_id)
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        into_submissions(rows)
    }

    /// Get a submission by ID
    pub async fn find_by_id(&self, submission_id: Uuid) -> Result<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE submission_id = $1"
        ))
        .bind(submission_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Create a pending submission
    pub async fn create(&self, hackathon_id: Uuid, req: &CreateSubmissionRequest) -> Result<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions (hackathon_id, student_id, files, description, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(hackathon_id)
        .bind(req.student_id)
        .bind(Json(&req.files))
        .bind(&req.description)
        .bind(&req.tags)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation("Student already submitted to this hackathon")
        })?;

        row.try_into()
    }

    /// Writes every status in one transaction. Rows leaving `Shortlisted` lose their rank.
    pub async fn update_statuses(&self, hackathon_id: Uuid, updates: &[StatusUpdate]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for update in updates {
            let result = sqlx::query(
                r#"
                UPDATE submissions
                SET status = $3,
                    shortlist_rank = CASE WHEN $3 = 'Shortlisted' THEN shortlist_rank ELSE NULL END
                WHERE hackathon_id = $1 AND submission_id = $2
                "#,
            )
            .bind(hackathon_id)
            .bind(update.submission_id)
            .bind(update.status.as_str())
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Marks the given submissions as Shortlisted. Rejected rows are left alone.
    pub async fn shortlist(&self, hackathon_id: Uuid, ids: &[Uuid]) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE submissions SET status = 'Shortlisted'
            WHERE hackathon_id = $1 AND submission_id = ANY($2) AND status <> 'Rejected'
            "#,
        )
        .bind(hackathon_id)
        .bind(ids)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set the reviewed flag together with the resulting status
    pub async fn set_review(&self, submission_id: Uuid, reviewed: bool, status: SubmissionStatus) -> Result<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            UPDATE submissions
            SET reviewed = $2, status = $3,
                shortlist_rank = CASE WHEN $3 = 'Shortlisted' THEN shortlist_rank ELSE NULL END
            WHERE submission_id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(submission_id)
        .bind(reviewed)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Set the manual score
    pub async fn set_manual_score(&self, submission_id: Uuid, total_score: f64) -> Result<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "UPDATE submissions SET total_score = $2 WHERE submission_id = $1 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(submission_id)
        .bind(total_score)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Store the AI scores and weighted total of one evaluation
    pub async fn record_evaluation(
        &self,
        submission_id: Uuid,
        scores: &[CriterionScore],
        total_ai_score: f64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE submissions SET ai_scores = $2, total_ai_score = $3 WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(Json(scores))
        .bind(total_ai_score)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
