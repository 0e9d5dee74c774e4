use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::services::shortlist_ranking::{RankAssignment, ShortlistStore};

/// PostgreSQL side of the shortlist ranker.
pub struct ShortlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShortlistRepository<'a> {
    /// Create a new ShortlistRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// When the shortlist was last sent to an admin, if ever
    pub async fn sent_at(&self, hackathon_id: Uuid) -> Result<Option<NaiveDateTime>> {
        let sent_at: Option<Option<NaiveDateTime>> = sqlx::query_scalar(
            "SELECT shortlist_sent_at FROM hackathons WHERE hackathon_id = $1",
        )
        .bind(hackathon_id)
        .fetch_optional(self.pool)
        .await?;

        sent_at.ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl ShortlistStore for ShortlistRepository<'_> {
    async fn save_order(&self, hackathon_id: Uuid, order: &[RankAssignment]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for assignment in order {
            sqlx::query(
                r#"
                UPDATE submissions SET shortlist_rank = $3
                WHERE hackathon_id = $1 AND submission_id = $2 AND status = 'Shortlisted'
                "#,
            )
            .bind(hackathon_id)
            .bind(assignment.submission_id)
            .bind(assignment.rank)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(%hackathon_id, entries = order.len(), "Saved shortlist order");
        Ok(())
    }

    async fn send_to_admin(&self, hackathon_id: Uuid) -> Result<NaiveDateTime> {
        let sent_at: Option<NaiveDateTime> = sqlx::query_scalar(
            r#"
            UPDATE hackathons SET shortlist_sent_at = NOW()
            WHERE hackathon_id = $1
            RETURNING shortlist_sent_at
            "#,
        )
        .bind(hackathon_id)
        .fetch_optional(self.pool)
        .await?
        .flatten();

        sent_at.ok_or(StorageError::NotFound)
    }
}
