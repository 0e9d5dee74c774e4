use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::hackathon::{CreateHackathonRequest, HackathonSearchQuery, UpdateHackathonRequest};
use crate::error::{Result, StorageError};
use crate::models::Hackathon;

const HACKATHON_COLUMNS: &str = "hackathon_id, title, description, start_date, end_date, \
     allowed_formats, shortlist_sent_at, created_at";

/// Repository for Hackathon database operations
pub struct HackathonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HackathonRepository<'a> {
    /// Create a new HackathonRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List hackathons matching the search filters, most recent start first
    pub async fn list(&self, search: &HackathonSearchQuery) -> Result<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(&format!(
            r#"
            SELECT {HACKATHON_COLUMNS} FROM hackathons
            WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::date IS NULL OR start_date >= $2)
              AND ($3::date IS NULL OR start_date <= $3)
            ORDER BY start_date DESC, created_at DESC
            "#
        ))
        .bind(search.pattern())
        .bind(search.start_from)
        .bind(search.start_to)
        .fetch_all(self.pool)
        .await?;

        Ok(hackathons)
    }

    /// Get a hackathon by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Hackathon> {
        sqlx::query_as::<_, Hackathon>(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE hackathon_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a new hackathon
    pub async fn create(&self, req: &CreateHackathonRequest) -> Result<Hackathon> {
        let hackathon = sqlx::query_as::<_, Hackathon>(&format!(
            r#"
            INSERT INTO hackathons (title, description, start_date, end_date, allowed_formats)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HACKATHON_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.format_names())
        .fetch_one(self.pool)
        .await?;

        Ok(hackathon)
    }

    /// Applies the set fields of `req` on top of `existing`.
    pub async fn update(&self, existing: &Hackathon, req: &UpdateHackathonRequest) -> Result<Hackathon> {
        let allowed_formats: Vec<String> = match &req.allowed_formats {
            Some(formats) => formats.iter().map(|f| f.as_str().to_string()).collect(),
            None => existing.allowed_formats.clone(),
        };

        sqlx::query_as::<_, Hackathon>(&format!(
            r#"
            UPDATE hackathons
            SET title = $2, description = $3, start_date = $4, end_date = $5, allowed_formats = $6
            WHERE hackathon_id = $1
            RETURNING {HACKATHON_COLUMNS}
            "#
        ))
        .bind(existing.hackathon_id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.description.as_ref().unwrap_or(&existing.description))
        .bind(req.start_date.unwrap_or(existing.start_date))
        .bind(req.end_date.unwrap_or(existing.end_date))
        .bind(allowed_formats)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Delete a hackathon; parameters and submissions cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM hackathons WHERE hackathon_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
