use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::parameter::{CreateParameterRequest, UpdateParameterRequest};
use crate::error::{Result, StorageError};
use crate::models::Parameter;
use crate::services::weights::WeightChange;

const PARAMETER_COLUMNS: &str =
    "parameter_id, hackathon_id, name, description, weight, selected, created_at";

pub struct ParameterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParameterRepository<'a> {
    /// Create a new ParameterRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a hackathon's parameters in creation order
    pub async fn list_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<Parameter>> {
        let parameters = sqlx::query_as::<_, Parameter>(&format!(
            "SELECT {PARAMETER_COLUMNS} FROM parameters WHERE hackathon_id = $1 ORDER BY created_at, name"
        ))
        .bind(hackathon_id)
        .fetch_all(self.pool)
        .await?;

        Ok(parameters)
    }

    /// Get one parameter of a hackathon
    pub async fn find(&self, hackathon_id: Uuid, parameter_id: Uuid) -> Result<Parameter> {
        sqlx::query_as::<_, Parameter>(&format!(
            "SELECT {PARAMETER_COLUMNS} FROM parameters WHERE hackathon_id = $1 AND parameter_id = $2"
        ))
        .bind(hackathon_id)
        .bind(parameter_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a parameter, rejecting a duplicate name within the hackathon
    pub async fn create(&self, hackathon_id: Uuid, req: &CreateParameterRequest) -> Result<Parameter> {
        sqlx::query_as::<_, Parameter>(&format!(
            r#"
            INSERT INTO parameters (hackathon_id, name, description, weight)
            VALUES ($1, $2, $3, $4)
            RETURNING {PARAMETER_COLUMNS}
            "#
        ))
        .bind(hackathon_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.weight.unwrap_or(0.0))
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation("Parameter already exists"))
    }

    /// Update name, description or weight, keeping fields the request leaves out
    pub async fn update(&self, existing: &Parameter, req: &UpdateParameterRequest) -> Result<Parameter> {
        sqlx::query_as::<_, Parameter>(&format!(
            r#"
            UPDATE parameters
            SET name = $2, description = $3, weight = $4
            WHERE parameter_id = $1
            RETURNING {PARAMETER_COLUMNS}
            "#
        ))
        .bind(existing.parameter_id)
        .bind(req.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(req.description.as_ref().unwrap_or(&existing.description))
        .bind(req.weight.unwrap_or(existing.weight))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation("Parameter already exists"))?
        .ok_or(StorageError::NotFound)
    }

    /// Write a single weight
    pub async fn set_weight(&self, parameter_id: Uuid, weight: f64) -> Result<()> {
        let result = sqlx::query("UPDATE parameters SET weight = $2 WHERE parameter_id = $1")
            .bind(parameter_id)
            .bind(weight)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Writes weight and selection for every change in one transaction.
    pub async fn apply_changes(&self, changes: &[WeightChange]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for change in changes {
            sqlx::query("UPDATE parameters SET weight = $2, selected = $3 WHERE parameter_id = $1")
                .bind(change.parameter_id)
                .bind(change.weight)
                .bind(change.selected)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete a parameter of a hackathon
    pub async fn delete(&self, hackathon_id: Uuid, parameter_id: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM parameters WHERE hackathon_id = $1 AND parameter_id = $2")
                .bind(hackathon_id)
                .bind(parameter_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
