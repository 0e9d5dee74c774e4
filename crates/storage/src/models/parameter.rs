use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A named, weighted evaluation criterion belonging to one hackathon.
///
/// `weight` is a percentage in `[0, 100]`. Only selected parameters take part
/// in evaluation, and their weights are expected to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Parameter {
    pub parameter_id: Uuid,
    pub hackathon_id: Uuid,
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub selected: bool,
    pub created_at: NaiveDateTime,
}
