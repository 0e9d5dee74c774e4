use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::services::shortlist_ranking::{RankAssignment, ShortlistEntry};

#[derive(Debug, Serialize, ToSchema)]
pub struct ShortlistResponse {
    pub hackathon_id: Uuid,
    pub entries: Vec<ShortlistEntry>,
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FinalizeShortlistRequest {
    #[validate(length(min = 1, message = "Select at least one submission"))]
    pub submission_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeShortlistResponse {
    pub shortlisted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveOrderRequest {
    pub order: Vec<RankAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoveEntryRequest {
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SendToAdminRequest {
    /// Client side order to save before sending, when it changed.
    pub order: Option<Vec<RankAssignment>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendToAdminResponse {
    pub sent_at: NaiveDateTime,
    pub order_saved: bool,
}
