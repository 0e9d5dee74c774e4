use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Submission, SubmissionFile, SubmissionStatus};
use crate::services::submission_table::{
    self, SortKey, StatusFilter, TableError, DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubmissionStats {
    pub total: usize,
    pub pending: usize,
    pub shortlisted: usize,
    pub reviewed: usize,
    pub rejected: usize,
    /// Rows with the `reviewed` flag set, whatever their status.
    pub marked_reviewed: usize,
    pub average_ai_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionRequest {
    pub student_id: Uuid,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(min = 1, message = "At least one file is required"))]
    pub files: Vec<SubmissionFile>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub filter: StatusFilter,
    /// Shorthand for `filter=shortlisted`.
    #[serde(default)]
    pub shortlisted_only: bool,
    #[serde(default)]
    pub sort: SortKey,
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE as u32
}

impl SubmissionListQuery {
    pub fn effective_filter(&self) -> StatusFilter {
        if self.shortlisted_only {
            StatusFilter::Shortlisted
        } else {
            self.filter
        }
    }
}

/// A row count typed by the user, either as a JSON number or as text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CountInput {
    Number(i64),
    Text(String),
}

impl CountInput {
    pub fn resolve(&self) -> Result<usize, TableError> {
        match self {
            Self::Number(n) if *n > 0 => Ok(*n as usize),
            Self::Number(n) => Err(TableError::InvalidCount(n.to_string())),
            Self::Text(text) => submission_table::parse_count(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectTopRequest {
    pub count: CountInput,
    #[serde(default)]
    pub filter: StatusFilter,
    #[serde(default)]
    pub sort: SortKey,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectTopResponse {
    pub shortlisted: Vec<Uuid>,
    pub changed: usize,
    pub skipped: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1))]
    pub submissions: Vec<StatusUpdate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkStatusResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ManualScoreRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub total_score: f64,
}

pub type SubmissionPage = super::common::PaginatedResponse<Submission>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_input_accepts_number_or_text() {
        let number: CountInput = serde_json::from_str("3").unwrap();
        assert_eq!(number.resolve(), Ok(3));

        let text: CountInput = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(text.resolve(), Ok(5));

        let junk: CountInput = serde_json::from_str("\"five\"").unwrap();
        assert!(junk.resolve().is_err());

        let negative: CountInput = serde_json::from_str("-2").unwrap();
        assert!(negative.resolve().is_err());
    }

    #[test]
    fn test_shortlisted_only_overrides_filter() {
        let query = SubmissionListQuery {
            page: 1,
            page_size: 50,
            filter: StatusFilter::Reviewed,
            shortlisted_only: true,
            sort: SortKey::AiScore,
            search: None,
        };
        assert_eq!(query.effective_filter(), StatusFilter::Shortlisted);
    }
}
