use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::FileFormat;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hackathon {
    pub hackathon_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub allowed_formats: Vec<String>,
    /// Set once the teacher has sent the ranked shortlist to an admin.
    pub shortlist_sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Hackathon {
    /// An empty format list accepts every format.
    pub fn accepts(&self, format: FileFormat) -> bool {
        self.allowed_formats.is_empty()
            || self
                .allowed_formats
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(format.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hackathon(formats: &[&str]) -> Hackathon {
        Hackathon {
            hackathon_id: Uuid::new_v4(),
            title: "Spring Jam".to_string(),
            description: "Build something".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            allowed_formats: formats.iter().map(|f| f.to_string()).collect(),
            shortlist_sent_at: None,
            created_at: NaiveDate::from_ymd_opt(2025, 2, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_accepts_listed_formats_only() {
        let h = hackathon(&["Video", "image"]);
        assert!(h.accepts(FileFormat::Video));
        assert!(h.accepts(FileFormat::Image));
        assert!(!h.accepts(FileFormat::Audio));
    }

    #[test]
    fn test_empty_format_list_accepts_everything() {
        let h = hackathon(&[]);
        assert!(h.accepts(FileFormat::File));
    }
}
