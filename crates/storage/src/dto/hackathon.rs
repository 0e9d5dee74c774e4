use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::FileFormat;

/// Request payload for creating a new hackathon
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHackathonRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub allowed_formats: Vec<FileFormat>,
}

/// Request payload for updating an existing hackathon
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHackathonRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub allowed_formats: Option<Vec<FileFormat>>,
}

/// Optional filters for listing hackathons
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HackathonSearchQuery {
    /// Case-insensitive text matched against title or description.
    pub query: Option<String>,
    /// Earliest start date, inclusive.
    pub start_from: Option<NaiveDate>,
    /// Latest start date, inclusive.
    pub start_to: Option<NaiveDate>,
}

impl HackathonSearchQuery {
    pub fn validate_range(&self) -> Result<(), &'static str> {
        if let (Some(from), Some(to)) = (self.start_from, self.start_to)
            && to < from
        {
            return Err("start_to must be on or after start_from");
        }
        Ok(())
    }

    /// `ILIKE` pattern for the text filter, with `%`, `_` and `\` matched literally.
    pub fn pattern(&self) -> Option<String> {
        let text = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())?;

        let mut pattern = String::with_capacity(text.len() + 2);
        pattern.push('%');
        for c in text.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

impl CreateHackathonRequest {
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        if self.end_date < self.start_date {
            return Err("End date must be on or after start date");
        }
        Ok(())
    }

    pub fn format_names(&self) -> Vec<String> {
        self.allowed_formats
            .iter()
            .map(|f| f.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: (i32, u32, u32), end: (i32, u32, u32)) -> CreateHackathonRequest {
        CreateHackathonRequest {
            title: "Winter Build".to_string(),
            description: "Ship a prototype".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            allowed_formats: vec![FileFormat::Video, FileFormat::File],
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        assert!(request((2025, 5, 2), (2025, 5, 1)).validate_dates().is_err());
        assert!(request((2025, 5, 1), (2025, 5, 1)).validate_dates().is_ok());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let mut req = request((2025, 5, 1), (2025, 5, 3));
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = HackathonSearchQuery {
            query: Some("  100%_ai  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.pattern().as_deref(), Some(r"%100\%\_ai%"));

        let blank = HackathonSearchQuery {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.pattern(), None);
    }

    #[test]
    fn test_search_range_must_be_ordered() {
        let query = HackathonSearchQuery {
            query: None,
            start_from: NaiveDate::from_ymd_opt(2025, 6, 1),
            start_to: NaiveDate::from_ymd_opt(2025, 5, 1),
        };
        assert!(query.validate_range().is_err());

        let open_ended = HackathonSearchQuery {
            start_from: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Default::default()
        };
        assert!(open_ended.validate_range().is_ok());
    }

    #[test]
    fn test_format_names() {
        let req = request((2025, 5, 1), (2025, 5, 3));
        assert_eq!(req.format_names(), vec!["Video", "File"]);
    }
}
