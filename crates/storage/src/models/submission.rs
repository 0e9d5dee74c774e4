use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move submission from {from} to {to}")]
pub struct TransitionError {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Shortlisted,
    Reviewed,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shortlisted => "Shortlisted",
            Self::Reviewed => "Reviewed",
            Self::Rejected => "Rejected",
        }
    }

    /// Forward moves are `Pending -> Shortlisted -> Reviewed` and any
    /// non-rejected state `-> Rejected`. Un-shortlisting, removing a review
    /// and reopening a rejected submission go back through `Pending`.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;

        if self == next {
            return true;
        }

        match self {
            Pending => matches!(next, Shortlisted | Reviewed | Rejected),
            Shortlisted => matches!(next, Reviewed | Rejected | Pending),
            Reviewed => matches!(next, Shortlisted | Rejected | Pending),
            Rejected => next == Pending,
        }
    }

    pub fn transition_to(self, next: SubmissionStatus) -> Result<SubmissionStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Shortlisted" => Ok(Self::Shortlisted),
            "Reviewed" => Ok(Self::Reviewed),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "submission status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FileFormat {
    Audio,
    Video,
    File,
    Image,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::File => "File",
            Self::Image => "Image",
        }
    }
}

impl FromStr for FileFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            "file" => Ok(Self::File),
            "image" => Ok(Self::Image),
            _ => Err(ParseEnumError {
                kind: "file format",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionFile {
    pub format: FileFormat,
    pub file_url: String,
}

/// AI score for one parameter, as recorded by the last evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CriterionScore {
    pub parameter: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub submission_id: Uuid,
    pub hackathon_id: Uuid,
    pub student_id: Uuid,
    pub files: Vec<SubmissionFile>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub ai_scores: Vec<CriterionScore>,
    /// Weighted total from the AI evaluation, 0-100.
    pub total_ai_score: f64,
    /// Manual score assigned by a teacher, 0-100.
    pub total_score: f64,
    pub status: SubmissionStatus,
    pub reviewed: bool,
    pub shortlist_rank: Option<i32>,
    pub submitted_at: NaiveDateTime,
}

impl Submission {
    pub fn combined_score(&self) -> f64 {
        self.total_ai_score + self.total_score
    }

    pub fn is_shortlisted(&self) -> bool {
        self.status == SubmissionStatus::Shortlisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [Pending, Shortlisted, Reviewed, Rejected] {
            assert_eq!(status.as_str().parse::<SubmissionStatus>(), Ok(status));
        }
        assert!("shortlisted".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(Pending.can_transition_to(Shortlisted));
        assert!(Shortlisted.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Shortlisted.can_transition_to(Rejected));
    }

    #[test]
    fn test_rejected_only_reopens_to_pending() {
        assert!(Rejected.can_transition_to(Pending));
        assert!(Rejected.can_transition_to(Rejected));
        assert_eq!(
            Rejected.transition_to(Shortlisted),
            Err(TransitionError {
                from: Rejected,
                to: Shortlisted
            })
        );
    }

    #[test]
    fn test_file_format_parse_is_case_insensitive() {
        assert_eq!("VIDEO".parse::<FileFormat>(), Ok(FileFormat::Video));
        assert!("pdf".parse::<FileFormat>().is_err());
    }
}
