mod hackathon;
mod parameter;
mod submission;

pub use hackathon::Hackathon;
pub use parameter::Parameter;
pub use submission::{
    CriterionScore, FileFormat, ParseEnumError, Submission, SubmissionFile, SubmissionStatus,
    TransitionError,
};
