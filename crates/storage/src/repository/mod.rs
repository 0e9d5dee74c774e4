pub mod hackathon;
pub mod parameter;
pub mod shortlist;
pub mod submission;
