pub mod evaluation;
pub mod hackathons;
pub mod parameters;
pub mod shortlist;
pub mod submissions;
