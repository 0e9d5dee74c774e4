pub mod shortlist_ranking;
pub mod submission_table;
pub mod weights;
