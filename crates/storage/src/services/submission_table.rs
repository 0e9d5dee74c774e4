//! In-memory filter, sort, pagination and selection over a hackathon's submissions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::submission::{StatusUpdate, SubmissionStats};
use crate::models::{Submission, SubmissionStatus};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Count must be a positive whole number, got '{0}'")]
    InvalidCount(String),

    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Shortlisted,
    Reviewed,
    NotReviewed,
}

impl StatusFilter {
    fn matches(&self, submission: &Submission) -> bool {
        match self {
            Self::All => true,
            Self::Shortlisted => submission.status == SubmissionStatus::Shortlisted,
            Self::Reviewed => submission.reviewed,
            Self::NotReviewed => !submission.reviewed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Oldest submission first.
    #[default]
    Submitted,
    /// Highest `total_ai_score` first.
    AiScore,
    /// Highest manual `total_score` first.
    ManualScore,
}

/// Result of a select-by-count pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SelectTopOutcome {
    /// Rows whose status actually changed and need persisting.
    pub changed: Vec<StatusUpdate>,
    /// Rows in the top N that could not be shortlisted.
    pub skipped: Vec<Uuid>,
}

/// Parses a user typed row count.
pub fn parse_count(input: &str) -> Result<usize, TableError> {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as usize),
        _ => Err(TableError::InvalidCount(input.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionTable {
    rows: Vec<Submission>,
    filter: StatusFilter,
    search: Option<String>,
    page_size: usize,
    current_page: usize,
    selection: HashSet<Uuid>,
}

impl SubmissionTable {
    pub fn new(rows: Vec<Submission>) -> Self {
        let mut table = Self {
            rows,
            filter: StatusFilter::All,
            search: None,
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            selection: HashSet::new(),
        };
        table.sort_by(SortKey::Submitted);
        table
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, TableError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(TableError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(self)
    }

    pub fn rows(&self) -> &[Submission] {
        &self.rows
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.current_page = 1;
    }

    pub fn set_shortlisted_only(&mut self, shortlisted_only: bool) {
        self.set_filter(if shortlisted_only {
            StatusFilter::Shortlisted
        } else {
            StatusFilter::All
        });
    }

    pub fn set_search(&mut self, query: Option<String>) {
        self.search = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        self.current_page = 1;
    }

    /// Re-sorts every row. The sort is stable, so equal keys keep their prior order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Submitted => self.rows.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at)),
            SortKey::AiScore => self
                .rows
                .sort_by(|a, b| b.total_ai_score.total_cmp(&a.total_ai_score)),
            SortKey::ManualScore => self
                .rows
                .sort_by(|a, b| b.total_score.total_cmp(&a.total_score)),
        }
    }

    fn matches_search(&self, submission: &Submission) -> bool {
        let Some(query) = self.search.as_deref() else {
            return true;
        };

        submission
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
            || submission
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(query))
    }

    fn is_visible(&self, submission: &Submission) -> bool {
        self.filter.matches(submission) && self.matches_search(submission)
    }

    /// Filtered rows in sort order, before pagination.
    pub fn visible(&self) -> Vec<&Submission> {
        self.rows.iter().filter(|s| self.is_visible(s)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.rows.iter().filter(|s| self.is_visible(s)).count()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Always at least 1, even for an empty view.
    pub fn last_page(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves to `page`, clamped into `[1, last_page]`. Returns the page reached.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.last_page());
        self.current_page
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.last_page() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn page_rows(&self) -> Vec<&Submission> {
        let start = (self.current_page - 1) * self.page_size;
        self.visible()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    /// Marks the first `count` visible rows as Shortlisted and leaves the rest alone.
    pub fn select_top(&mut self, count: usize) -> Result<SelectTopOutcome, TableError> {
        if count == 0 {
            return Err(TableError::InvalidCount(count.to_string()));
        }

        let top: Vec<Uuid> = self
            .visible()
            .into_iter()
            .take(count)
            .map(|s| s.submission_id)
            .collect();

        let mut outcome = SelectTopOutcome::default();
        for row in self.rows.iter_mut().filter(|r| top.contains(&r.submission_id)) {
            match row.status.transition_to(SubmissionStatus::Shortlisted) {
                Ok(next) if next != row.status => {
                    row.status = next;
                    outcome.changed.push(StatusUpdate {
                        submission_id: row.submission_id,
                        status: next,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping submission {}: {}", row.submission_id, e);
                    outcome.skipped.push(row.submission_id);
                }
            }
        }

        Ok(outcome)
    }

    /// Returns whether the row is selected afterwards.
    pub fn toggle_row(&mut self, submission_id: Uuid) -> bool {
        if self.selection.remove(&submission_id) {
            false
        } else {
            self.selection.insert(submission_id);
            true
        }
    }

    /// Selects the given IDs, ignoring ones not in the table.
    pub fn select_rows(&mut self, ids: &[Uuid]) {
        for id in ids {
            if self.rows.iter().any(|r| r.submission_id == *id) {
                self.selection.insert(*id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected IDs in sort order, regardless of the status filter.
    pub fn selected_rows(&self) -> Vec<Uuid> {
        self.rows
            .iter()
            .filter(|r| self.selection.contains(&r.submission_id))
            .map(|r| r.submission_id)
            .collect()
    }

    pub fn shortlisted_ids(&self) -> Vec<Uuid> {
        self.rows
            .iter()
            .filter(|r| r.is_shortlisted())
            .map(|r| r.submission_id)
            .collect()
    }

    pub fn status_updates(&self) -> Vec<StatusUpdate> {
        self.rows
            .iter()
            .map(|r| StatusUpdate {
                submission_id: r.submission_id,
                status: r.status,
            })
            .collect()
    }

    pub fn stats(&self) -> SubmissionStats {
        let count = |status: SubmissionStatus| self.rows.iter().filter(|r| r.status == status).count();

        let average_ai_score = if self.rows.is_empty() {
            0.0
        } else {
            self.rows.iter().map(|r| r.total_ai_score).sum::<f64>() / self.rows.len() as f64
        };

        SubmissionStats {
            total: self.rows.len(),
            pending: count(SubmissionStatus::Pending),
            shortlisted: count(SubmissionStatus::Shortlisted),
            reviewed: count(SubmissionStatus::Reviewed),
            rejected: count(SubmissionStatus::Rejected),
            marked_reviewed: self.rows.iter().filter(|r| r.reviewed).count(),
            average_ai_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn submission(n: i64, ai: f64, manual: f64) -> Submission {
        Submission {
            submission_id: Uuid::from_u128(n as u128),
            hackathon_id: Uuid::nil(),
            student_id: Uuid::new_v4(),
            files: vec![],
            description: Some(format!("Submission {n}")),
            tags: vec!["AI".to_string()],
            ai_scores: vec![],
            total_ai_score: ai,
            total_score: manual,
            status: SubmissionStatus::Pending,
            reviewed: false,
            shortlist_rank: None,
            submitted_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
                + Duration::minutes(n),
        }
    }

    fn ids(rows: &[&Submission]) -> Vec<Uuid> {
        rows.iter().map(|r| r.submission_id).collect()
    }

    #[test]
    fn test_sort_by_ai_score_descending() {
        let mut table = SubmissionTable::new(vec![submission(2, 40.0, 0.0), submission(1, 90.0, 0.0)]);
        table.sort_by(SortKey::AiScore);
        assert_eq!(
            ids(&table.visible()),
            vec![Uuid::from_u128(1), Uuid::from_u128(2)]
        );
    }

    #[test]
    fn test_default_sort_is_submission_time() {
        let table = SubmissionTable::new(vec![submission(3, 0.0, 0.0), submission(1, 0.0, 0.0)]);
        assert_eq!(
            ids(&table.visible()),
            vec![Uuid::from_u128(1), Uuid::from_u128(3)]
        );
    }

    #[test]
    fn test_select_top_one_marks_only_top_manual_score() {
        let mut table = SubmissionTable::new(vec![
            submission(1, 0.0, 10.0),
            submission(2, 0.0, 80.0),
            submission(3, 0.0, 50.0),
        ]);
        table.sort_by(SortKey::ManualScore);

        let outcome = table.select_top(1).unwrap();

        assert_eq!(outcome.changed.len(), 1);
        assert_eq!(outcome.changed[0].submission_id, Uuid::from_u128(2));
        assert_eq!(table.shortlisted_ids(), vec![Uuid::from_u128(2)]);
        let pending = table
            .rows()
            .iter()
            .filter(|r| r.status == SubmissionStatus::Pending)
            .count();
        assert_eq!(pending, 2);
    }

    #[test]
    fn test_select_top_skips_rejected_rows() {
        let mut rows = vec![submission(1, 90.0, 0.0), submission(2, 80.0, 0.0)];
        rows[0].status = SubmissionStatus::Rejected;
        let mut table = SubmissionTable::new(rows);
        table.sort_by(SortKey::AiScore);

        let outcome = table.select_top(2).unwrap();
        assert_eq!(outcome.skipped, vec![Uuid::from_u128(1)]);
        assert_eq!(table.shortlisted_ids(), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn test_select_top_rejects_zero() {
        let mut table = SubmissionTable::new(vec![submission(1, 0.0, 0.0)]);
        assert!(table.select_top(0).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 4 "), Ok(4));
        assert!(parse_count("0").is_err());
        assert!(parse_count("-3").is_err());
        assert!(parse_count("three").is_err());
        assert!(parse_count("2.5").is_err());
    }

    #[test]
    fn test_shortlisted_filter_is_idempotent() {
        let mut rows: Vec<Submission> = (1..=6).map(|n| submission(n, 0.0, 0.0)).collect();
        rows[1].status = SubmissionStatus::Shortlisted;
        rows[4].status = SubmissionStatus::Shortlisted;
        let mut table = SubmissionTable::new(rows);

        table.set_shortlisted_only(true);
        let once = ids(&table.visible());
        table.set_shortlisted_only(true);
        let twice = ids(&table.visible());

        assert_eq!(once, twice);
        assert_eq!(once, vec![Uuid::from_u128(2), Uuid::from_u128(5)]);
    }

    #[test]
    fn test_pagination_stays_in_bounds() {
        let rows: Vec<Submission> = (1..=120).map(|n| submission(n, 0.0, 0.0)).collect();
        let mut table = SubmissionTable::new(rows);

        assert_eq!(table.last_page(), 3);
        assert!(!table.prev_page());
        assert_eq!(table.current_page(), 1);

        while table.next_page() {}
        assert_eq!(table.current_page(), 3);
        assert_eq!(table.page_rows().len(), 20);
        assert!(!table.next_page());

        assert_eq!(table.go_to_page(99), 3);
        assert_eq!(table.go_to_page(0), 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut rows: Vec<Submission> = (1..=60).map(|n| submission(n, 0.0, 0.0)).collect();
        rows[59].status = SubmissionStatus::Shortlisted;
        let mut table = SubmissionTable::new(rows).with_page_size(10).unwrap();
        table.go_to_page(4);

        table.set_shortlisted_only(true);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.last_page(), 1);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let mut table = SubmissionTable::new(vec![]);
        assert_eq!(table.last_page(), 1);
        assert!(!table.next_page());
        assert!(table.page_rows().is_empty());
    }

    #[test]
    fn test_invalid_page_size() {
        assert_eq!(
            SubmissionTable::new(vec![]).with_page_size(0).unwrap_err(),
            TableError::InvalidPageSize(0)
        );
    }

    #[test]
    fn test_search_matches_description_and_tags() {
        let mut rows = vec![submission(1, 0.0, 0.0), submission(2, 0.0, 0.0)];
        rows[1].tags = vec!["Blockchain".to_string()];
        let mut table = SubmissionTable::new(rows);

        table.set_search(Some("block".to_string()));
        assert_eq!(ids(&table.visible()), vec![Uuid::from_u128(2)]);

        table.set_search(Some("submission 1".to_string()));
        assert_eq!(ids(&table.visible()), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn test_row_selection_ignores_filter() {
        let mut table = SubmissionTable::new(vec![submission(1, 0.0, 0.0), submission(2, 0.0, 0.0)]);
        assert!(table.toggle_row(Uuid::from_u128(2)));
        table.set_shortlisted_only(true);

        assert_eq!(table.selected_rows(), vec![Uuid::from_u128(2)]);
        assert!(!table.toggle_row(Uuid::from_u128(2)));
        assert!(table.selected_rows().is_empty());

        table.select_rows(&[Uuid::from_u128(1), Uuid::from_u128(42)]);
        assert_eq!(table.selected_rows(), vec![Uuid::from_u128(1)]);
        table.clear_selection();
        assert!(table.selected_rows().is_empty());
    }

    #[test]
    fn test_status_updates_cover_every_row() {
        let table = SubmissionTable::new((1..=3).map(|n| submission(n, 0.0, 0.0)).collect());
        let updates = table.status_updates();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.status == SubmissionStatus::Pending));
    }

    #[test]
    fn test_stats() {
        let mut rows = vec![submission(1, 80.0, 0.0), submission(2, 40.0, 0.0)];
        rows[0].status = SubmissionStatus::Shortlisted;
        rows[1].reviewed = true;
        let stats = SubmissionTable::new(rows).stats();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.shortlisted, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.marked_reviewed, 1);
        assert_eq!(stats.average_ai_score, 60.0);
    }
}
