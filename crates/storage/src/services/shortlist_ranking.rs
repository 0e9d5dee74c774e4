//! Manual ranking of a hackathon's finalized shortlist.

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Submission;

/// Stored rank meaning "not ranked yet".
pub const UNRANKED: i32 = 999;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("Index {index} is out of range for a shortlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Order must list every shortlisted submission exactly once")]
    OrderMismatch,

    #[error("Ranks must be exactly 1..={0} without gaps or duplicates")]
    NonContiguousRanks(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShortlistEntry {
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub description: Option<String>,
    pub ai_score: f64,
    pub manual_score: f64,
    /// `ai_score + manual_score`
    pub score: f64,
    pub rank: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankAssignment {
    pub submission_id: Uuid,
    pub rank: i32,
}

/// Persistence for shortlist order and hand-off.
#[async_trait]
pub trait ShortlistStore: Send + Sync {
    async fn save_order(&self, hackathon_id: Uuid, order: &[RankAssignment]) -> Result<()>;

    /// Records that the shortlist was sent, returning the send time.
    async fn send_to_admin(&self, hackathon_id: Uuid) -> Result<NaiveDateTime>;
}

#[derive(Debug, Clone)]
pub struct ShortlistRanker {
    hackathon_id: Uuid,
    entries: Vec<ShortlistEntry>,
    order_changed: bool,
}

impl ShortlistRanker {
    /// Builds the initial ranking.
    ///
    /// Submissions with a stored rank come first, in rank order. Unranked ones
    /// (no rank, or [`UNRANKED`]) follow by descending combined score. Ranks
    /// are then renumbered from 1.
    pub fn new(hackathon_id: Uuid, submissions: Vec<Submission>) -> Self {
        let mut ranked: Vec<(ShortlistEntry, Option<i32>)> = submissions
            .into_iter()
            .map(|s| {
                let stored = s.shortlist_rank.filter(|r| *r > 0 && *r != UNRANKED);
                let entry = ShortlistEntry {
                    submission_id: s.submission_id,
                    student_id: s.student_id,
                    score: s.combined_score(),
                    description: s.description,
                    ai_score: s.total_ai_score,
                    manual_score: s.total_score,
                    rank: 0,
                };
                (entry, stored)
            })
            .collect();

        ranked.sort_by(|(a, ra), (b, rb)| match (ra, rb) {
            (Some(ra), Some(rb)) => ra.cmp(rb).then_with(|| b.score.total_cmp(&a.score)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.score.total_cmp(&a.score),
        });

        let mut ranker = Self {
            hackathon_id,
            entries: ranked.into_iter().map(|(entry, _)| entry).collect(),
            order_changed: false,
        };
        ranker.renumber();
        ranker
    }

    pub fn hackathon_id(&self) -> Uuid {
        self.hackathon_id
    }

    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ShortlistEntry> {
        self.entries
    }

    pub fn order_changed(&self) -> bool {
        self.order_changed
    }

    pub fn order(&self) -> Vec<RankAssignment> {
        self.entries
            .iter()
            .map(|e| RankAssignment {
                submission_id: e.submission_id,
                rank: e.rank,
            })
            .collect()
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.rank = i as i32 + 1;
        }
    }

    /// Moves the entry at `from` to `to`, shifting the ones in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> std::result::Result<(), RankingError> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(RankingError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.renumber();
        self.order_changed = true;
        Ok(())
    }

    /// Replaces the order with a complete client supplied ranking.
    pub fn apply_order(&mut self, order: &[RankAssignment]) -> std::result::Result<(), RankingError> {
        let len = self.entries.len();
        if order.len() != len {
            return Err(RankingError::OrderMismatch);
        }

        let known: HashSet<Uuid> = self.entries.iter().map(|e| e.submission_id).collect();
        let given: HashSet<Uuid> = order.iter().map(|a| a.submission_id).collect();
        if known != given {
            return Err(RankingError::OrderMismatch);
        }

        let mut ranks: Vec<i32> = order.iter().map(|a| a.rank).collect();
        ranks.sort_unstable();
        if !ranks.iter().zip(1..).all(|(rank, expected)| *rank == expected) {
            return Err(RankingError::NonContiguousRanks(len));
        }

        let before = self.order();
        self.entries.sort_by_key(|e| {
            order
                .iter()
                .find(|a| a.submission_id == e.submission_id)
                .map(|a| a.rank)
                .unwrap_or(i32::MAX)
        });
        self.renumber();

        if self.order() != before {
            self.order_changed = true;
        }
        Ok(())
    }

    pub async fn save_order<S>(&mut self, store: &S) -> Result<()>
    where
        S: ShortlistStore + ?Sized,
    {
        store.save_order(self.hackathon_id, &self.order()).await?;
        self.order_changed = false;
        Ok(())
    }

    /// Saves a pending order change first, then sends. The local order is kept
    /// as is when either step fails.
    pub async fn send_to_admin<S>(&mut self, store: &S) -> Result<NaiveDateTime>
    where
        S: ShortlistStore + ?Sized,
    {
        if self.order_changed {
            self.save_order(store).await?;
        }
        store.send_to_admin(self.hackathon_id).await
    }
}
