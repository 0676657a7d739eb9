//! Rank module - the high-score table value type
//!
//! The engine itself persists nothing; a storage collaborator keeps this
//! table and feeds it finished games. Only the ten best entries survive,
//! sorted by score and then by recency.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::types::RANK_SIZE;

/// One completed game on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub score: u32,
    /// Game duration in milliseconds.
    pub use_time_ms: u64,
    pub clear_line: u32,
    /// Completion time as unix seconds.
    pub played_at: u64,
}

/// The ten highest-scoring completed games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRank {
    entries: Vec<RankEntry>,
}

impl ScoreRank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a finished game, keeping the table sorted by score descending
    /// (more recent first among equal scores) and capped at ten entries.
    pub fn add(&mut self, entry: RankEntry) {
        self.entries.push(entry);
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(b.played_at.cmp(&a.played_at)));
        self.entries.truncate(RANK_SIZE);
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    /// Lowest score still on the table, or 0 when it has room.
    pub fn cutoff(&self) -> u32 {
        if self.entries.len() < RANK_SIZE {
            0
        } else {
            self.entries.last().map(|e| e.score).unwrap_or(0)
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.entries).context("serialize score rank")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut entries: Vec<RankEntry> =
            serde_json::from_str(json).context("parse score rank")?;
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.played_at.cmp(&a.played_at)));
        entries.truncate(RANK_SIZE);
        Ok(Self { entries })
    }
}
