//! Snapshot module - saved game states for the regret feature
//!
//! A snapshot freezes everything a rewind must restore: the locked field,
//! the active piece, the hold slot, the preview queue, the bag (so the
//! piece sequence replays identically) and the score rule. History keeps a
//! bounded stack of them, evicting the oldest when full.

use std::collections::VecDeque;

use crate::types::{PieceKind, MAX_SNAPSHOTS};

use super::field::Field;
use super::pieces::Placement;
use super::rng::PieceBag;
use super::scoring::ScoreRule;

/// One rewindable game state.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub field: Field,
    pub active: Option<(PieceKind, Placement)>,
    pub hold: Option<PieceKind>,
    pub hold_used: bool,
    pub next: Vec<PieceKind>,
    pub bag: PieceBag,
    pub rule: ScoreRule,
}

/// Bounded stack of snapshots, newest last.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: VecDeque<EngineSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot, evicting the oldest once the cap is reached.
    pub fn push(&mut self, snapshot: EngineSnapshot) {
        if self.snapshots.len() == MAX_SNAPSHOTS {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Take the newest snapshot off the stack.
    pub fn pop(&mut self) -> Option<EngineSnapshot> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
