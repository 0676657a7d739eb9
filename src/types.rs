//! Core types shared across the engine
//! This module contains pure data types and tuning constants with no external dependencies

/// Playing-field dimensions: 20 visible rows plus 2 hidden spawn rows above the top.
pub const COLS: usize = 10;
pub const VISIBLE_ROWS: usize = 20;
pub const HIDDEN_ROWS: usize = 2;
pub const ROWS: usize = VISIBLE_ROWS + HIDDEN_ROWS;

/// Grace period after a piece can no longer fall (milliseconds).
pub const LOCK_DELAY_MS: u64 = 500;

/// Conventional pause callers insert between a lock and `trigger_next_drop`,
/// so lock feedback has time to render. The engine itself never sleeps.
pub const SPAWN_PAUSE_MS: u64 = 150;

/// Level a fresh game starts at.
pub const START_LEVEL: u32 = 1;
/// Regret (undo) credits granted at the start of a game.
pub const START_REGRETS: u32 = 5;
/// Upper bound on the rewind history.
pub const MAX_SNAPSHOTS: usize = 10;
/// Number of upcoming pieces shown to the player.
pub const PREVIEW_COUNT: usize = 3;
/// Number of entries kept on the leaderboard.
pub const RANK_SIZE: usize = 10;

/// The seven piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    J,
    Z,
    L,
    I,
    O,
    T,
    S,
}

impl PieceKind {
    /// Every kind, in bag-refill order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::J,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
    ];

    /// Style tag written into field cells when a piece of this kind locks.
    pub fn style(&self) -> &'static str {
        match self {
            PieceKind::J => "blue",
            PieceKind::Z => "red",
            PieceKind::L => "orange",
            PieceKind::I => "cyan",
            PieceKind::O => "yellow",
            PieceKind::T => "purple",
            PieceKind::S => "green",
        }
    }
}

/// A field cell: empty, or holding the identity of the piece that locked there.
pub type Cell = Option<PieceKind>;

/// Input actions dispatched into the engine's control entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Down,
    Clockwise,
    CounterClockwise,
    HardDrop,
    Hold,
    Regret,
}

impl Action {
    /// Parse an action from its wire name. Unknown names map to `None`,
    /// which callers treat as a no-op.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "down" => Some(Action::Down),
            "clockwise" => Some(Action::Clockwise),
            "counter_clockwise" => Some(Action::CounterClockwise),
            "hard_drop" => Some(Action::HardDrop),
            "hold" => Some(Action::Hold),
            "regret" => Some(Action::Regret),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Clockwise => "clockwise",
            Action::CounterClockwise => "counter_clockwise",
            Action::HardDrop => "hard_drop",
            Action::Hold => "hold",
            Action::Regret => "regret",
        }
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self, Action::Clockwise | Action::CounterClockwise)
    }
}

/// Descriptor of what a control dispatch did to the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The piece moved, rotated, or an operation was accepted.
    Normal,
    /// The operation was rejected; nothing changed.
    Stuck,
    /// A T-piece rotation landed in a tightly-surrounded position.
    TSpin,
}

/// How a downward move should be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Gravity fall; no points.
    None,
    /// Player-initiated soft drop: 1 point per cell.
    Soft,
    /// Hard drop: 2 points per cell.
    Hard,
}
