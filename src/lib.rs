//! Rules engine for a falling-block puzzle game.
//!
//! Owns the playing field, piece movement and rotation legality (with kick
//! tables), line clearing, scoring and leveling, lock-delay timing on a
//! logical clock, and a bounded undo. Rendering, input decoding and
//! persistence live outside: hosts drive the engine through
//! [`core::Engine::control`] and [`core::Engine::advance`], read state
//! through getters, and react to the [`core::EngineHooks`] callbacks.

pub mod core;
pub mod rank;
pub mod types;

pub use crate::core::{Engine, EngineHooks, EngineState};
pub use crate::rank::{RankEntry, ScoreRank};
pub use crate::types::{Action, DropKind, MoveKind, PieceKind};
