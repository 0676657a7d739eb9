//! Core module - pure game rules with no external dependencies
//!
//! Everything in here is deterministic and I/O-free: the field, piece
//! geometry, the random bag, scoring, timers, snapshots and the engine
//! state machine that ties them together.

pub mod engine;
pub mod field;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timer;

// Re-export commonly used types
pub use engine::{ActivePiece, Engine, EngineHooks, EngineState};
pub use field::Field;
pub use pieces::Placement;
pub use rng::{PieceBag, SimpleRng};
pub use scoring::ScoreRule;
pub use snapshot::{EngineSnapshot, History};
pub use timer::{TimerKind, TimerToken, Timers};
