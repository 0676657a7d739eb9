//! Engine module - the game state machine
//!
//! Owns the field, the active piece, the hold slot, the preview queue, the
//! score rule, the snapshot history and both timers, and drives every
//! transition between them. Hosts feed it player actions through
//! [`Engine::control`] and pump time through [`Engine::advance`]; they read
//! state back through getters and the three [`EngineHooks`] callbacks.
//!
//! Two structural mutations are deliberately split out for the host's
//! pacing: a lock only records which rows became full, and the host commits
//! the removal with [`Engine::clear_lines`] and spawns the next piece with
//! [`Engine::trigger_next_drop`] once its own lock/clear effects have
//! played out.

use arrayvec::ArrayVec;

use crate::types::{Action, DropKind, MoveKind, PieceKind, LOCK_DELAY_MS, PREVIEW_COUNT, START_LEVEL};

use super::field::Field;
use super::pieces::{
    self, collides, hard_drop_target, rotate, spawn_placement, step, t_spin_corners, Placement,
};
use super::rng::PieceBag;
use super::scoring::ScoreRule;
use super::snapshot::{EngineSnapshot, History};
use super::timer::{TimerKind, TimerToken, Timers};

/// Output callbacks, supplied at construction. Every method has a no-op
/// default, and `()` implements the trait for hook-less embedding.
pub trait EngineHooks {
    /// A piece locked into the field at `cells`. `cleared` lists the rows
    /// the lock completed (empty when none).
    fn on_lock_block(&mut self, cells: &[(i8, i8)], cleared: &[usize], perfect: bool, tspin: bool) {
        let _ = (cells, cleared, perfect, tspin);
    }

    /// The game ended. Fired exactly once per game.
    fn on_game_over(&mut self) {}

    /// The active piece was hard-dropped to `cells` (it locks right after).
    fn on_hard_drop(&mut self, cells: &[(i8, i8)]) {
        let _ = cells;
    }
}

impl EngineHooks for () {}

/// Lifecycle of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Fresh engine, no game started yet.
    Begin,
    /// A piece is falling.
    Dropping,
    /// A piece just locked; waiting for the host to trigger the next drop.
    Locked,
    /// Terminal. Only `restart` leaves it.
    Over,
}

/// The currently falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub placement: Placement,
}

/// The rules engine.
pub struct Engine<H: EngineHooks = ()> {
    field: Field,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    hold_used: bool,
    next: Vec<PieceKind>,
    bag: PieceBag,
    rule: ScoreRule,
    history: History,
    timers: Timers,
    fall_timer: Option<TimerToken>,
    lock_timer: Option<TimerToken>,
    pending_clear: Option<ArrayVec<usize, 4>>,
    state: EngineState,
    begin_at: u64,
    end_at: Option<u64>,
    game_over_reported: bool,
    last_was_rotation: bool,
    hooks: H,
}

impl Engine<()> {
    pub fn new(seed: u32) -> Self {
        Self::with_hooks(seed, ())
    }
}

impl<H: EngineHooks> Engine<H> {
    pub fn with_hooks(seed: u32, hooks: H) -> Self {
        Self {
            field: Field::new(),
            active: None,
            hold: None,
            hold_used: false,
            next: Vec::with_capacity(PREVIEW_COUNT),
            bag: PieceBag::new(seed),
            rule: ScoreRule::new(START_LEVEL),
            history: History::new(),
            timers: Timers::new(),
            fall_timer: None,
            lock_timer: None,
            pending_clear: None,
            state: EngineState::Begin,
            begin_at: 0,
            end_at: None,
            game_over_reported: false,
            last_was_rotation: false,
            hooks,
        }
    }

    /// Reset everything and begin a new game: counters, field, history and
    /// hold slot cleared, a fresh bag dealt, three previews seeded and the
    /// first piece spawned with both timers running.
    pub fn restart(&mut self) {
        self.field.clear();
        self.rule.reset();
        self.history.clear();
        self.bag.reset();
        self.hold = None;
        self.hold_used = false;
        self.pending_clear = None;
        self.game_over_reported = false;
        self.last_was_rotation = false;
        self.timers.cancel_all();
        self.fall_timer = None;
        self.lock_timer = None;
        self.begin_at = self.timers.now_ms();
        self.end_at = None;
        self.state = EngineState::Dropping;

        let first = self.bag.draw();
        self.next.clear();
        for _ in 0..PREVIEW_COUNT {
            let kind = self.bag.draw();
            self.next.push(kind);
        }
        self.spawn(first);
    }

    /// Main input entry point. Invalid operations are defined no-ops
    /// reported as [`MoveKind::Stuck`]; nothing here ever fails.
    pub fn control(&mut self, action: Action) -> MoveKind {
        match self.state {
            EngineState::Begin => {
                // Any input on the start screen begins the game.
                self.restart();
                MoveKind::Normal
            }
            EngineState::Dropping => match action {
                Action::Left => self.shift(0, -1, DropKind::None),
                Action::Right => self.shift(0, 1, DropKind::None),
                Action::Down => self.shift(1, 0, DropKind::Soft),
                Action::Clockwise => self.turn(true),
                Action::CounterClockwise => self.turn(false),
                Action::HardDrop => self.hard_drop(),
                Action::Hold => self.hold_block(),
                Action::Regret => self.regret(),
            },
            EngineState::Locked | EngineState::Over => MoveKind::Stuck,
        }
    }

    /// Advance the logical clock and run every timer that comes due. Fall
    /// firings move the piece down like a non-player `down`; lock-delay
    /// firings lock only if the piece still cannot fall. Firings from
    /// superseded timers are ignored.
    pub fn advance(&mut self, delta_ms: u64) {
        self.timers.advance(delta_ms);
        while let Some((token, kind)) = self.timers.pop_due() {
            match kind {
                TimerKind::Fall => {
                    if self.fall_timer == Some(token) {
                        self.gravity_step();
                    }
                }
                TimerKind::LockDelay => {
                    if self.lock_timer == Some(token) {
                        self.lock_if_grounded();
                    }
                }
            }
        }
    }

    /// Commit a previously reported line clear: remove the full rows and
    /// refill the top. Idempotent; a no-op when no clear is pending.
    pub fn clear_lines(&mut self) {
        if let Some(rows) = self.pending_clear.take() {
            self.field.clear_rows(&rows);
        }
    }

    /// Spawn the next queued piece after a lock. Commits a still-pending
    /// clear first. The post-lock pause is the caller's: the engine stays in
    /// the locked gap until this is invoked.
    pub fn trigger_next_drop(&mut self) {
        if self.state != EngineState::Locked {
            return;
        }
        self.clear_lines();
        let kind = self.next.remove(0);
        self.next.push(self.bag.draw());
        self.spawn(kind);
    }

    fn shift(&mut self, dr: i8, dc: i8, drop_kind: DropKind) -> MoveKind {
        let Some(active) = self.active else {
            return MoveKind::Stuck;
        };
        match step(&self.field, active.kind, active.placement, dr, dc) {
            Some(moved) => {
                self.active = Some(ActivePiece { placement: moved, ..active });
                self.last_was_rotation = false;
                self.rule.on_drop(drop_kind, (moved.row - active.placement.row) as u32);
                self.restart_lock_timer();
                MoveKind::Normal
            }
            None => {
                self.rule.on_drop(drop_kind, 0);
                MoveKind::Stuck
            }
        }
    }

    fn turn(&mut self, clockwise: bool) -> MoveKind {
        let Some(active) = self.active else {
            return MoveKind::Stuck;
        };
        match rotate(&self.field, active.kind, active.placement, clockwise) {
            Some(turned) => {
                self.active = Some(ActivePiece { placement: turned, ..active });
                self.last_was_rotation = true;
                self.restart_lock_timer();
                if active.kind == PieceKind::T && t_spin_corners(&self.field, turned) >= 3 {
                    MoveKind::TSpin
                } else {
                    MoveKind::Normal
                }
            }
            None => MoveKind::Stuck,
        }
    }

    fn hard_drop(&mut self) -> MoveKind {
        let Some(active) = self.active else {
            return MoveKind::Stuck;
        };
        let target = hard_drop_target(&self.field, active.kind, active.placement);
        let drop_step = (target.row - active.placement.row) as u32;
        self.active = Some(ActivePiece { placement: target, ..active });
        if drop_step > 0 {
            self.last_was_rotation = false;
        }
        self.rule.on_drop(DropKind::Hard, drop_step);
        let cells = pieces::cells(active.kind, target);
        self.hooks.on_hard_drop(&cells);
        self.lock_block();
        MoveKind::Normal
    }

    /// Swap the active piece with the hold slot, or fill an empty slot from
    /// the queue. Allowed once per piece life.
    fn hold_block(&mut self) -> MoveKind {
        if self.hold_used {
            return MoveKind::Stuck;
        }
        let Some(active) = self.active.take() else {
            return MoveKind::Stuck;
        };
        let incoming = match self.hold.take() {
            Some(held) => held,
            None => {
                let kind = self.next.remove(0);
                self.next.push(self.bag.draw());
                kind
            }
        };
        self.hold = Some(active.kind);
        self.hold_used = true;
        self.last_was_rotation = false;

        // The replacement re-enters at spawn, under the usual spawn check.
        let placement = spawn_placement(incoming);
        if collides(&self.field, incoming, placement) {
            self.enter_over();
            return MoveKind::Stuck;
        }
        self.active = Some(ActivePiece { kind: incoming, placement });
        self.restart_lock_timer();
        MoveKind::Normal
    }

    /// Rewind to the most recent snapshot. Needs a regret credit and a
    /// non-empty history; the credit is spent from the restored counters so
    /// the pool actually shrinks.
    fn regret(&mut self) -> MoveKind {
        if self.rule.regret_count() == 0 || self.history.is_empty() {
            return MoveKind::Stuck;
        }
        let Some(snapshot) = self.history.pop() else {
            return MoveKind::Stuck;
        };
        let EngineSnapshot { field, active, hold, hold_used, next, bag, rule } = snapshot;
        self.field = field;
        self.active = active.map(|(kind, placement)| ActivePiece { kind, placement });
        self.hold = hold;
        self.hold_used = hold_used;
        self.next = next;
        self.bag = bag;
        self.rule = rule;
        self.rule.spend_regret();
        self.pending_clear = None;
        self.last_was_rotation = false;
        self.state = EngineState::Dropping;
        self.restart_fall_timer();
        self.restart_lock_timer();
        MoveKind::Normal
    }

    fn gravity_step(&mut self) {
        if self.state != EngineState::Dropping {
            return;
        }
        self.shift(1, 0, DropKind::None);
    }

    /// Lock-delay firing: lock only when the piece still cannot fall. A
    /// piece that regained room just gets a fresh delay.
    fn lock_if_grounded(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if step(&self.field, active.kind, active.placement, 1, 0).is_none() {
            self.lock_block();
        } else {
            self.restart_lock_timer();
        }
    }

    /// Write the active piece into the field, score the lock and report it.
    /// Full rows are held as a pending clear for the host to commit.
    fn lock_block(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.cancel_timers();

        let tspin = active.kind == PieceKind::T
            && self.last_was_rotation
            && t_spin_corners(&self.field, active.placement) >= 3;

        let cells = pieces::cells(active.kind, active.placement);
        self.field.write_cells(&cells, active.kind);

        let (full, perfect) = self.field.full_rows();
        if full.is_empty() {
            self.rule.on_lock(tspin);
        } else {
            self.rule.on_clear_line(full.len(), perfect, tspin);
            self.pending_clear = Some(full.clone());
        }
        self.state = EngineState::Locked;
        self.hooks.on_lock_block(&cells, &full, perfect, tspin);
    }

    /// Place a piece at spawn. A blocked spawn ends the game; a successful
    /// one pushes a snapshot and restarts both timers.
    fn spawn(&mut self, kind: PieceKind) {
        self.hold_used = false;
        self.last_was_rotation = false;
        let placement = spawn_placement(kind);
        if collides(&self.field, kind, placement) {
            self.enter_over();
            return;
        }
        self.active = Some(ActivePiece { kind, placement });
        self.state = EngineState::Dropping;
        self.push_snapshot();
        self.restart_fall_timer();
        self.restart_lock_timer();
    }

    fn push_snapshot(&mut self) {
        self.history.push(EngineSnapshot {
            field: self.field.clone(),
            active: self.active.map(|a| (a.kind, a.placement)),
            hold: self.hold,
            hold_used: self.hold_used,
            next: self.next.clone(),
            bag: self.bag.clone(),
            rule: self.rule.clone(),
        });
    }

    fn enter_over(&mut self) {
        self.active = None;
        self.cancel_timers();
        self.state = EngineState::Over;
        if self.end_at.is_none() {
            self.end_at = Some(self.timers.now_ms());
        }
        if !self.game_over_reported {
            self.game_over_reported = true;
            self.hooks.on_game_over();
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(token) = self.fall_timer.take() {
            self.timers.cancel(token);
        }
        if let Some(token) = self.lock_timer.take() {
            self.timers.cancel(token);
        }
    }

    fn restart_fall_timer(&mut self) {
        if let Some(token) = self.fall_timer.take() {
            self.timers.cancel(token);
        }
        let interval = self.rule.drop_speed_ms();
        self.fall_timer = Some(self.timers.schedule_repeating(TimerKind::Fall, interval));
    }

    fn restart_lock_timer(&mut self) {
        if let Some(token) = self.lock_timer.take() {
            self.timers.cancel(token);
        }
        self.lock_timer = Some(self.timers.schedule_once(TimerKind::LockDelay, LOCK_DELAY_MS));
    }

    // ---- read-only surface ----

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == EngineState::Over
    }

    /// Cells the active piece currently occupies.
    pub fn active_cells(&self) -> Option<[(i8, i8); 4]> {
        self.active.map(|a| pieces::cells(a.kind, a.placement))
    }

    /// Style tag of the active piece, for rendering.
    pub fn active_style(&self) -> Option<&'static str> {
        self.active.map(|a| a.kind.style())
    }

    /// Cells the active piece would land on if hard-dropped now.
    pub fn predicted_cells(&self) -> Option<[(i8, i8); 4]> {
        self.active.map(|a| {
            let target = hard_drop_target(&self.field, a.kind, a.placement);
            pieces::cells(a.kind, target)
        })
    }

    pub fn score(&self) -> u32 {
        self.rule.score()
    }

    pub fn level(&self) -> u32 {
        self.rule.level()
    }

    pub fn line_count(&self) -> u32 {
        self.rule.line_count()
    }

    pub fn regret_count(&self) -> u32 {
        self.rule.regret_count()
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.state == EngineState::Dropping && !self.hold_used
    }

    pub fn upcoming(&self) -> &[PieceKind] {
        &self.next
    }

    /// Rows waiting for `clear_lines`, if a clear was reported but not yet
    /// committed.
    pub fn pending_clear_rows(&self) -> Option<&[usize]> {
        self.pending_clear.as_deref()
    }

    /// Milliseconds of game time since `restart`, frozen once the game is
    /// over.
    pub fn elapsed_ms(&self) -> u64 {
        match (self.state, self.end_at) {
            (EngineState::Begin, _) => 0,
            (_, Some(end)) => end - self.begin_at,
            (_, None) => self.timers.now_ms() - self.begin_at,
        }
    }
}
