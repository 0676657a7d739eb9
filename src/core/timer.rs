//! Timer module - logical-clock timer queue
//!
//! The engine never reads wall time; callers advance a logical clock in
//! millisecond steps and the queue reports which timers came due. Every
//! schedule hands out a fresh token, so a holder can tell a firing of the
//! timer it scheduled from a firing of a stale predecessor.

/// Opaque handle identifying one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// What a timer drives when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Gravity: the active piece falls one row.
    Fall,
    /// Lock delay: a grounded piece locks when this fires.
    LockDelay,
}

#[derive(Debug, Clone)]
struct Entry {
    token: TimerToken,
    kind: TimerKind,
    due: u64,
    period: Option<u64>,
}

/// Pending timers ordered by due time on a logical clock.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now: u64,
    next_token: u64,
    entries: Vec<Entry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    fn issue_token(&mut self) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Schedule a one-shot timer `delay_ms` from now.
    pub fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerToken {
        let token = self.issue_token();
        self.entries.push(Entry {
            token,
            kind,
            due: self.now + delay_ms,
            period: None,
        });
        token
    }

    /// Schedule a repeating timer. A zero period is clamped to 1ms so the
    /// queue always makes progress.
    pub fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u64) -> TimerToken {
        let period = period_ms.max(1);
        let token = self.issue_token();
        self.entries.push(Entry {
            token,
            kind,
            due: self.now + period,
            period: Some(period),
        });
        token
    }

    /// Remove a pending timer. Returns false when the token is not pending
    /// (already fired as a one-shot, or already cancelled).
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        before != self.entries.len()
    }

    /// Drop every pending timer without touching the clock.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Move the clock forward.
    pub fn advance(&mut self, delta_ms: u64) {
        self.now += delta_ms;
    }

    /// Pop the next due timer, earliest due first (ties break toward the
    /// earlier-scheduled token). One-shots are removed; repeating timers are
    /// pushed forward by their period, so a large clock step fires them once
    /// per elapsed period.
    pub fn pop_due(&mut self) -> Option<(TimerToken, TimerKind)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= self.now)
            .min_by_key(|(_, e)| (e.due, e.token.0))
            .map(|(i, _)| i)?;

        let (token, kind) = (self.entries[idx].token, self.entries[idx].kind);
        match self.entries[idx].period {
            Some(period) => self.entries[idx].due += period,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some((token, kind))
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.entries.len()
    }
}
