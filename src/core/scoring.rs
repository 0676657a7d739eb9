//! Scoring module - score, combo, level and regret accounting
//!
//! Lock events feed the rule in two steps: a lock that clears nothing calls
//! `on_lock`, a lock that clears lines calls `on_clear_line`. The rule owns
//! all the derived figures (level, combo chain, regret credits) and the
//! gravity interval that falls out of the level.

use crate::types::{DropKind, START_REGRETS};

/// Base points per cleared line count, multiplied by level.
const CLEAR_BASE: [u32; 5] = [0, 100, 300, 500, 800];

/// Replaces the base table when the clearing lock was a T-spin.
const TSPIN_BASE: [u32; 5] = [0, 800, 1200, 1600, 800];

/// Added on top of the base when the clear empties the field.
const PERFECT_BONUS: [u32; 5] = [0, 800, 1000, 1800, 2000];

/// Points for a T-spin lock that clears nothing, multiplied by level.
const TSPIN_LOCK_BONUS: u32 = 400;

/// Extra points per combo step past the first, multiplied by level.
const COMBO_STEP: u32 = 50;

/// Lines needed within a level before the level rises.
const LINES_PER_LEVEL: u32 = 10;

/// Scoring state for one run of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRule {
    start_level: u32,
    score: u32,
    combo: u32,
    regret_count: u32,
    line_count: u32,
    level: u32,
    level_clear_count: u32,
}

impl ScoreRule {
    pub fn new(start_level: u32) -> Self {
        let mut rule = Self {
            start_level: start_level.max(1),
            score: 0,
            combo: 0,
            regret_count: 0,
            line_count: 0,
            level: 1,
            level_clear_count: 0,
        };
        rule.reset();
        rule
    }

    /// Return to the state of a fresh game.
    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.regret_count = START_REGRETS;
        self.line_count = 0;
        self.level = self.start_level;
        self.level_clear_count = 0;
    }

    /// Gravity interval for the current level, in milliseconds.
    ///
    /// Uses the guideline curve ((0.8 - (level-1) * 0.007) ^ (level-1))
    /// seconds, clamped so high levels never reach a zero interval.
    pub fn drop_speed_ms(&self) -> u64 {
        let level = self.level as f64;
        let per_row = (0.8 - (level - 1.0) * 0.007).powf(level - 1.0);
        ((per_row * 1000.0) as u64).max(1)
    }

    /// Award points for a drop: one per cell fallen for a soft drop, two
    /// per cell for a hard drop. Gravity falls award nothing.
    pub fn on_drop(&mut self, kind: DropKind, cells: u32) {
        let points = match kind {
            DropKind::None => 0,
            DropKind::Soft => cells,
            DropKind::Hard => 2 * cells,
        };
        self.score = self.score.saturating_add(points);
    }

    /// A lock that cleared no lines. Breaks the combo chain; a T-spin
    /// still earns its lock bonus.
    pub fn on_lock(&mut self, tspin: bool) {
        if tspin {
            self.score = self.score.saturating_add(TSPIN_LOCK_BONUS * self.level);
        }
        self.combo = 0;
    }

    /// A lock that cleared `clear_line` lines (1..=4).
    ///
    /// Extends the combo chain, awards clear points plus perfect and combo
    /// bonuses, grants a regret credit for a four-line clear, and raises the
    /// level once the per-level line count is exceeded (excess lines carry
    /// into the next level).
    pub fn on_clear_line(&mut self, clear_line: usize, perfect: bool, tspin: bool) {
        if clear_line == 0 || clear_line > 4 {
            return;
        }
        self.combo += 1;
        self.line_count += clear_line as u32;
        self.level_clear_count += clear_line as u32;

        let mut points = if tspin {
            TSPIN_BASE[clear_line]
        } else {
            CLEAR_BASE[clear_line]
        };
        if perfect {
            points += PERFECT_BONUS[clear_line];
        }
        points = points.saturating_mul(self.level);
        if self.combo > 1 {
            points = points.saturating_add(self.level * (self.combo - 1) * COMBO_STEP);
        }
        self.score = self.score.saturating_add(points);

        if clear_line == 4 {
            self.regret_count += 1;
        }
        if self.level_clear_count > LINES_PER_LEVEL {
            self.level += 1;
            self.level_clear_count -= LINES_PER_LEVEL;
        }
    }

    /// Spend one regret credit. Returns false when none are left.
    pub fn spend_regret(&mut self) -> bool {
        if self.regret_count > 0 {
            self.regret_count -= 1;
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    pub fn regret_count(&self) -> u32 {
        self.regret_count
    }

    #[cfg(test)]
    pub fn set_regret_count(&mut self, count: u32) {
        self.regret_count = count;
    }

    #[cfg(test)]
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self::new(crate::types::START_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(4, false, false);
        rule.on_drop(DropKind::Hard, 10);
        rule.reset();
        assert_eq!(rule.score(), 0);
        assert_eq!(rule.combo(), 0);
        assert_eq!(rule.line_count(), 0);
        assert_eq!(rule.level(), 1);
        assert_eq!(rule.regret_count(), START_REGRETS);
    }

    #[test]
    fn test_clear_scores_scale_with_level() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(1, false, false);
        assert_eq!(rule.score(), 100);

        let mut rule = ScoreRule::new(1);
        rule.set_level(3);
        rule.on_clear_line(2, false, false);
        assert_eq!(rule.score(), 300 * 3);
    }

    #[test]
    fn test_tspin_clear_uses_tspin_table() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(2, false, true);
        assert_eq!(rule.score(), 1200);
    }

    #[test]
    fn test_perfect_clear_bonus_added_to_base() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(2, true, false);
        assert_eq!(rule.score(), 300 + 1000);
    }

    #[test]
    fn test_combo_bonus_from_second_consecutive_clear() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(1, false, false);
        assert_eq!(rule.score(), 100);
        rule.on_clear_line(1, false, false);
        // 100 base + level * (combo - 1) * 50 with combo at 2.
        assert_eq!(rule.score(), 100 + 150);
        rule.on_clear_line(1, false, false);
        assert_eq!(rule.score(), 250 + 100 + 100);
    }

    #[test]
    fn test_lock_without_clear_breaks_combo() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(1, false, false);
        rule.on_lock(false);
        assert_eq!(rule.combo(), 0);
        rule.on_clear_line(1, false, false);
        // Chain restarted, no combo bonus.
        assert_eq!(rule.score(), 200);
    }

    #[test]
    fn test_tspin_lock_bonus_without_clear() {
        let mut rule = ScoreRule::new(1);
        rule.on_lock(true);
        assert_eq!(rule.score(), 400);

        let mut rule = ScoreRule::new(1);
        rule.set_level(2);
        rule.on_lock(true);
        assert_eq!(rule.score(), 800);
    }

    #[test]
    fn test_four_line_clear_grants_regret_credit() {
        let mut rule = ScoreRule::new(1);
        assert_eq!(rule.regret_count(), START_REGRETS);
        rule.on_clear_line(4, false, false);
        assert_eq!(rule.score(), 800);
        assert_eq!(rule.regret_count(), START_REGRETS + 1);
        rule.on_clear_line(3, false, false);
        assert_eq!(rule.regret_count(), START_REGRETS + 1);
    }

    #[test]
    fn test_level_up_carries_excess_lines() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(4, false, false);
        rule.on_clear_line(4, false, false);
        assert_eq!(rule.level(), 1);
        // 8 + 3 = 11 lines within the level: one level up, one line carried.
        rule.on_clear_line(3, false, false);
        assert_eq!(rule.level(), 2);
        assert_eq!(rule.line_count(), 11);
    }

    #[test]
    fn test_exactly_ten_lines_does_not_level_up() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(4, false, false);
        rule.on_clear_line(4, false, false);
        rule.on_clear_line(2, false, false);
        assert_eq!(rule.level(), 1);
    }

    #[test]
    fn test_drop_points() {
        let mut rule = ScoreRule::new(1);
        rule.on_drop(DropKind::Soft, 5);
        assert_eq!(rule.score(), 5);
        rule.on_drop(DropKind::Hard, 5);
        assert_eq!(rule.score(), 15);
        rule.on_drop(DropKind::None, 5);
        assert_eq!(rule.score(), 15);
    }

    #[test]
    fn test_spend_regret_bounded_at_zero() {
        let mut rule = ScoreRule::new(1);
        rule.set_regret_count(1);
        assert!(rule.spend_regret());
        assert!(!rule.spend_regret());
        assert_eq!(rule.regret_count(), 0);
    }

    #[test]
    fn test_drop_speed_curve() {
        let mut rule = ScoreRule::new(1);
        assert_eq!(rule.drop_speed_ms(), 1000);
        rule.set_level(2);
        assert!((792..=793).contains(&rule.drop_speed_ms()));

        // Strictly faster as the level rises, never hits zero.
        let mut previous = u64::MAX;
        for level in 1..=20 {
            rule.set_level(level);
            let speed = rule.drop_speed_ms();
            assert!(speed < previous || speed == 1);
            assert!(speed >= 1);
            previous = speed;
        }
        rule.set_level(40);
        assert_eq!(rule.drop_speed_ms(), 1);
    }

    #[test]
    fn test_zero_clear_is_ignored() {
        let mut rule = ScoreRule::new(1);
        rule.on_clear_line(0, true, true);
        assert_eq!(rule.score(), 0);
        assert_eq!(rule.combo(), 0);
    }
}
