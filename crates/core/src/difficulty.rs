//! Adaptive difficulty controller
//!
//! Tracks the last [`DIFFICULTY_WINDOW`] question outcomes and moves the
//! reported difficulty one tier at a time:
//!
//! | Correct rate in window | Effect |
//! |------------------------|--------|
//! | >= 80% | escalate one tier (ceiling: hard) |
//! | <= 40% | de-escalate one tier (floor: easy) |
//! | otherwise | unchanged |
//!
//! Fewer than [`DIFFICULTY_MIN_SAMPLES`] outcomes never move the tier.
//!
//! The tier is reporting-only. Content is bound to blocks by layer band when
//! the tower is built and is never reassigned.

use arrayvec::ArrayVec;

use crate::types::{
    DifficultyTier, DEESCALATE_PERCENT, DIFFICULTY_MIN_SAMPLES, DIFFICULTY_WINDOW,
    ESCALATE_PERCENT,
};

/// Bounded rolling log of question outcomes (`true` = correct), most recent last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeWindow {
    outcomes: ArrayVec<bool, DIFFICULTY_WINDOW>,
}

impl OutcomeWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome, evicting the oldest when full
    pub fn push(&mut self, correct: bool) {
        if self.outcomes.is_full() {
            self.outcomes.remove(0);
        }
        self.outcomes.push(correct);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.outcomes
    }

    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|&&c| c).count()
    }

    /// Correct rate in whole percent (floored), `None` when empty
    pub fn correct_percent(&self) -> Option<u32> {
        if self.outcomes.is_empty() {
            return None;
        }
        Some(self.correct_count() as u32 * 100 / self.outcomes.len() as u32)
    }

    /// Consecutive misses immediately before the most recent outcome
    pub fn misses_before_last(&self) -> usize {
        self.outcomes
            .iter()
            .rev()
            .skip(1)
            .take_while(|&&c| !c)
            .count()
    }
}

/// A reported tier change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyChange {
    pub from: DifficultyTier,
    pub to: DifficultyTier,
}

/// Tier recommended for `current` given the recent outcomes
pub fn recommend(current: DifficultyTier, window: &OutcomeWindow) -> DifficultyTier {
    if window.len() < DIFFICULTY_MIN_SAMPLES {
        return current;
    }
    match window.correct_percent() {
        Some(p) if p >= ESCALATE_PERCENT => current.harder(),
        Some(p) if p <= DEESCALATE_PERCENT => current.easier(),
        _ => current,
    }
}

/// Holds the reported difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyController {
    current: DifficultyTier,
}

impl DifficultyController {
    pub fn new() -> Self {
        Self {
            current: DifficultyTier::Medium,
        }
    }

    pub fn current(&self) -> DifficultyTier {
        self.current
    }

    /// What [`record`](Self::record) would do, without changing anything
    pub fn preview(&self, window: &OutcomeWindow) -> Option<DifficultyChange> {
        let next = recommend(self.current, window);
        (next != self.current).then_some(DifficultyChange {
            from: self.current,
            to: next,
        })
    }

    /// Re-evaluate after a question outcome was pushed into `window`
    pub fn record(&mut self, window: &OutcomeWindow) -> Option<DifficultyChange> {
        let change = self.preview(window)?;
        self.current = change.to;
        Some(change)
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new()
    }
}
