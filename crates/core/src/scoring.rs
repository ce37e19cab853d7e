//! Scoring module - points and phase progression
//!
//! | Resolution | Points |
//! |------------|--------|
//! | Tip read | [`TIP_POINTS`] |
//! | Correct answer | [`CORRECT_POINTS`](crate::types::CORRECT_POINTS) by tier (10 / 20 / 30) |
//! | Incorrect answer | 0 |
//!
//! Achievement points are added on top by the achievement evaluator.

use crate::stability::{div_round_half_up, Stability};
use crate::types::{DifficultyTier, GamePhase, Outcome, TIP_POINTS};

/// Points awarded for resolving a block
pub fn resolution_points(outcome: Outcome, tier: DifficultyTier) -> u32 {
    match outcome {
        Outcome::TipRead => TIP_POINTS,
        Outcome::Correct => tier.correct_points(),
        Outcome::Incorrect => 0,
    }
}

/// Accuracy in whole percent, rounded half up. `None` before any answer.
pub fn accuracy_percent(correct: u32, answered: u32) -> Option<u32> {
    if answered == 0 {
        return None;
    }
    Some(div_round_half_up(correct * 100, answered))
}

/// Score, concepts shown and the overall phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTracker {
    score: u32,
    content_shown: u32,
    content_available: u32,
    phase: GamePhase,
}

impl ProgressTracker {
    pub fn new(content_available: u32) -> Self {
        Self {
            score: 0,
            content_shown: 0,
            content_available,
            phase: GamePhase::Playing,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn content_shown(&self) -> u32 {
        self.content_shown
    }

    pub fn content_available(&self) -> u32 {
        self.content_available
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn record_shown(&mut self) {
        self.content_shown = (self.content_shown + 1).min(self.content_available);
    }

    /// Move to a terminal phase if the tower fell or all content was shown.
    ///
    /// Collapse wins over completion: clearing the last block with a wrong
    /// answer that zeroes stability still collapses the tower.
    pub fn update_phase(&mut self, stability: Stability) -> Option<GamePhase> {
        if self.phase.is_terminal() {
            return None;
        }
        let next = if stability.is_collapsed() {
            GamePhase::Collapsed
        } else if self.content_shown >= self.content_available {
            GamePhase::Completed
        } else {
            return None;
        };
        self.phase = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CORRECT_POINTS;

    #[test]
    fn test_resolution_points() {
        assert_eq!(resolution_points(Outcome::TipRead, DifficultyTier::Hard), TIP_POINTS);
        assert_eq!(resolution_points(Outcome::Correct, DifficultyTier::Easy), CORRECT_POINTS[0]);
        assert_eq!(resolution_points(Outcome::Correct, DifficultyTier::Medium), CORRECT_POINTS[1]);
        assert_eq!(resolution_points(Outcome::Correct, DifficultyTier::Hard), CORRECT_POINTS[2]);
        assert_eq!(resolution_points(Outcome::Incorrect, DifficultyTier::Hard), 0);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(0, 0), None);
        assert_eq!(accuracy_percent(2, 3), Some(67));
        assert_eq!(accuracy_percent(1, 8), Some(13));
        assert_eq!(accuracy_percent(5, 5), Some(100));
    }

    #[test]
    fn test_progress_completes_when_all_shown() {
        let mut p = ProgressTracker::new(2);
        p.record_shown();
        assert_eq!(p.update_phase(Stability::new()), None);
        p.record_shown();
        assert_eq!(p.update_phase(Stability::new()), Some(GamePhase::Completed));
        assert_eq!(p.phase(), GamePhase::Completed);

        // Terminal phases never change again.
        assert_eq!(p.update_phase(Stability::new().after(-100)), None);
        assert_eq!(p.phase(), GamePhase::Completed);
    }

    #[test]
    fn test_collapse_wins_over_completion() {
        let mut p = ProgressTracker::new(1);
        p.record_shown();
        assert_eq!(
            p.update_phase(Stability::new().after(-100)),
            Some(GamePhase::Collapsed)
        );
    }

    #[test]
    fn test_shown_never_exceeds_available() {
        let mut p = ProgressTracker::new(1);
        p.record_shown();
        p.record_shown();
        assert_eq!(p.content_shown(), 1);
    }

    #[test]
    fn test_award_saturates() {
        let mut p = ProgressTracker::new(1);
        p.award(u32::MAX);
        p.award(10);
        assert_eq!(p.score(), u32::MAX);
    }
}
