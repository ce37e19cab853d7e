//! End-of-game statistics aggregated from the resolution history

use std::collections::BTreeMap;

use crate::achievements::ACHIEVEMENTS;
use crate::quiz::ResolutionRecord;
use crate::scoring::accuracy_percent;
use crate::types::{DifficultyTier, GamePhase, Outcome};

/// Counters for one slice of the history (a tier or a category)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub shown: u32,
    pub tips: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl Breakdown {
    fn record(&mut self, outcome: Outcome) {
        self.shown += 1;
        match outcome {
            Outcome::TipRead => self.tips += 1,
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
        }
    }

    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    pub fn accuracy_percent(&self) -> Option<u32> {
        accuracy_percent(self.correct, self.answered())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatistics {
    pub phase: GamePhase,
    pub score: u32,
    pub blocks_total: u32,
    pub blocks_removed: u32,
    pub tips_read: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub accuracy_percent: Option<u32>,
    /// Indexed by [`DifficultyTier::index`]
    pub by_tier: [Breakdown; 3],
    pub by_category: BTreeMap<String, Breakdown>,
    pub best_streak: u32,
    pub stability: u8,
    pub stability_lost: u32,
    pub average_response_ms: Option<u64>,
    pub fastest_response_ms: Option<u64>,
    pub achievements_unlocked: u32,
    pub achievements_total: u32,
    pub achievement_points: u32,
    pub elapsed_ms: u64,
}

/// Session-level values the history does not carry
#[derive(Debug, Clone, Copy)]
pub struct SessionTotals {
    pub phase: GamePhase,
    pub score: u32,
    pub blocks_total: u32,
    pub best_streak: u32,
    pub stability: u8,
    pub achievements_unlocked: u32,
    pub achievement_points: u32,
    pub started_at_ms: u64,
}

impl GameStatistics {
    pub fn collect(history: &[ResolutionRecord], totals: SessionTotals, now_ms: u64) -> Self {
        let mut by_tier = [Breakdown::default(); 3];
        let mut by_category: BTreeMap<String, Breakdown> = BTreeMap::new();
        let mut overall = Breakdown::default();
        let mut stability_lost = 0u32;
        let mut response_sum = 0u64;
        let mut response_count = 0u64;
        let mut fastest: Option<u64> = None;

        for record in history {
            overall.record(record.outcome);
            by_tier[record.tier.index()].record(record.outcome);
            by_category
                .entry(record.category.clone())
                .or_default()
                .record(record.outcome);
            stability_lost += record.stability_delta().unsigned_abs();

            if let Some(ms) = record.response_ms {
                response_sum += ms;
                response_count += 1;
                fastest = Some(fastest.map_or(ms, |f| f.min(ms)));
            }
        }

        Self {
            phase: totals.phase,
            score: totals.score,
            blocks_total: totals.blocks_total,
            blocks_removed: history.len() as u32,
            tips_read: overall.tips,
            questions_answered: overall.answered(),
            correct_answers: overall.correct,
            incorrect_answers: overall.incorrect,
            accuracy_percent: overall.accuracy_percent(),
            by_tier,
            by_category,
            best_streak: totals.best_streak,
            stability: totals.stability,
            stability_lost,
            average_response_ms: (response_count > 0).then(|| response_sum / response_count),
            fastest_response_ms: fastest,
            achievements_unlocked: totals.achievements_unlocked,
            achievements_total: ACHIEVEMENTS.len() as u32,
            achievement_points: totals.achievement_points,
            elapsed_ms: now_ms.saturating_sub(totals.started_at_ms),
        }
    }

    pub fn tier(&self, tier: DifficultyTier) -> &Breakdown {
        &self.by_tier[tier.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        tier: DifficultyTier,
        category: &str,
        outcome: Outcome,
        delta: u8,
        response_ms: Option<u64>,
    ) -> ResolutionRecord {
        ResolutionRecord {
            block_id: 0,
            content_id: 0,
            layer: 1,
            tier,
            category: category.to_string(),
            outcome,
            selected_index: None,
            stability_before: 100,
            stability_after: 100 - delta,
            points_awarded: 0,
            response_ms,
            resolved_at_ms: 0,
        }
    }

    fn totals() -> SessionTotals {
        SessionTotals {
            phase: GamePhase::Playing,
            score: 40,
            blocks_total: 54,
            best_streak: 1,
            stability: 75,
            achievements_unlocked: 2,
            achievement_points: 20,
            started_at_ms: 1_000,
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = GameStatistics::collect(&[], totals(), 1_000);
        assert_eq!(stats.blocks_removed, 0);
        assert_eq!(stats.accuracy_percent, None);
        assert_eq!(stats.average_response_ms, None);
        assert_eq!(stats.elapsed_ms, 0);
        assert_eq!(stats.achievements_total, 13);
    }

    #[test]
    fn test_aggregates_history() {
        let history = vec![
            record(DifficultyTier::Easy, "data", Outcome::TipRead, 0, None),
            record(DifficultyTier::Hard, "security", Outcome::Correct, 0, Some(2_000)),
            record(DifficultyTier::Hard, "security", Outcome::Incorrect, 25, Some(6_000)),
        ];
        let stats = GameStatistics::collect(&history, totals(), 61_000);

        assert_eq!(stats.blocks_removed, 3);
        assert_eq!(stats.tips_read, 1);
        assert_eq!(stats.questions_answered, 2);
        assert_eq!(stats.correct_answers, 1);
        assert_eq!(stats.incorrect_answers, 1);
        assert_eq!(stats.accuracy_percent, Some(50));
        assert_eq!(stats.stability_lost, 25);
        assert_eq!(stats.average_response_ms, Some(4_000));
        assert_eq!(stats.fastest_response_ms, Some(2_000));
        assert_eq!(stats.elapsed_ms, 60_000);

        assert_eq!(stats.tier(DifficultyTier::Hard).answered(), 2);
        assert_eq!(stats.tier(DifficultyTier::Easy).tips, 1);
        assert_eq!(stats.tier(DifficultyTier::Medium).shown, 0);

        let security = &stats.by_category["security"];
        assert_eq!(security.shown, 2);
        assert_eq!(security.accuracy_percent(), Some(50));
        assert_eq!(stats.by_category.len(), 2);
    }
}
