use arrayvec::ArrayVec;

use crate::types::{BlockId, DifficultyTier, GamePhase, StabilityBand, DIFFICULTY_WINDOW};

/// Read-only view of the session for UIs and the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub episode_id: u32,
    pub seed: u64,
    pub phase: GamePhase,
    pub stability: u8,
    pub stability_band: StabilityBand,
    pub score: u32,
    pub content_shown: u32,
    pub content_available: u32,
    pub blocks_remaining: u32,
    pub current_difficulty: DifficultyTier,
    pub answer_streak: u32,
    pub best_streak: u32,
    /// Most recent last
    pub recent_outcomes: ArrayVec<bool, DIFFICULTY_WINDOW>,
    pub pending_block: Option<BlockId>,
    pub achievements_unlocked: u32,
    pub started_at_ms: u64,
}

impl GameSnapshot {
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Shown / available in whole percent
    pub fn progress_percent(&self) -> u32 {
        if self.content_available == 0 {
            return 0;
        }
        self.content_shown * 100 / self.content_available
    }
}
