//! Quiz state machine and resolution records
//!
//! ```text
//! Idle --click(tip)------> [resolved] --> Idle
//! Idle --click(question)-> AwaitingAnswer --answer--> [resolved] --> Idle
//!                          AwaitingAnswer --cancel--> Idle
//! ```
//!
//! `Revealed` and `Resolved` are transient: they exist only inside a single
//! engine call, so the stored state is either [`QuizState::Idle`] or
//! [`QuizState::AwaitingAnswer`].

use crate::achievements::AchievementId;
use crate::catalog::ContentItem;
use crate::difficulty::DifficultyChange;
use crate::error::EngineError;
use crate::types::{
    BlockId, ContentId, DifficultyTier, GamePhase, Outcome, StabilityBand,
};

/// Stored interaction state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizState {
    #[default]
    Idle,
    AwaitingAnswer {
        block_id: BlockId,
        started_at_ms: u64,
    },
}

impl QuizState {
    pub fn pending_block(&self) -> Option<BlockId> {
        match self {
            QuizState::AwaitingAnswer { block_id, .. } => Some(*block_id),
            QuizState::Idle => None,
        }
    }

    pub fn ensure_idle(&self) -> Result<(), EngineError> {
        match self {
            QuizState::Idle => Ok(()),
            QuizState::AwaitingAnswer { .. } => Err(EngineError::InvalidTransition(
                "a question is awaiting an answer",
            )),
        }
    }

    /// Answer-start instant of the pending question for `block_id`
    pub fn started_at(&self, block_id: BlockId) -> Result<u64, EngineError> {
        match *self {
            QuizState::AwaitingAnswer {
                block_id: pending,
                started_at_ms,
            } if pending == block_id => Ok(started_at_ms),
            QuizState::AwaitingAnswer { .. } => Err(EngineError::InvalidTransition(
                "answer does not match the pending question",
            )),
            QuizState::Idle => Err(EngineError::InvalidTransition(
                "no question is awaiting an answer",
            )),
        }
    }
}

/// Append-only history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRecord {
    pub block_id: BlockId,
    pub content_id: ContentId,
    pub layer: u8,
    pub tier: DifficultyTier,
    pub category: String,
    pub outcome: Outcome,
    pub selected_index: Option<usize>,
    pub stability_before: u8,
    pub stability_after: u8,
    pub points_awarded: u32,
    /// Time from answer start to answer, questions only
    pub response_ms: Option<u64>,
    pub resolved_at_ms: u64,
}

impl ResolutionRecord {
    pub fn stability_delta(&self) -> i32 {
        self.stability_after as i32 - self.stability_before as i32
    }
}

/// Achievement unlocked by a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub points: u32,
}

/// Result of a resolved block
///
/// `points_awarded` is the resolution award alone; points from achievements
/// unlocked by the same resolution are reported in `achievement_points` and
/// already included in `score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub block_id: BlockId,
    pub content_id: ContentId,
    pub category: String,
    pub difficulty: DifficultyTier,
    pub layer: u8,
    pub outcome: Outcome,
    pub correct: bool,
    pub explanation: Option<String>,
    pub stability_delta: i32,
    pub stability: u8,
    pub stability_band: StabilityBand,
    pub points_awarded: u32,
    pub achievement_points: u32,
    pub score: u32,
    pub unlocked: Vec<UnlockedAchievement>,
    pub difficulty_change: Option<DifficultyChange>,
    pub phase: GamePhase,
    pub response_ms: Option<u64>,
}

/// Quiz result returned to the UI after an answer
pub type QuizResult = Resolution;

/// What a block click revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reveal {
    /// Tips resolve on reveal
    Tip {
        content: ContentItem,
        resolution: Resolution,
    },
    /// The question now awaits an answer
    Question {
        block_id: BlockId,
        content: ContentItem,
        started_at_ms: u64,
    },
}

impl Reveal {
    pub fn content(&self) -> &ContentItem {
        match self {
            Reveal::Tip { content, .. } | Reveal::Question { content, .. } => content,
        }
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Reveal::Tip { resolution, .. } => Some(resolution),
            Reveal::Question { .. } => None,
        }
    }

    pub fn awaits_answer(&self) -> bool {
        matches!(self, Reveal::Question { .. })
    }
}
