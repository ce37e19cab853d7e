//! Engine error taxonomy.
//!
//! Every [`EngineError`] is recoverable: the session is left exactly as it was
//! before the rejected call. [`CatalogError`] is the only fatal class, raised
//! when no valid session can be built.

use thiserror::Error;

use crate::tower::BlockNotRemovable;
use crate::types::{BlockId, ContentId, DifficultyTier, GamePhase};

/// Recoverable rejection of an engine command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("block {0} does not exist")]
    UnknownBlock(BlockId),

    #[error("block {0} has already been removed")]
    AlreadyRemoved(BlockId),

    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    #[error("game is over ({})", .0.as_str())]
    GameOver(GamePhase),

    #[error("option {index} is out of range for a question with {options} options")]
    InvalidOption { index: usize, options: usize },
}

impl EngineError {
    /// Stable snake_case code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnknownBlock(_) => "unknown_block",
            EngineError::AlreadyRemoved(_) => "already_removed",
            EngineError::InvalidTransition(_) => "invalid_transition",
            EngineError::GameOver(_) => "game_over",
            EngineError::InvalidOption { .. } => "invalid_option",
        }
    }
}

impl From<BlockNotRemovable> for EngineError {
    fn from(value: BlockNotRemovable) -> Self {
        match value {
            BlockNotRemovable::Unknown(id) => EngineError::UnknownBlock(id),
            BlockNotRemovable::AlreadyRemoved(id) => EngineError::AlreadyRemoved(id),
        }
    }
}

/// Catalog corruption detected at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has {found} items, {required} required")]
    TooFewItems { found: usize, required: usize },

    #[error("catalog has no {} items", .0.as_str())]
    EmptyTier(DifficultyTier),

    #[error("catalog has {found} {} items, the layer band needs exactly {required}", .tier.as_str())]
    TierSizeMismatch {
        tier: DifficultyTier,
        found: usize,
        required: usize,
    },

    #[error("duplicate content id {0}")]
    DuplicateId(ContentId),

    #[error("question {id} is malformed: {reason}")]
    InvalidQuestion { id: ContentId, reason: &'static str },

    #[error("unknown difficulty {1:?} on content {0}")]
    UnknownDifficulty(ContentId, String),

    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
}
