//! Core quiz engine - pure, deterministic, and testable
//!
//! This crate contains all the game rules and session state for the tower
//! quiz. It has no dependencies on UI, networking, or a clock: callers pass
//! `now_ms` into every command, so the same seed and the same inputs always
//! produce the same game.
//!
//! # Module Structure
//!
//! - [`catalog`]: the 54 tips and questions, validated on load
//! - [`tower`]: 18 layers of 3 blocks with content bound by layer band
//! - [`stability`]: layer-weighted penalties and the 0..=100 integrity score
//! - [`difficulty`]: rolling outcome window and the reported tier
//! - [`quiz`]: reveal / answer / resolve state machine and result types
//! - [`achievements`]: closed rule table evaluated after every resolution
//! - [`scoring`]: points and phase transitions
//! - [`session`]: the [`GameSession`] aggregate and its command API
//! - [`snapshot`] / [`statistics`]: read-only views
//!
//! # Game Rules
//!
//! - **Layer bands**: layers 1-6 hold hard content, 7-12 medium, 13-18 easy
//! - **Tips**: removed on reveal, 5 points, no stability change
//! - **Questions**: 10 / 20 / 30 points by tier when correct; a wrong answer
//!   costs `round_half_up(25 * (19 - layer) / 18)` stability
//! - **End**: stability 0 collapses the tower; showing all 54 items completes it
//!
//! # Example
//!
//! ```
//! use tower_quiz_core::{GameSession, Reveal};
//! use tower_quiz_core::types::GamePhase;
//!
//! let mut game = GameSession::initialize(12345, 0).unwrap();
//!
//! // Reveal the top-left block of the tower
//! let top = game.blocks().last().unwrap().id;
//! match game.handle_block_click(top, 1_000).unwrap() {
//!     Reveal::Tip { resolution, .. } => assert_eq!(resolution.stability_delta, 0),
//!     Reveal::Question { content, .. } => {
//!         let answer = content.correct_index().unwrap();
//!         let result = game.handle_quiz_answer(top, answer, 4_000).unwrap();
//!         assert!(result.correct);
//!     }
//! }
//!
//! assert_eq!(game.content_shown(), 1);
//! assert_eq!(game.phase(), GamePhase::Playing);
//! ```

pub mod achievements;
pub mod catalog;
pub mod difficulty;
pub mod error;
pub mod quiz;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod stability;
pub mod statistics;
pub mod tower;

pub use tower_quiz_types as types;

// Re-export commonly used types for convenience
pub use achievements::{AchievementDef, AchievementId, AchievementRule, PlayerProgress, ACHIEVEMENTS};
pub use catalog::{Catalog, ContentItem, ContentKind};
pub use difficulty::{DifficultyChange, DifficultyController, OutcomeWindow};
pub use error::{CatalogError, EngineError};
pub use quiz::{QuizResult, QuizState, Resolution, ResolutionRecord, Reveal, UnlockedAchievement};
pub use rng::SessionRng;
pub use session::{Command, CommandOutcome, GameSession};
pub use snapshot::GameSnapshot;
pub use stability::{layer_penalty, Stability};
pub use statistics::{Breakdown, GameStatistics};
pub use tower::{Block, Tower};
