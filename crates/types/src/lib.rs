//! Core types module - shared enums and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the engine, the TCP adapter and any UI that consumes either.
//!
//! # Tower Layout
//!
//! The tower is 18 layers of 3 blocks (54 blocks), numbered bottom to top:
//!
//! | Layers | Tier | Band |
//! |--------|------|------|
//! | 1-6 | hard | foundation |
//! | 7-12 | medium | middle |
//! | 13-18 | easy | top |
//!
//! Block ids run `0..54`, three per layer, left to right.
//!
//! # Stability
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_STABILITY` | 100 | Stability of a fresh tower |
//! | `UNSTABLE_THRESHOLD` | 50 | At or below: "unstable" warning band |
//! | `CRITICAL_THRESHOLD` | 25 | At or below: "critical" warning band |
//! | `MAX_PENALTY` | 25 | Penalty for a miss on layer 1, scaled down per layer |
//!
//! # Scoring
//!
//! | Event | Points |
//! |-------|--------|
//! | Tip read | 5 |
//! | Correct easy | 10 |
//! | Correct medium | 20 |
//! | Correct hard | 30 |
//! | Incorrect | 0 |
//!
//! # Examples
//!
//! ```
//! use tower_quiz_types::{DifficultyTier, StabilityBand, TOTAL_BLOCKS};
//!
//! assert_eq!(DifficultyTier::for_layer(1), Some(DifficultyTier::Hard));
//! assert_eq!(DifficultyTier::for_layer(18), Some(DifficultyTier::Easy));
//! assert_eq!(DifficultyTier::from_str("Medium"), Some(DifficultyTier::Medium));
//!
//! assert_eq!(StabilityBand::from_stability(40), StabilityBand::Unstable);
//! assert_eq!(TOTAL_BLOCKS, 54);
//! ```

/// Number of layers in the tower
pub const TOWER_LAYERS: u8 = 18;

/// Blocks per layer
pub const BLOCKS_PER_LAYER: u8 = 3;

/// Total blocks in the tower (18 x 3)
pub const TOTAL_BLOCKS: usize = TOWER_LAYERS as usize * BLOCKS_PER_LAYER as usize;

/// Layers bound to a single difficulty tier
pub const LAYERS_PER_BAND: u8 = 6;

/// Blocks bound to a single difficulty tier (and catalog items required per tier)
pub const BLOCKS_PER_BAND: usize = LAYERS_PER_BAND as usize * BLOCKS_PER_LAYER as usize;

/// Required catalog size (one item per block, no reuse)
pub const CATALOG_SIZE: usize = TOTAL_BLOCKS;

/// Stability of a fresh tower
pub const INITIAL_STABILITY: u8 = 100;

/// At or below this stability the tower is "unstable" (advisory)
pub const UNSTABLE_THRESHOLD: u8 = 50;

/// At or below this stability the tower is "critical" (advisory)
pub const CRITICAL_THRESHOLD: u8 = 25;

/// Stability penalty for a wrong answer on layer 1.
///
/// Higher layers carry proportionally less load:
/// `penalty = round_half_up(MAX_PENALTY * (TOWER_LAYERS + 1 - layer) / TOWER_LAYERS)`.
pub const MAX_PENALTY: u32 = 25;

/// Points for reading a tip
pub const TIP_POINTS: u32 = 5;

/// Points for a correct answer, indexed by [`DifficultyTier::index`]
pub const CORRECT_POINTS: [u32; 3] = [10, 20, 30];

/// Rolling window of question outcomes kept by the session
pub const DIFFICULTY_WINDOW: usize = 5;

/// Minimum outcomes in the window before difficulty may move
pub const DIFFICULTY_MIN_SAMPLES: usize = 3;

/// Correct-rate (percent) at or above which difficulty escalates
pub const ESCALATE_PERCENT: u32 = 80;

/// Correct-rate (percent) at or below which difficulty de-escalates
pub const DEESCALATE_PERCENT: u32 = 40;

/// Answers at or under this response time count as "quick"
pub const QUICK_ANSWER_MS: u64 = 5_000;

/// Block index within the tower (`0..TOTAL_BLOCKS`)
pub type BlockId = u8;

/// Catalog item id
pub type ContentId = u32;

/// Difficulty tier of content and of a layer band
///
/// Ordered `Easy < Medium < Hard`. The foundation of the tower holds the hard
/// tier, so mistakes there cost the most stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    /// All tiers, easiest first
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    /// Tier bound to a 1-based layer number, or `None` outside `1..=18`
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_quiz_types::DifficultyTier;
    ///
    /// assert_eq!(DifficultyTier::for_layer(6), Some(DifficultyTier::Hard));
    /// assert_eq!(DifficultyTier::for_layer(7), Some(DifficultyTier::Medium));
    /// assert_eq!(DifficultyTier::for_layer(13), Some(DifficultyTier::Easy));
    /// assert_eq!(DifficultyTier::for_layer(0), None);
    /// ```
    pub fn for_layer(layer: u8) -> Option<Self> {
        match layer {
            1..=6 => Some(DifficultyTier::Hard),
            7..=12 => Some(DifficultyTier::Medium),
            13..=18 => Some(DifficultyTier::Easy),
            _ => None,
        }
    }

    /// Inclusive layer range of this tier's band
    pub fn layer_band(&self) -> (u8, u8) {
        match self {
            DifficultyTier::Hard => (1, LAYERS_PER_BAND),
            DifficultyTier::Medium => (LAYERS_PER_BAND + 1, LAYERS_PER_BAND * 2),
            DifficultyTier::Easy => (LAYERS_PER_BAND * 2 + 1, TOWER_LAYERS),
        }
    }

    /// Stable index (easy=0, medium=1, hard=2) for per-tier tables
    pub fn index(&self) -> usize {
        match self {
            DifficultyTier::Easy => 0,
            DifficultyTier::Medium => 1,
            DifficultyTier::Hard => 2,
        }
    }

    /// Points for a correct answer at this tier
    pub fn correct_points(&self) -> u32 {
        CORRECT_POINTS[self.index()]
    }

    /// One tier up, saturating at hard
    pub fn harder(&self) -> Self {
        match self {
            DifficultyTier::Easy => DifficultyTier::Medium,
            DifficultyTier::Medium | DifficultyTier::Hard => DifficultyTier::Hard,
        }
    }

    /// One tier down, saturating at easy
    pub fn easier(&self) -> Self {
        match self {
            DifficultyTier::Hard => DifficultyTier::Medium,
            DifficultyTier::Medium | DifficultyTier::Easy => DifficultyTier::Easy,
        }
    }

    /// Parse tier from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "medium" => Some(DifficultyTier::Medium),
            "hard" => Some(DifficultyTier::Hard),
            _ => None,
        }
    }

    /// Lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }
}

/// Overall game phase
///
/// `Collapsed` and `Completed` are terminal: no further block may be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Playing,
    Collapsed,
    Completed,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "playing",
            GamePhase::Collapsed => "collapsed",
            GamePhase::Completed => "completed",
        }
    }
}

/// Advisory warning band derived from stability
///
/// This is never stored; it is recomputed from the stability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StabilityBand {
    Stable,
    Unstable,
    Critical,
    Collapsed,
}

impl StabilityBand {
    /// Classify a stability value
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_quiz_types::StabilityBand;
    ///
    /// assert_eq!(StabilityBand::from_stability(100), StabilityBand::Stable);
    /// assert_eq!(StabilityBand::from_stability(50), StabilityBand::Unstable);
    /// assert_eq!(StabilityBand::from_stability(25), StabilityBand::Critical);
    /// assert_eq!(StabilityBand::from_stability(0), StabilityBand::Collapsed);
    /// ```
    pub fn from_stability(stability: u8) -> Self {
        if stability == 0 {
            StabilityBand::Collapsed
        } else if stability <= CRITICAL_THRESHOLD {
            StabilityBand::Critical
        } else if stability <= UNSTABLE_THRESHOLD {
            StabilityBand::Unstable
        } else {
            StabilityBand::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityBand::Stable => "stable",
            StabilityBand::Unstable => "unstable",
            StabilityBand::Critical => "critical",
            StabilityBand::Collapsed => "collapsed",
        }
    }
}

/// Block orientation; alternates per layer like a real stacking tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    NorthSouth,
    EastWest,
}

impl Orientation {
    pub fn for_layer(layer: u8) -> Self {
        if layer % 2 == 1 {
            Orientation::NorthSouth
        } else {
            Orientation::EastWest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::NorthSouth => "north_south",
            Orientation::EastWest => "east_west",
        }
    }
}

/// How a block's interaction was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Tip block, removed on click without risk
    TipRead,
    /// Question answered correctly
    Correct,
    /// Question answered incorrectly
    Incorrect,
}

impl Outcome {
    pub fn is_question(&self) -> bool {
        !matches!(self, Outcome::TipRead)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::TipRead => "tip_read",
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
        }
    }
}
