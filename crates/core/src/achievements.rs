//! Achievement evaluator
//!
//! Achievements are a closed table of [`AchievementDef`]s. After every
//! resolution the session builds a [`RuleContext`] and [`evaluate`] returns
//! the definitions whose rule now holds and that the player has not unlocked
//! yet. Unlocks are monotonic and stamped once.

use crate::difficulty::OutcomeWindow;
use crate::quiz::ResolutionRecord;
use crate::types::{
    DifficultyTier, GamePhase, Outcome, CRITICAL_THRESHOLD, INITIAL_STABILITY, QUICK_ANSWER_MS,
};

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    FirstBlock,
    FirstCorrect,
    Streak5,
    Streak10,
    QuickThinker,
    Bookworm,
    TierExplorer,
    FoundationMaster,
    CloseCall,
    Comeback,
    RisingChallenge,
    TowerComplete,
    Flawless,
}

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstBlock => "first_block",
            Self::FirstCorrect => "first_correct",
            Self::Streak5 => "streak_5",
            Self::Streak10 => "streak_10",
            Self::QuickThinker => "quick_thinker",
            Self::Bookworm => "bookworm",
            Self::TierExplorer => "tier_explorer",
            Self::FoundationMaster => "foundation_master",
            Self::CloseCall => "close_call",
            Self::Comeback => "comeback",
            Self::RisingChallenge => "rising_challenge",
            Self::TowerComplete => "tower_complete",
            Self::Flawless => "flawless",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        ACHIEVEMENTS.iter().map(|d| d.id).find(|id| id.as_str() == s)
    }

    pub fn definition(&self) -> &'static AchievementDef {
        // The table lists every id in declaration order.
        &ACHIEVEMENTS[*self as usize]
    }
}

/// Unlock condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    /// Any block resolved
    FirstResolution,
    /// Any question answered correctly
    FirstCorrect,
    /// Consecutive correct answers reach the threshold
    AnswerStreak(u32),
    /// Correct answer given within `max_ms` of the answer start
    QuickAnswer { max_ms: u64 },
    /// Tips read reach the threshold
    TipsRead(u32),
    /// Content shown from every tier
    AllTiersShown,
    /// Correct answers in one tier reach the threshold
    CorrectInTier { tier: DifficultyTier, count: u32 },
    /// Incorrect answer leaves stability in `1..=max_stability`
    CloseCall { max_stability: u8 },
    /// Correct answer right after this many consecutive misses
    Comeback { misses: usize },
    /// Reported difficulty reaches the tier
    DifficultyReached(DifficultyTier),
    /// Tower completed with at least this much stability
    TowerCompleted { min_stability: u8 },
}

/// Static achievement definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub points: u32,
    pub rule: AchievementRule,
}

/// All achievements, in [`AchievementId`] order
pub static ACHIEVEMENTS: [AchievementDef; 13] = [
    AchievementDef {
        id: AchievementId::FirstBlock,
        name: "First Block",
        description: "Remove your first block",
        points: 10,
        rule: AchievementRule::FirstResolution,
    },
    AchievementDef {
        id: AchievementId::FirstCorrect,
        name: "First Correct",
        description: "Answer a question correctly",
        points: 10,
        rule: AchievementRule::FirstCorrect,
    },
    AchievementDef {
        id: AchievementId::Streak5,
        name: "On a Roll",
        description: "Answer 5 questions correctly in a row",
        points: 50,
        rule: AchievementRule::AnswerStreak(5),
    },
    AchievementDef {
        id: AchievementId::Streak10,
        name: "Unstoppable",
        description: "Answer 10 questions correctly in a row",
        points: 100,
        rule: AchievementRule::AnswerStreak(10),
    },
    AchievementDef {
        id: AchievementId::QuickThinker,
        name: "Quick Thinker",
        description: "Answer correctly within 5 seconds",
        points: 25,
        rule: AchievementRule::QuickAnswer {
            max_ms: QUICK_ANSWER_MS,
        },
    },
    AchievementDef {
        id: AchievementId::Bookworm,
        name: "Bookworm",
        description: "Read 10 tips",
        points: 20,
        rule: AchievementRule::TipsRead(10),
    },
    AchievementDef {
        id: AchievementId::TierExplorer,
        name: "Tier Explorer",
        description: "See content from every difficulty tier",
        points: 30,
        rule: AchievementRule::AllTiersShown,
    },
    AchievementDef {
        id: AchievementId::FoundationMaster,
        name: "Foundation Master",
        description: "Answer 5 hard questions correctly",
        points: 50,
        rule: AchievementRule::CorrectInTier {
            tier: DifficultyTier::Hard,
            count: 5,
        },
    },
    AchievementDef {
        id: AchievementId::CloseCall,
        name: "Close Call",
        description: "Keep the tower standing at critical stability",
        points: 40,
        rule: AchievementRule::CloseCall {
            max_stability: CRITICAL_THRESHOLD,
        },
    },
    AchievementDef {
        id: AchievementId::Comeback,
        name: "Comeback",
        description: "Answer correctly after three misses in a row",
        points: 30,
        rule: AchievementRule::Comeback { misses: 3 },
    },
    AchievementDef {
        id: AchievementId::RisingChallenge,
        name: "Rising Challenge",
        description: "Reach hard difficulty",
        points: 40,
        rule: AchievementRule::DifficultyReached(DifficultyTier::Hard),
    },
    AchievementDef {
        id: AchievementId::TowerComplete,
        name: "Tower Complete",
        description: "Clear every block without collapsing",
        points: 100,
        rule: AchievementRule::TowerCompleted { min_stability: 1 },
    },
    AchievementDef {
        id: AchievementId::Flawless,
        name: "Flawless",
        description: "Clear the tower at full stability",
        points: 200,
        rule: AchievementRule::TowerCompleted {
            min_stability: INITIAL_STABILITY,
        },
    },
];

/// Running per-player totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub resolutions: u32,
    pub tips_read: u32,
    pub questions_answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// Indexed by [`DifficultyTier::index`]
    pub shown_by_tier: [u32; 3],
    pub correct_by_tier: [u32; 3],
    pub achievement_points: u32,
}

impl PlayerTotals {
    pub fn record(&mut self, outcome: Outcome, tier: DifficultyTier) {
        self.resolutions += 1;
        self.shown_by_tier[tier.index()] += 1;
        match outcome {
            Outcome::TipRead => self.tips_read += 1,
            Outcome::Correct => {
                self.questions_answered += 1;
                self.correct += 1;
                self.correct_by_tier[tier.index()] += 1;
            }
            Outcome::Incorrect => {
                self.questions_answered += 1;
                self.incorrect += 1;
            }
        }
    }
}

/// A stamped unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unlock {
    pub id: AchievementId,
    pub unlocked_at_ms: u64,
}

/// Unlock records plus totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    unlocked: Vec<Unlock>,
    pub totals: PlayerTotals,
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.iter().any(|u| u.id == id)
    }

    /// When `id` was unlocked, if ever
    pub fn unlocked_at(&self, id: AchievementId) -> Option<u64> {
        self.unlocked
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.unlocked_at_ms)
    }

    /// Stamp an unlock. Returns `false` if it was already unlocked.
    pub fn unlock(&mut self, id: AchievementId, now_ms: u64) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(Unlock {
            id,
            unlocked_at_ms: now_ms,
        });
        self.totals.achievement_points += id.definition().points;
        true
    }

    /// Unlocks in the order they happened
    pub fn unlocked(&self) -> &[Unlock] {
        &self.unlocked
    }

    pub fn total_achievements(&self) -> u32 {
        self.unlocked.len() as u32
    }
}

/// Session view the rules are evaluated against
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The resolution just applied
    pub last: &'a ResolutionRecord,
    pub totals: &'a PlayerTotals,
    pub answer_streak: u32,
    pub recent: &'a OutcomeWindow,
    pub stability: u8,
    pub phase: GamePhase,
    pub difficulty: DifficultyTier,
}

impl AchievementRule {
    pub fn is_satisfied(&self, ctx: &RuleContext<'_>) -> bool {
        let last = ctx.last.outcome;
        match *self {
            Self::FirstResolution => ctx.totals.resolutions >= 1,
            Self::FirstCorrect => ctx.totals.correct >= 1,
            Self::AnswerStreak(n) => ctx.answer_streak >= n,
            Self::QuickAnswer { max_ms } => {
                last == Outcome::Correct && ctx.last.response_ms.is_some_and(|ms| ms <= max_ms)
            }
            Self::TipsRead(n) => ctx.totals.tips_read >= n,
            Self::AllTiersShown => ctx.totals.shown_by_tier.iter().all(|&n| n > 0),
            Self::CorrectInTier { tier, count } => ctx.totals.correct_by_tier[tier.index()] >= count,
            Self::CloseCall { max_stability } => {
                last == Outcome::Incorrect && (1..=max_stability).contains(&ctx.stability)
            }
            Self::Comeback { misses } => {
                last == Outcome::Correct && ctx.recent.misses_before_last() >= misses
            }
            Self::DifficultyReached(tier) => ctx.difficulty >= tier,
            Self::TowerCompleted { min_stability } => {
                ctx.phase == GamePhase::Completed && ctx.stability >= min_stability
            }
        }
    }
}

/// Definitions newly satisfied by `ctx` and not yet unlocked by `player`
pub fn evaluate(player: &PlayerProgress, ctx: &RuleContext<'_>) -> Vec<&'static AchievementDef> {
    ACHIEVEMENTS
        .iter()
        .filter(|def| !player.is_unlocked(def.id) && def.rule.is_satisfied(ctx))
        .collect()
}
