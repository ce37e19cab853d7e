//! Game session - the aggregate root of one play-through
//!
//! A [`GameSession`] owns every piece of mutable state. It changes only
//! through the command methods below (or [`GameSession::apply`]), and each
//! call either applies completely or returns an [`EngineError`] with the
//! session untouched.
//!
//! The engine never reads a clock: every command takes the caller's `now_ms`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::achievements::{self, PlayerProgress, RuleContext};
use crate::catalog::{Catalog, ContentItem};
use crate::difficulty::{DifficultyController, OutcomeWindow};
use crate::error::{CatalogError, EngineError};
use crate::quiz::{QuizState, Resolution, ResolutionRecord, Reveal, UnlockedAchievement};
use crate::rng::SessionRng;
use crate::scoring::{resolution_points, ProgressTracker};
use crate::snapshot::GameSnapshot;
use crate::stability::{stability_delta, Stability};
use crate::statistics::{GameStatistics, SessionTotals};
use crate::tower::{Block, Tower};
use crate::types::{BlockId, DifficultyTier, GamePhase, Outcome};

/// Engine command, one per public operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click { block_id: BlockId },
    Answer { block_id: BlockId, selected_index: usize },
    StartTimer,
    Cancel,
    Reset,
    State,
    Blocks,
    Stats,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Click { .. } => "click",
            Command::Answer { .. } => "answer",
            Command::StartTimer => "start_timer",
            Command::Cancel => "cancel",
            Command::Reset => "reset",
            Command::State => "state",
            Command::Blocks => "blocks",
            Command::Stats => "stats",
        }
    }
}

/// What a successful [`Command`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Revealed(Reveal),
    Resolved(Resolution),
    TimerStarted,
    Cancelled(BlockId),
    Reset(GameSnapshot),
    State(GameSnapshot),
    Blocks(Vec<Block>),
    Stats(GameStatistics),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Arc<Catalog>,
    rng: SessionRng,
    /// Monotonic episode id (increments on reset)
    episode_id: u32,
    started_at_ms: u64,
    tower: Tower,
    stability: Stability,
    progress: ProgressTracker,
    difficulty: DifficultyController,
    quiz: QuizState,
    answer_streak: u32,
    best_streak: u32,
    recent: OutcomeWindow,
    player: PlayerProgress,
    history: Vec<ResolutionRecord>,
}

impl GameSession {
    /// Start a session on the built-in catalog
    pub fn initialize(seed: u64, now_ms: u64) -> Result<Self, CatalogError> {
        let catalog = Catalog::builtin()?;
        Ok(Self::with_catalog(Arc::new(catalog), seed, now_ms))
    }

    /// Start a session on an already validated catalog
    pub fn with_catalog(catalog: Arc<Catalog>, seed: u64, now_ms: u64) -> Self {
        Self::build(catalog, seed, 0, now_ms)
    }

    fn build(catalog: Arc<Catalog>, seed: u64, episode_id: u32, now_ms: u64) -> Self {
        let mut rng = SessionRng::new(seed);
        let tower = Tower::build(&catalog, &mut rng);
        let available = tower.len() as u32;

        info!(seed, episode_id, blocks = available, "session initialized");

        Self {
            catalog,
            rng,
            episode_id,
            started_at_ms: now_ms,
            tower,
            stability: Stability::new(),
            progress: ProgressTracker::new(available),
            difficulty: DifficultyController::new(),
            quiz: QuizState::Idle,
            answer_streak: 0,
            best_streak: 0,
            recent: OutcomeWindow::new(),
            player: PlayerProgress::new(),
            history: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn blocks(&self) -> &[Block] {
        self.tower.blocks()
    }

    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    pub fn phase(&self) -> GamePhase {
        self.progress.phase()
    }

    pub fn is_over(&self) -> bool {
        self.progress.phase().is_terminal()
    }

    pub fn stability(&self) -> u8 {
        self.stability.value()
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn content_shown(&self) -> u32 {
        self.progress.content_shown()
    }

    pub fn content_available(&self) -> u32 {
        self.progress.content_available()
    }

    pub fn current_difficulty(&self) -> DifficultyTier {
        self.difficulty.current()
    }

    pub fn answer_streak(&self) -> u32 {
        self.answer_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn recent_outcomes(&self) -> &[bool] {
        self.recent.as_slice()
    }

    pub fn quiz_state(&self) -> QuizState {
        self.quiz
    }

    pub fn player(&self) -> &PlayerProgress {
        &self.player
    }

    /// Append-only resolution log, oldest first
    pub fn history(&self) -> &[ResolutionRecord] {
        &self.history
    }

    /// Content bound to a block
    pub fn content_for(&self, block_id: BlockId) -> Option<&ContentItem> {
        let block = self.tower.get(block_id)?;
        self.catalog.get(block.content_id)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            episode_id: self.episode_id,
            seed: self.rng.seed(),
            phase: self.progress.phase(),
            stability: self.stability.value(),
            stability_band: self.stability.band(),
            score: self.progress.score(),
            content_shown: self.progress.content_shown(),
            content_available: self.progress.content_available(),
            blocks_remaining: self.tower.remaining() as u32,
            current_difficulty: self.difficulty.current(),
            answer_streak: self.answer_streak,
            best_streak: self.best_streak,
            recent_outcomes: self.recent.as_slice().iter().copied().collect(),
            pending_block: self.quiz.pending_block(),
            achievements_unlocked: self.player.total_achievements(),
            started_at_ms: self.started_at_ms,
        }
    }

    pub fn statistics(&self, now_ms: u64) -> GameStatistics {
        let totals = SessionTotals {
            phase: self.progress.phase(),
            score: self.progress.score(),
            blocks_total: self.tower.len() as u32,
            best_streak: self.best_streak,
            stability: self.stability.value(),
            achievements_unlocked: self.player.total_achievements(),
            achievement_points: self.player.totals.achievement_points,
            started_at_ms: self.started_at_ms,
        };
        GameStatistics::collect(&self.history, totals, now_ms)
    }

    /// Reveal a block's content.
    ///
    /// Tips resolve on the spot. Questions enter `AwaitingAnswer` with the
    /// answer timer started at `now_ms`.
    pub fn handle_block_click(&mut self, block_id: BlockId, now_ms: u64) -> Result<Reveal, EngineError> {
        self.ensure_playing()?;
        let block = *self.tower.check_removable(block_id)?;
        self.quiz.ensure_idle()?;

        let catalog = Arc::clone(&self.catalog);
        let content = catalog
            .get(block.content_id)
            .ok_or(EngineError::UnknownBlock(block_id))?;

        if content.is_question() {
            self.quiz = QuizState::AwaitingAnswer {
                block_id,
                started_at_ms: now_ms,
            };
            debug!(block_id, content_id = content.id, layer = block.layer, "question revealed");
            return Ok(Reveal::Question {
                block_id,
                content: content.clone(),
                started_at_ms: now_ms,
            });
        }

        let resolution = self.resolve(block, content, Outcome::TipRead, None, None, now_ms)?;
        Ok(Reveal::Tip {
            content: content.clone(),
            resolution,
        })
    }

    /// Re-stamp the pending question's answer start (e.g. once the UI has
    /// finished animating the question in)
    pub fn set_answer_start_time(&mut self, now_ms: u64) -> Result<(), EngineError> {
        match self.quiz {
            QuizState::AwaitingAnswer { block_id, .. } => {
                self.quiz = QuizState::AwaitingAnswer {
                    block_id,
                    started_at_ms: now_ms,
                };
                Ok(())
            }
            QuizState::Idle => Err(EngineError::InvalidTransition(
                "no question is awaiting an answer",
            )),
        }
    }

    /// Answer the pending question
    pub fn handle_quiz_answer(
        &mut self,
        block_id: BlockId,
        selected_index: usize,
        now_ms: u64,
    ) -> Result<Resolution, EngineError> {
        self.ensure_playing()?;
        let block = *self.tower.check_removable(block_id)?;
        let started_at_ms = self.quiz.started_at(block_id)?;

        let catalog = Arc::clone(&self.catalog);
        let content = catalog
            .get(block.content_id)
            .ok_or(EngineError::UnknownBlock(block_id))?;

        let options = content.options().len();
        if selected_index >= options {
            return Err(EngineError::InvalidOption {
                index: selected_index,
                options,
            });
        }

        let outcome = if content.is_correct(selected_index) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        let response_ms = now_ms.saturating_sub(started_at_ms);

        let resolution = self.resolve(
            block,
            content,
            outcome,
            Some(selected_index),
            Some(response_ms),
            now_ms,
        )?;
        self.quiz = QuizState::Idle;
        Ok(resolution)
    }

    /// Close the pending question without removing its block
    pub fn cancel_question(&mut self) -> Result<BlockId, EngineError> {
        let block_id = self
            .quiz
            .pending_block()
            .ok_or(EngineError::InvalidTransition("no question is awaiting an answer"))?;
        self.quiz = QuizState::Idle;
        debug!(block_id, "question cancelled");
        Ok(block_id)
    }

    /// Replace the session wholesale with a fresh layout
    pub fn reset_game(&mut self, now_ms: u64) -> GameSnapshot {
        let seed = self.rng.next_seed();
        let episode_id = self.episode_id.wrapping_add(1);
        info!(
            episode_id,
            previous_score = self.progress.score(),
            previous_phase = self.progress.phase().as_str(),
            "session reset"
        );
        *self = Self::build(Arc::clone(&self.catalog), seed, episode_id, now_ms);
        self.snapshot()
    }

    /// Run a command through the matching operation
    pub fn apply(&mut self, command: Command, now_ms: u64) -> Result<CommandOutcome, EngineError> {
        let result = match command {
            Command::Click { block_id } => self
                .handle_block_click(block_id, now_ms)
                .map(CommandOutcome::Revealed),
            Command::Answer {
                block_id,
                selected_index,
            } => self
                .handle_quiz_answer(block_id, selected_index, now_ms)
                .map(CommandOutcome::Resolved),
            Command::StartTimer => self
                .set_answer_start_time(now_ms)
                .map(|()| CommandOutcome::TimerStarted),
            Command::Cancel => self.cancel_question().map(CommandOutcome::Cancelled),
            Command::Reset => Ok(CommandOutcome::Reset(self.reset_game(now_ms))),
            Command::State => Ok(CommandOutcome::State(self.snapshot())),
            Command::Blocks => Ok(CommandOutcome::Blocks(self.blocks().to_vec())),
            Command::Stats => Ok(CommandOutcome::Stats(self.statistics(now_ms))),
        };
        result.inspect_err(|e| debug!(command = command.as_str(), error = %e, "command rejected"))
    }

    fn ensure_playing(&self) -> Result<(), EngineError> {
        let phase = self.progress.phase();
        if phase.is_terminal() {
            return Err(EngineError::GameOver(phase));
        }
        Ok(())
    }

    /// Apply a resolution. Callers validate first; removal is the only
    /// fallible step and runs before anything else changes.
    fn resolve(
        &mut self,
        block: Block,
        content: &ContentItem,
        outcome: Outcome,
        selected_index: Option<usize>,
        response_ms: Option<u64>,
        now_ms: u64,
    ) -> Result<Resolution, EngineError> {
        self.tower.mark_removed(block.id)?;

        let before = self.stability;
        self.stability = before.after(stability_delta(outcome, block.layer));
        let points = resolution_points(outcome, block.tier);
        self.progress.award(points);
        self.progress.record_shown();

        match outcome {
            Outcome::Correct => {
                self.answer_streak += 1;
                self.best_streak = self.best_streak.max(self.answer_streak);
                self.recent.push(true);
            }
            Outcome::Incorrect => {
                self.answer_streak = 0;
                self.recent.push(false);
            }
            Outcome::TipRead => {}
        }

        let difficulty_change = if outcome.is_question() {
            self.difficulty.record(&self.recent)
        } else {
            None
        };
        if let Some(change) = difficulty_change {
            debug!(from = change.from.as_str(), to = change.to.as_str(), "difficulty changed");
        }

        self.player.totals.record(outcome, block.tier);
        self.history.push(ResolutionRecord {
            block_id: block.id,
            content_id: content.id,
            layer: block.layer,
            tier: block.tier,
            category: content.category.clone(),
            outcome,
            selected_index,
            stability_before: before.value(),
            stability_after: self.stability.value(),
            points_awarded: points,
            response_ms,
            resolved_at_ms: now_ms,
        });

        match self.progress.update_phase(self.stability) {
            Some(GamePhase::Collapsed) => info!(
                score = self.progress.score(),
                removed = self.tower.removed_count(),
                "tower collapsed"
            ),
            Some(GamePhase::Completed) => info!(
                score = self.progress.score(),
                stability = self.stability.value(),
                "tower completed"
            ),
            _ => {}
        }

        let unlocked = self.unlock_achievements(now_ms);
        let achievement_points = unlocked.iter().map(|a| a.points).sum();
        let stability_delta = self.stability.value() as i32 - before.value() as i32;

        debug!(
            block_id = block.id,
            outcome = outcome.as_str(),
            stability_delta,
            stability = self.stability.value(),
            points,
            "block resolved"
        );

        Ok(Resolution {
            block_id: block.id,
            content_id: content.id,
            category: content.category.clone(),
            difficulty: block.tier,
            layer: block.layer,
            outcome,
            correct: outcome == Outcome::Correct,
            explanation: content.explanation().map(str::to_string),
            stability_delta,
            stability: self.stability.value(),
            stability_band: self.stability.band(),
            points_awarded: points,
            achievement_points,
            score: self.progress.score(),
            unlocked,
            difficulty_change,
            phase: self.progress.phase(),
            response_ms,
        })
    }

    fn unlock_achievements(&mut self, now_ms: u64) -> Vec<UnlockedAchievement> {
        let Some(last) = self.history.last() else {
            return Vec::new();
        };
        let ctx = RuleContext {
            last,
            totals: &self.player.totals,
            answer_streak: self.answer_streak,
            recent: &self.recent,
            stability: self.stability.value(),
            phase: self.progress.phase(),
            difficulty: self.difficulty.current(),
        };
        let newly = achievements::evaluate(&self.player, &ctx);

        let mut unlocked = Vec::with_capacity(newly.len());
        for def in newly {
            if self.player.unlock(def.id, now_ms) {
                self.progress.award(def.points);
                info!(achievement = def.id.as_str(), points = def.points, "achievement unlocked");
                unlocked.push(UnlockedAchievement {
                    id: def.id,
                    name: def.name,
                    points: def.points,
                });
            }
        }
        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementId;
    use crate::stability::layer_penalty;
    use crate::types::{INITIAL_STABILITY, TIP_POINTS, TOTAL_BLOCKS};

    fn session(seed: u64) -> GameSession {
        GameSession::initialize(seed, 0).unwrap()
    }

    fn find_block(s: &GameSession, question: bool) -> BlockId {
        s.blocks()
            .iter()
            .find(|b| !b.removed && s.content_for(b.id).unwrap().is_question() == question)
            .map(|b| b.id)
            .unwrap()
    }

    fn correct_index(s: &GameSession, id: BlockId) -> usize {
        s.content_for(id).unwrap().correct_index().unwrap()
    }

    fn wrong_index(s: &GameSession, id: BlockId) -> usize {
        (correct_index(s, id) + 1) % s.content_for(id).unwrap().options().len()
    }

    #[test]
    fn test_initial_state() {
        let s = session(1);
        let snap = s.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.stability, INITIAL_STABILITY);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.content_shown, 0);
        assert_eq!(snap.content_available, TOTAL_BLOCKS as u32);
        assert_eq!(snap.blocks_remaining, TOTAL_BLOCKS as u32);
        assert_eq!(snap.current_difficulty, DifficultyTier::Medium);
        assert_eq!(snap.pending_block, None);
        assert_eq!(snap.episode_id, 0);
    }

    #[test]
    fn test_tip_resolves_immediately() {
        let mut s = session(1);
        let id = find_block(&s, false);
        let reveal = s.handle_block_click(id, 10).unwrap();
        assert!(!reveal.awaits_answer());

        let res = reveal.resolution().unwrap();
        assert_eq!(res.outcome, Outcome::TipRead);
        assert_eq!(res.stability_delta, 0);
        assert_eq!(res.points_awarded, TIP_POINTS);
        assert_eq!(s.quiz_state(), QuizState::Idle);
        assert!(s.tower().get(id).unwrap().removed);
        assert_eq!(s.content_shown(), 1);
    }

    #[test]
    fn test_question_flow_correct() {
        let mut s = session(2);
        let id = find_block(&s, true);
        let tier = s.tower().get(id).unwrap().tier;

        let reveal = s.handle_block_click(id, 1_000).unwrap();
        assert!(reveal.awaits_answer());
        assert_eq!(s.snapshot().pending_block, Some(id));
        assert!(!s.tower().get(id).unwrap().removed);

        let res = s.handle_quiz_answer(id, correct_index(&s, id), 3_000).unwrap();
        assert!(res.correct);
        assert_eq!(res.stability_delta, 0);
        assert_eq!(res.points_awarded, tier.correct_points());
        assert_eq!(res.response_ms, Some(2_000));
        assert_eq!(s.score(), res.points_awarded + res.achievement_points);
        assert_eq!(s.quiz_state(), QuizState::Idle);
        assert_eq!(s.answer_streak(), 1);
    }

    #[test]
    fn test_question_flow_incorrect() {
        let mut s = session(3);
        let id = find_block(&s, true);
        let layer = s.tower().get(id).unwrap().layer;

        s.handle_block_click(id, 0).unwrap();
        let res = s.handle_quiz_answer(id, wrong_index(&s, id), 0).unwrap();
        assert!(!res.correct);
        assert_eq!(res.points_awarded, 0);
        assert_eq!(res.stability_delta, -(layer_penalty(layer) as i32));
        assert_eq!(s.stability(), INITIAL_STABILITY - layer_penalty(layer));
        assert!(res.explanation.is_some());
        assert_eq!(s.answer_streak(), 0);
    }

    #[test]
    fn test_click_while_pending_is_rejected() {
        let mut s = session(4);
        let q = find_block(&s, true);
        s.handle_block_click(q, 0).unwrap();

        let other = s.blocks().iter().find(|b| b.id != q).unwrap().id;
        assert!(matches!(
            s.handle_block_click(other, 0),
            Err(EngineError::InvalidTransition(_))
        ));
        assert!(matches!(
            s.handle_quiz_answer(other, 0, 0),
            Err(EngineError::InvalidTransition(_))
        ));
        assert_eq!(s.snapshot().pending_block, Some(q));
    }

    #[test]
    fn test_invalid_option_keeps_question_pending() {
        let mut s = session(5);
        let q = find_block(&s, true);
        s.handle_block_click(q, 0).unwrap();
        let before = s.snapshot();

        let err = s.handle_quiz_answer(q, 99, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOption { index: 99, .. }));
        assert_eq!(s.snapshot(), before);

        assert!(s.handle_quiz_answer(q, correct_index(&s, q), 0).is_ok());
    }

    #[test]
    fn test_cancel_keeps_block() {
        let mut s = session(6);
        let q = find_block(&s, true);
        assert!(s.cancel_question().is_err());

        s.handle_block_click(q, 0).unwrap();
        assert_eq!(s.cancel_question(), Ok(q));
        assert_eq!(s.quiz_state(), QuizState::Idle);
        assert!(!s.tower().get(q).unwrap().removed);
        assert_eq!(s.content_shown(), 0);
    }

    #[test]
    fn test_set_answer_start_time() {
        let mut s = session(7);
        assert!(s.set_answer_start_time(5).is_err());

        let q = find_block(&s, true);
        s.handle_block_click(q, 0).unwrap();
        s.set_answer_start_time(4_000).unwrap();
        let res = s.handle_quiz_answer(q, correct_index(&s, q), 5_000).unwrap();
        assert_eq!(res.response_ms, Some(1_000));
        assert!(res.unlocked.iter().any(|a| a.id == AchievementId::QuickThinker));
    }

    #[test]
    fn test_unknown_and_removed_blocks() {
        let mut s = session(8);
        assert_eq!(
            s.handle_block_click(200, 0).unwrap_err(),
            EngineError::UnknownBlock(200)
        );

        let tip = find_block(&s, false);
        s.handle_block_click(tip, 0).unwrap();
        let before = s.snapshot();
        assert_eq!(
            s.handle_block_click(tip, 0).unwrap_err(),
            EngineError::AlreadyRemoved(tip)
        );
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_collapse_then_game_over() {
        let mut s = session(9);
        // Hard questions sit in the foundation; a handful of misses collapses it.
        while !s.is_over() {
            let q = s
                .blocks()
                .iter()
                .find(|b| {
                    !b.removed
                        && b.tier == DifficultyTier::Hard
                        && s.content_for(b.id).unwrap().is_question()
                })
                .unwrap()
                .id;
            s.handle_block_click(q, 0).unwrap();
            s.handle_quiz_answer(q, wrong_index(&s, q), 0).unwrap();
        }
        assert_eq!(s.phase(), GamePhase::Collapsed);
        assert_eq!(s.stability(), 0);

        let any = s.blocks().iter().find(|b| !b.removed).unwrap().id;
        assert_eq!(
            s.handle_block_click(any, 0).unwrap_err(),
            EngineError::GameOver(GamePhase::Collapsed)
        );
    }

    #[test]
    fn test_reset_replaces_session() {
        let mut s = session(10);
        let tip = find_block(&s, false);
        s.handle_block_click(tip, 0).unwrap();
        let old_seed = s.seed();

        let snap = s.reset_game(500);
        assert_eq!(snap.episode_id, 1);
        assert_ne!(snap.seed, old_seed);
        assert_eq!(snap.stability, INITIAL_STABILITY);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.content_shown, 0);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.achievements_unlocked, 0);
        assert_eq!(snap.started_at_ms, 500);
        assert!(s.blocks().iter().all(|b| !b.removed));
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = session(42);
        let b = session(42);
        assert_eq!(a.blocks(), b.blocks());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_apply_dispatches() {
        let mut s = session(11);
        let q = find_block(&s, true);
        let idx = correct_index(&s, q);

        let out = s.apply(Command::Click { block_id: q }, 0).unwrap();
        assert!(matches!(out, CommandOutcome::Revealed(Reveal::Question { .. })));
        assert_eq!(s.apply(Command::StartTimer, 10), Ok(CommandOutcome::TimerStarted));

        let out = s
            .apply(
                Command::Answer {
                    block_id: q,
                    selected_index: idx,
                },
                20,
            )
            .unwrap();
        assert!(matches!(out, CommandOutcome::Resolved(ref r) if r.correct));

        assert!(matches!(
            s.apply(Command::Cancel, 30),
            Err(EngineError::InvalidTransition(_))
        ));
        match s.apply(Command::Blocks, 30).unwrap() {
            CommandOutcome::Blocks(blocks) => assert_eq!(blocks.len(), TOTAL_BLOCKS),
            other => panic!("unexpected outcome: {other:?}"),
        }
        match s.apply(Command::Stats, 30).unwrap() {
            CommandOutcome::Stats(stats) => assert_eq!(stats.correct_answers, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        match s.apply(Command::Reset, 40).unwrap() {
            CommandOutcome::Reset(snap) => assert_eq!(snap.episode_id, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_first_resolution_unlocks_first_block() {
        let mut s = session(12);
        let tip = find_block(&s, false);
        let reveal = s.handle_block_click(tip, 77).unwrap();
        let res = reveal.resolution().unwrap();
        assert_eq!(res.unlocked.len(), 1);
        assert_eq!(res.unlocked[0].id, AchievementId::FirstBlock);
        assert_eq!(s.score(), TIP_POINTS + 10);
        assert_eq!(s.player().unlocked_at(AchievementId::FirstBlock), Some(77));
    }
}
