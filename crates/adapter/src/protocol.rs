//! Protocol module - JSON message types for the quiz adapter
//!
//! Line-delimited JSON. Every message has `type`, `seq` and `ts` (ms).
//! Server messages echo the `seq` of the request they answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{
    Block, Breakdown, Command, ContentItem, DifficultyChange, EngineError, GameSnapshot,
    GameStatistics, Resolution, Reveal, UnlockedAchievement,
};
use crate::types::{BlockId, ContentId, DifficultyTier};

// ============== Client -> Server Messages ==============

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    Click,
    Answer,
    StartTimer,
    Cancel,
    Reset,
    State,
    Blocks,
    Stats,
}

impl ActionName {
    pub const ALL: [ActionName; 8] = [
        ActionName::Click,
        ActionName::Answer,
        ActionName::StartTimer,
        ActionName::Cancel,
        ActionName::Reset,
        ActionName::State,
        ActionName::Blocks,
        ActionName::Stats,
    ];
}

/// Command message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub ts: u64,
    pub action: ActionName,
    /// Any JSON integer; values outside [`BlockId`] are unknown blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_index: Option<usize>,
}

/// Why a command message does not map to an engine [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRejection {
    /// A field the action needs is absent
    Missing(&'static str),
    /// `block_id` lies outside every possible tower
    UnknownBlock(i64),
}

impl CommandRejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommandRejection::Missing(_) => ErrorCode::InvalidCommand,
            CommandRejection::UnknownBlock(_) => ErrorCode::UnknownBlock,
        }
    }
}

impl std::fmt::Display for CommandRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandRejection::Missing(field) => write!(f, "{field} is required"),
            CommandRejection::UnknownBlock(id) => write!(f, "block {id} does not exist"),
        }
    }
}

impl CommandMessage {
    /// Engine command for this message
    pub fn to_command(&self) -> Result<Command, CommandRejection> {
        let block_id = || -> Result<BlockId, CommandRejection> {
            let raw = self.block_id.ok_or(CommandRejection::Missing("block_id"))?;
            BlockId::try_from(raw).map_err(|_| CommandRejection::UnknownBlock(raw))
        };
        Ok(match self.action {
            ActionName::Click => Command::Click {
                block_id: block_id()?,
            },
            ActionName::Answer => Command::Answer {
                block_id: block_id()?,
                selected_index: self
                    .selected_index
                    .ok_or(CommandRejection::Missing("selected_index"))?,
            },
            ActionName::StartTimer => Command::StartTimer,
            ActionName::Cancel => Command::Cancel,
            ActionName::Reset => Command::Reset,
            ActionName::State => Command::State,
            ActionName::Blocks => Command::Blocks,
            ActionName::Stats => Command::Stats,
        })
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    InvalidCommand,
    UnknownBlock,
    AlreadyRemoved,
    InvalidTransition,
    GameOver,
    InvalidOption,
}

impl From<&EngineError> for ErrorCode {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::UnknownBlock(_) => ErrorCode::UnknownBlock,
            EngineError::AlreadyRemoved(_) => ErrorCode::AlreadyRemoved,
            EngineError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            EngineError::GameOver(_) => ErrorCode::GameOver,
            EngineError::InvalidOption { .. } => ErrorCode::InvalidOption,
        }
    }
}

/// Outbound message, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Reveal(RevealMessage),
    Resolution(ResolutionMessage),
    State(StateMessage),
    Blocks(BlocksMessage),
    Stats(StatsMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ServerMessage::Welcome(m) => m.seq,
            ServerMessage::Reveal(m) => m.seq,
            ServerMessage::Resolution(m) => m.seq,
            ServerMessage::State(m) => m.seq,
            ServerMessage::Blocks(m) => m.seq,
            ServerMessage::Stats(m) => m.seq,
            ServerMessage::Ack(m) => m.seq,
            ServerMessage::Error(m) => m.seq,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub game_id: String,
    pub actions: Vec<ActionName>,
    pub state: SnapshotBody,
}

/// Content shown to the player. Never carries the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBody {
    pub id: ContentId,
    pub kind: String,
    pub category: String,
    pub difficulty: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl From<&ContentItem> for ContentBody {
    fn from(value: &ContentItem) -> Self {
        Self {
            id: value.id,
            kind: if value.is_question() { "question" } else { "tip" }.to_string(),
            category: value.category.clone(),
            difficulty: value.difficulty.as_str().to_string(),
            body: value.body.clone(),
            options: value.options().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBody {
    pub id: String,
    pub name: String,
    pub points: u32,
}

impl From<&UnlockedAchievement> for AchievementBody {
    fn from(value: &UnlockedAchievement) -> Self {
        Self {
            id: value.id.as_str().to_string(),
            name: value.name.to_string(),
            points: value.points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyChangeBody {
    pub from: String,
    pub to: String,
}

impl From<DifficultyChange> for DifficultyChangeBody {
    fn from(value: DifficultyChange) -> Self {
        Self {
            from: value.from.as_str().to_string(),
            to: value.to.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionBody {
    pub block_id: BlockId,
    pub content_id: ContentId,
    pub category: String,
    pub difficulty: String,
    pub layer: u8,
    pub outcome: String,
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub stability_delta: i32,
    pub stability: u8,
    pub stability_band: String,
    pub points_awarded: u32,
    pub achievement_points: u32,
    pub score: u32,
    pub unlocked: Vec<AchievementBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_change: Option<DifficultyChangeBody>,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_ms: Option<u64>,
}

impl From<&Resolution> for ResolutionBody {
    fn from(value: &Resolution) -> Self {
        Self {
            block_id: value.block_id,
            content_id: value.content_id,
            category: value.category.clone(),
            difficulty: value.difficulty.as_str().to_string(),
            layer: value.layer,
            outcome: value.outcome.as_str().to_string(),
            correct: value.correct,
            explanation: value.explanation.clone(),
            stability_delta: value.stability_delta,
            stability: value.stability,
            stability_band: value.stability_band.as_str().to_string(),
            points_awarded: value.points_awarded,
            achievement_points: value.achievement_points,
            score: value.score,
            unlocked: value.unlocked.iter().map(AchievementBody::from).collect(),
            difficulty_change: value.difficulty_change.map(DifficultyChangeBody::from),
            phase: value.phase.as_str().to_string(),
            response_ms: value.response_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealMessage {
    pub seq: u64,
    pub ts: u64,
    pub block_id: BlockId,
    pub content: ContentBody,
    pub awaiting_answer: bool,
    /// Present for tips, which resolve on reveal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionMessage {
    pub seq: u64,
    pub ts: u64,
    #[serde(flatten)]
    pub resolution: ResolutionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub episode_id: u32,
    pub phase: String,
    pub stability: u8,
    pub stability_band: String,
    pub score: u32,
    pub content_shown: u32,
    pub content_available: u32,
    pub progress_percent: u32,
    pub blocks_remaining: u32,
    pub current_difficulty: String,
    pub answer_streak: u32,
    pub best_streak: u32,
    pub recent_outcomes: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_block: Option<BlockId>,
    pub achievements_unlocked: u32,
}

impl From<&GameSnapshot> for SnapshotBody {
    fn from(value: &GameSnapshot) -> Self {
        Self {
            episode_id: value.episode_id,
            phase: value.phase.as_str().to_string(),
            stability: value.stability,
            stability_band: value.stability_band.as_str().to_string(),
            score: value.score,
            content_shown: value.content_shown,
            content_available: value.content_available,
            progress_percent: value.progress_percent(),
            blocks_remaining: value.blocks_remaining,
            current_difficulty: value.current_difficulty.as_str().to_string(),
            answer_streak: value.answer_streak,
            best_streak: value.best_streak,
            recent_outcomes: value.recent_outcomes.to_vec(),
            pending_block: value.pending_block,
            achievements_unlocked: value.achievements_unlocked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMessage {
    pub seq: u64,
    pub ts: u64,
    #[serde(flatten)]
    pub state: SnapshotBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBody {
    pub id: BlockId,
    pub layer: u8,
    pub slot: u8,
    pub orientation: String,
    pub difficulty: String,
    pub removed: bool,
}

impl From<&Block> for BlockBody {
    fn from(value: &Block) -> Self {
        Self {
            id: value.id,
            layer: value.layer,
            slot: value.slot,
            orientation: value.orientation.as_str().to_string(),
            difficulty: value.tier.as_str().to_string(),
            removed: value.removed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocksMessage {
    pub seq: u64,
    pub ts: u64,
    pub blocks: Vec<BlockBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownBody {
    pub shown: u32,
    pub tips: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl From<&Breakdown> for BreakdownBody {
    fn from(value: &Breakdown) -> Self {
        Self {
            shown: value.shown,
            tips: value.tips,
            correct: value.correct,
            incorrect: value.incorrect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsMessage {
    pub seq: u64,
    pub ts: u64,
    pub phase: String,
    pub score: u32,
    pub blocks_total: u32,
    pub blocks_removed: u32,
    pub tips_read: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_percent: Option<u32>,
    /// Keyed by tier name
    pub by_tier: BTreeMap<String, BreakdownBody>,
    pub by_category: BTreeMap<String, BreakdownBody>,
    pub best_streak: u32,
    pub stability: u8,
    pub stability_lost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_response_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest_response_ms: Option<u64>,
    pub achievements_unlocked: u32,
    pub achievements_total: u32,
    pub achievement_points: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub action: ActionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // An unknown type is reported to the client, not treated as garbage.
            #[derive(Debug, Deserialize)]
            struct Envelope<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Best-effort `seq` of a line that failed to parse
pub fn extract_seq(line: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("seq").and_then(serde_json::Value::as_u64))
        .unwrap_or(0)
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, ts: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        seq,
        ts,
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

pub fn create_welcome(
    seq: u64,
    ts: u64,
    protocol_version: &str,
    client_id: u64,
    snapshot: &GameSnapshot,
) -> ServerMessage {
    ServerMessage::Welcome(WelcomeMessage {
        seq,
        ts,
        protocol_version: protocol_version.to_string(),
        client_id,
        game_id: "tower-quiz".to_string(),
        actions: ActionName::ALL.to_vec(),
        state: SnapshotBody::from(snapshot),
    })
}

pub fn create_reveal(seq: u64, ts: u64, reveal: &Reveal) -> ServerMessage {
    let (block_id, resolution) = match reveal {
        Reveal::Tip { resolution, .. } => (resolution.block_id, Some(ResolutionBody::from(resolution))),
        Reveal::Question { block_id, .. } => (*block_id, None),
    };
    ServerMessage::Reveal(RevealMessage {
        seq,
        ts,
        block_id,
        content: ContentBody::from(reveal.content()),
        awaiting_answer: reveal.awaits_answer(),
        resolution,
    })
}

pub fn create_resolution(seq: u64, ts: u64, resolution: &Resolution) -> ServerMessage {
    ServerMessage::Resolution(ResolutionMessage {
        seq,
        ts,
        resolution: ResolutionBody::from(resolution),
    })
}

pub fn create_state(seq: u64, ts: u64, snapshot: &GameSnapshot) -> ServerMessage {
    ServerMessage::State(StateMessage {
        seq,
        ts,
        state: SnapshotBody::from(snapshot),
    })
}

pub fn create_blocks(seq: u64, ts: u64, blocks: &[Block]) -> ServerMessage {
    ServerMessage::Blocks(BlocksMessage {
        seq,
        ts,
        blocks: blocks.iter().map(BlockBody::from).collect(),
    })
}

pub fn create_stats(seq: u64, ts: u64, stats: &GameStatistics) -> ServerMessage {
    let by_tier = DifficultyTier::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), BreakdownBody::from(stats.tier(*t))))
        .collect();
    let by_category = stats
        .by_category
        .iter()
        .map(|(k, v)| (k.clone(), BreakdownBody::from(v)))
        .collect();

    ServerMessage::Stats(StatsMessage {
        seq,
        ts,
        phase: stats.phase.as_str().to_string(),
        score: stats.score,
        blocks_total: stats.blocks_total,
        blocks_removed: stats.blocks_removed,
        tips_read: stats.tips_read,
        questions_answered: stats.questions_answered,
        correct_answers: stats.correct_answers,
        incorrect_answers: stats.incorrect_answers,
        accuracy_percent: stats.accuracy_percent,
        by_tier,
        by_category,
        best_streak: stats.best_streak,
        stability: stats.stability,
        stability_lost: stats.stability_lost,
        average_response_ms: stats.average_response_ms,
        fastest_response_ms: stats.fastest_response_ms,
        achievements_unlocked: stats.achievements_unlocked,
        achievements_total: stats.achievements_total,
        achievement_points: stats.achievement_points,
        elapsed_ms: stats.elapsed_ms,
    })
}

pub fn create_ack(seq: u64, ts: u64, action: ActionName, block_id: Option<BlockId>) -> ServerMessage {
    ServerMessage::Ack(AckMessage {
        seq,
        ts,
        action,
        block_id,
    })
}

pub fn create_error(seq: u64, ts: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        seq,
        ts,
        code,
        message: message.to_string(),
    })
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
