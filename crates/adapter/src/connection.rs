//! Per-connection protocol state
//!
//! A [`Connection`] owns one client's handshake state, `seq` tracking and
//! [`GameSession`]. It is synchronous and does no I/O: the server feeds it
//! one line at a time together with the current time and writes back the
//! reply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{Catalog, CommandOutcome, GameSession};
use crate::protocol::*;

/// Protocol state of a single client
pub struct Connection {
    client_id: u64,
    seed: u64,
    protocol_version: String,
    catalog: Arc<Catalog>,
    session: Option<GameSession>,
    last_seq: Option<u64>,
}

impl Connection {
    pub fn new(client_id: u64, seed: u64, protocol_version: &str, catalog: Arc<Catalog>) -> Self {
        Self {
            client_id,
            seed,
            protocol_version: protocol_version.to_string(),
            catalog,
            session: None,
            last_seq: None,
        }
    }

    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    pub fn is_handshaken(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Handle one inbound line. Blank lines produce no reply.
    pub fn handle_line(&mut self, line: &str, now_ms: u64) -> Option<ServerMessage> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let reply = match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => self.on_hello(hello, now_ms),
            Ok(ParsedMessage::Command(command)) => self.on_command(command, now_ms),
            Ok(ParsedMessage::Unknown(m)) => {
                warn!(client_id = self.client_id, seq = m.seq, "unknown message type");
                create_error(m.seq, now_ms, ErrorCode::InvalidCommand, "unknown message type")
            }
            Err(e) => {
                warn!(client_id = self.client_id, error = %e, "malformed message");
                create_error(
                    extract_seq(trimmed),
                    now_ms,
                    ErrorCode::InvalidCommand,
                    &format!("malformed message: {e}"),
                )
            }
        };
        Some(reply)
    }

    fn on_hello(&mut self, hello: HelloMessage, now_ms: u64) -> ServerMessage {
        if self.is_handshaken() && !advance_seq(&mut self.last_seq, hello.seq) {
            warn!(client_id = self.client_id, seq = hello.seq, "non-increasing seq");
            return create_error(
                hello.seq,
                now_ms,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            );
        }

        let major = self
            .protocol_version
            .split('.')
            .next()
            .unwrap_or_default();
        if hello.protocol_version.split('.').next() != Some(major) {
            warn!(
                client_id = self.client_id,
                requested = %hello.protocol_version,
                "protocol mismatch"
            );
            return create_error(
                hello.seq,
                now_ms,
                ErrorCode::ProtocolMismatch,
                &format!("Protocol version {} not supported", hello.protocol_version),
            );
        }

        self.last_seq = Some(hello.seq);
        let session = self.session.get_or_insert_with(|| {
            GameSession::with_catalog(Arc::clone(&self.catalog), self.seed, now_ms)
        });
        debug!(
            client_id = self.client_id,
            client = %hello.client.name,
            seed = session.seed(),
            "handshake complete"
        );

        create_welcome(
            hello.seq,
            now_ms,
            &self.protocol_version,
            self.client_id,
            &session.snapshot(),
        )
    }

    fn on_command(&mut self, msg: CommandMessage, now_ms: u64) -> ServerMessage {
        let Some(session) = self.session.as_mut() else {
            warn!(client_id = self.client_id, seq = msg.seq, "command before hello");
            return create_error(
                msg.seq,
                now_ms,
                ErrorCode::HandshakeRequired,
                "send hello before commands",
            );
        };
        if !advance_seq(&mut self.last_seq, msg.seq) {
            warn!(client_id = self.client_id, seq = msg.seq, "non-increasing seq");
            return create_error(
                msg.seq,
                now_ms,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            );
        }

        let command = match msg.to_command() {
            Ok(c) => c,
            Err(rejection) => {
                warn!(client_id = self.client_id, seq = msg.seq, %rejection, "command rejected");
                return create_error(msg.seq, now_ms, rejection.code(), &rejection.to_string());
            }
        };

        match session.apply(command, now_ms) {
            Ok(CommandOutcome::Revealed(reveal)) => create_reveal(msg.seq, now_ms, &reveal),
            Ok(CommandOutcome::Resolved(resolution)) => {
                create_resolution(msg.seq, now_ms, &resolution)
            }
            Ok(CommandOutcome::TimerStarted) => {
                create_ack(msg.seq, now_ms, msg.action, session.quiz_state().pending_block())
            }
            Ok(CommandOutcome::Cancelled(block_id)) => {
                create_ack(msg.seq, now_ms, msg.action, Some(block_id))
            }
            Ok(CommandOutcome::Reset(snapshot)) | Ok(CommandOutcome::State(snapshot)) => {
                create_state(msg.seq, now_ms, &snapshot)
            }
            Ok(CommandOutcome::Blocks(blocks)) => create_blocks(msg.seq, now_ms, &blocks),
            Ok(CommandOutcome::Stats(stats)) => create_stats(msg.seq, now_ms, &stats),
            Err(e) => create_error(msg.seq, now_ms, ErrorCode::from(&e), &e.to_string()),
        }
    }
}

/// Enforce strictly increasing `seq`
fn advance_seq(last_seq: &mut Option<u64>, seq: u64) -> bool {
    match *last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            *last_seq = Some(seq);
            true
        }
    }
}
