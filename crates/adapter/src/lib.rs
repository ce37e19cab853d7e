//! Adapter module - drive the quiz engine over a TCP socket with JSON
//!
//! This crate lets an external UI (a 3D front end, a test harness, a bot)
//! play the game without linking the engine. Every connection gets its own
//! independent [`GameSession`](crate::core::GameSession).
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//!    carrying the initial game state
//! 3. **Commanding**: Client sends `command` messages; every command gets
//!    exactly one reply echoing its `seq`
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and protocol version (`1.x`)
//! - **command**: `action` is one of `click`, `answer`, `start_timer`,
//!   `cancel`, `reset`, `state`, `blocks`, `stats`; `click` and `answer`
//!   carry `block_id`, `answer` also carries `selected_index`
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello
//! - **reveal**: Content of a clicked block (tips include their resolution)
//! - **resolution**: Outcome of an answer
//! - **state** / **blocks** / **stats**: Read-only views (`reset` replies with `state`)
//! - **ack**: `start_timer` and `cancel` succeeded
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `TOWER_QUIZ_HOST`: Bind address (default: "127.0.0.1")
//! - `TOWER_QUIZ_PORT`: Port number (default: 7878)
//! - `TOWER_QUIZ_SEED`: Base seed for new sessions (default: clock)
//! - `TOWER_QUIZ_CATALOG`: Path to a replacement JSON catalog
//! - `TOWER_QUIZ_DISABLED`: Set to "1" or "true" to disable the server entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"ui","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567891,"action":"click","block_id":0}
//! Server -> Client: {"type":"reveal","seq":2,"ts":1234567891,"block_id":0,"awaiting_answer":true,...}
//! Client -> Server: {"type":"command","seq":3,"ts":1234567895,"action":"answer","block_id":0,"selected_index":2}
//! Server -> Client: {"type":"resolution","seq":3,"ts":1234567895,"correct":true,"stability_delta":0,...}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod connection;
pub mod protocol;
pub mod server;

pub use tower_quiz_core as core;
pub use tower_quiz_types as types;

// Re-export protocol types for convenience
pub use connection::Connection;
pub use protocol::*;
pub use server::*;
