//! Tower quiz (workspace facade crate).
//!
//! Re-exports the workspace crates as `tower_quiz::{types, core, adapter}` so
//! integration tests, benches and downstream users depend on one package.

pub use tower_quiz_adapter as adapter;
pub use tower_quiz_core as core;
pub use tower_quiz_types as types;
