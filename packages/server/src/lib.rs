//! Kyodo collaboration server.
//!
//! Rooms of connected clients share a code document, a chat log and typing
//! indicators over WebSocket. A small HTTP API exposes health, room statistics
//! and a compile proxy.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
