//! Endpoint handlers.

mod http;
mod websocket;

pub use http::{compile, health_check, room_stats};
pub use websocket::websocket_handler;
