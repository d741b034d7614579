//! Server configuration.

use std::time::Duration;

use crate::domain::DEFAULT_CHAT_LOG_CAPACITY;

/// Default typing indicator lifetime after the most recent typing event
pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_secs(3);

/// Default upstream code execution endpoint
pub const DEFAULT_COMPILE_ENDPOINT: &str = "https://api.jdoodle.com/v1/execute";

/// Default bound on a single compile call
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-room session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of chat messages kept per room
    pub chat_log_capacity: usize,
    /// Typing indicator expiry
    pub typing_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chat_log_capacity: DEFAULT_CHAT_LOG_CAPACITY,
            typing_timeout: DEFAULT_TYPING_TIMEOUT,
        }
    }
}

/// Credentials for the upstream code execution service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Compile proxy settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub endpoint: String,
    pub timeout: Duration,
    /// `None` selects the mock compiler
    pub credentials: Option<CompilerCredentials>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPILE_ENDPOINT.to_string(),
            timeout: DEFAULT_COMPILE_TIMEOUT,
            credentials: None,
        }
    }
}
