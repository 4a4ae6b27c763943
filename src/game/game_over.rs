//! Game over message tracking
//!
//! When a move ends the game the engine writes a human-readable verdict
//! ("Black wins by checkmate.") into the message region and returns its
//! length. The session copies it into a [`GameOverMessage`] immediately,
//! since the region is reused by the next call, and keeps it until restart.
//! While one is held every move attempt is refused without asking the engine.

use std::fmt;

/// Verdict text copied out of engine memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverMessage(String);

impl GameOverMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameOverMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
