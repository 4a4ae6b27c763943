//! Error types for game module
//!
//! [`GameError::EngineFatal`] and [`GameError::ProtocolVersionMismatch`] end
//! the session's ability to talk to the engine; everything else is
//! recoverable and leaves the game as it was.

use crate::boundary::MarshalError;
use crate::game::types::Square;

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Engine speaks another protocol version; nothing else was called
    #[error("Engine protocol version {found} does not match expected version {expected}")]
    ProtocolVersionMismatch { expected: i32, found: i32 },

    /// Engine returned an error or a value outside the protocol
    #[error("Engine failure during {operation}: {detail}")]
    EngineFatal {
        operation: &'static str,
        detail: String,
    },

    /// Request text does not fit into its marshalling region
    #[error("Text of {needed} bytes does not fit the {capacity}-byte buffer")]
    MarshallingOverflow { needed: usize, capacity: u32 },

    /// Engine rejected a FEN string; the board is unchanged
    #[error("Engine rejected FEN: {fen}")]
    InvalidFen { fen: String },

    /// Game already ended; restart to play again
    #[error("Game is over: {message}")]
    GameOver { message: String },

    /// An earlier engine failure disabled the session; restart to continue
    #[error("Session disabled after an engine failure; restart to continue")]
    SessionDisabled,

    /// Move submitted for a square that is not the armed selection
    #[error("No piece armed on {from}")]
    NotArmed { from: Square },
}

impl GameError {
    /// Wrap a marshalling failure on engine-provided data as fatal.
    pub fn fatal(operation: &'static str, detail: impl ToString) -> Self {
        GameError::EngineFatal {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Whether this error means the engine can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::EngineFatal { .. } | GameError::ProtocolVersionMismatch { .. }
        )
    }
}

impl From<MarshalError> for GameError {
    fn from(error: MarshalError) -> Self {
        match error {
            MarshalError::Overflow { needed, capacity } => {
                GameError::MarshallingOverflow { needed, capacity }
            }
            other => GameError::fatal("marshalling", other),
        }
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
