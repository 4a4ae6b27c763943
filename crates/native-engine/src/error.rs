//! Error types for the native engine
//!
//! None of these cross the boundary. The export layer logs them and answers
//! with the protocol's error sentinel (or a zero / `false` return).

use engine_abi::AbiError;
use thiserror::Error;

/// Errors that can occur inside the native engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Handle does not name a live board
    #[error("Unknown board handle: {handle}")]
    InvalidHandle { handle: u32 },

    /// Boundary value could not be decoded
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Pointer/length pair reaches past the end of linear memory
    #[error("Memory access out of bounds: {ptr}+{len} (memory size {size})")]
    OutOfBounds { ptr: u32, len: u32, size: usize },

    /// Game-over text does not fit the caller's message region
    #[error("Message of {len} bytes does not fit in {capacity} bytes")]
    MessageTooLong { len: usize, capacity: u32 },

    /// FEN text rejected
    #[error("Invalid FEN: {message}")]
    InvalidFen { message: String },
}

/// Result type alias for native engine operations
pub type EngineResult<T> = Result<T, EngineError>;
