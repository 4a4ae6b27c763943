//! Error types for values decoded off the engine boundary

use thiserror::Error;

/// Errors raised while interpreting raw boundary values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Square index outside 0..64
    #[error("Invalid square index: {square} (must be 0-63)")]
    InvalidSquare { square: u32 },

    /// Side selector other than 0 (white) or 1 (black)
    #[error("Invalid side selector: {side}")]
    InvalidSide { side: u32 },

    /// Snapshot byte that does not encode a piece
    #[error("Invalid piece byte: {byte}")]
    InvalidPieceCode { byte: u8 },
}

/// Result type alias for boundary decoding
pub type AbiResult<T> = Result<T, AbiError>;
