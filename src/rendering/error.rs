//! Error types for rendering

use engine_abi::{PieceKind, Side};
use thiserror::Error;

/// Errors raised while building render resources
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Atlas has no cell for a piece
    #[error("No sprite for {side} {kind:?}")]
    MissingSprite { kind: PieceKind, side: Side },

    /// Atlas cell lies outside the sheet
    #[error("Sprite for {side} {kind:?} at ({column}, {row}) is outside the sheet")]
    SpriteOutOfBounds {
        kind: PieceKind,
        side: Side,
        column: u8,
        row: u8,
    },

    /// Two pieces share one cell
    #[error("Sprite cell ({column}, {row}) is used twice")]
    DuplicateSprite { column: u8, row: u8 },
}

/// Result type alias for rendering
pub type RenderResult<T> = Result<T, RenderError>;
