//! Engine ABI - the narrow, versioned contract between the board controller
//! and a chess engine living behind a linear memory boundary
//!
//! Everything that crosses the boundary is one of:
//! - a 32-bit address into the engine's linear memory ([`WasmPtr`])
//! - an opaque board handle ([`BoardHandle`])
//! - a signed result code (see [`codes`])
//! - a 64-bit occupancy mask, bit `i` set iff square `i` is a member
//!   (rank = i / 8, file = i % 8, 0 = a1)
//! - a per-square piece byte (see [`piece`])
//!
//! # Protocol version
//!
//! Controllers pin [`PROTOCOL_VERSION`] and refuse to talk to an engine that
//! reports any other value. Result-code meanings differ between versions, so
//! guessing is never safe.

pub mod codes;
pub mod error;
pub mod exports;
pub mod piece;

pub use codes::{ENGINE_ERROR, ENGINE_ILLEGAL_MOVE, ENGINE_OK, PROTOCOL_VERSION};
pub use error::{AbiError, AbiResult};
pub use exports::{BoardHandle, EngineExports, WasmPtr};
pub use piece::{PieceCode, PieceKind, Side};

/// Number of squares on the board and entries in a board snapshot
pub const BOARD_SQUARES: usize = 64;

/// Validate a raw square index (0 = a1, 63 = h8)
pub fn square_index(raw: u32) -> AbiResult<u8> {
    if (raw as usize) < BOARD_SQUARES {
        Ok(raw as u8)
    } else {
        Err(AbiError::InvalidSquare { square: raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_index_bounds() {
        assert_eq!(square_index(0).unwrap(), 0);
        assert_eq!(square_index(63).unwrap(), 63);
        assert!(matches!(
            square_index(64),
            Err(AbiError::InvalidSquare { square: 64 })
        ));
    }
}
