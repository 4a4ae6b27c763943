//! Copy of the engine's 64-byte board array
//!
//! The engine mutates its board bytes on every game call, so the controller
//! reads a fresh [`BoardSnapshot`] each time it renders and never keeps one
//! across engine calls.

use crate::boundary::error::MarshalResult;
use crate::boundary::marshaller::read_bytes;
use crate::game::types::Square;
use engine_abi::{AbiResult, PieceCode, PieceKind, Side, WasmPtr, BOARD_SQUARES};

/// One piece byte per square, a1 first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    codes: [PieceCode; BOARD_SQUARES],
}

impl BoardSnapshot {
    /// Read 64 bytes at `base`.
    pub fn read(memory: &[u8], base: WasmPtr) -> MarshalResult<Self> {
        let bytes = read_bytes(memory, base, BOARD_SQUARES)?;
        let mut codes = [PieceCode::EMPTY; BOARD_SQUARES];
        for (code, byte) in codes.iter_mut().zip(bytes) {
            *code = PieceCode(byte);
        }
        Ok(Self { codes })
    }

    pub fn from_codes(codes: [PieceCode; BOARD_SQUARES]) -> Self {
        Self { codes }
    }

    pub fn code(&self, square: Square) -> PieceCode {
        self.codes[square.index() as usize]
    }

    /// Decoded piece on `square`; an error for a byte that encodes no piece
    pub fn piece(&self, square: Square) -> AbiResult<Option<(PieceKind, Side)>> {
        self.code(square).decode()
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        !self.code(square).is_empty()
    }

    /// Every square with its raw byte, a1 to h8
    pub fn iter(&self) -> impl Iterator<Item = (Square, PieceCode)> + '_ {
        Square::all().zip(self.codes.iter().copied())
    }
}
