//! Per-square piece byte encoding used by the board snapshot
//!
//! ```text
//! 0                 empty square
//! (kind << 1) | side  occupied square
//! ```
//!
//! `side` is 0 for white and 1 for black. `kind` runs 1..=6 in sprite-sheet
//! column order: King, Queen, Bishop, Knight, Rook, Pawn.

use crate::error::{AbiError, AbiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side to move / piece colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::White, Side::Black];

    /// Raw selector passed across the boundary
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    pub fn from_index(raw: u32) -> AbiResult<Side> {
        match raw {
            0 => Ok(Side::White),
            1 => Ok(Side::Black),
            side => Err(AbiError::InvalidSide { side }),
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece kinds in boundary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Pawn,
    ];

    /// Kind number as encoded in the upper bits of a piece byte (1..=6)
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            PieceKind::King => 1,
            PieceKind::Queen => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Rook => 5,
            PieceKind::Pawn => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Lowercase FEN-style letter
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Pawn => 'p',
        }
    }
}

/// A raw snapshot byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceCode(pub u8);

impl PieceCode {
    pub const EMPTY: PieceCode = PieceCode(0);

    pub fn encode(kind: PieceKind, side: Side) -> PieceCode {
        PieceCode((kind.code() << 1) | side.index() as u8)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decode into `(kind, side)`; `Ok(None)` for an empty square
    pub fn decode(self) -> AbiResult<Option<(PieceKind, Side)>> {
        if self.is_empty() {
            return Ok(None);
        }
        let kind = PieceKind::from_code(self.0 >> 1)
            .ok_or(AbiError::InvalidPieceCode { byte: self.0 })?;
        let side = if self.0 & 1 == 0 { Side::White } else { Side::Black };
        Ok(Some((kind, side)))
    }
}
