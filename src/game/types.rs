//! Type definitions shared by the controller
//!
//! Provides newtypes for board coordinates and the play mode so that raw
//! `u8`/`u32` indices coming from the engine boundary are validated once and
//! carried around with their meaning attached.

use engine_abi::{square_index, AbiError, AbiResult, Side, BOARD_SQUARES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A board square in little-endian rank-file order (a1 = 0, h8 = 63)
///
/// The same index is used for bitboard bit positions and for the 64-byte
/// board snapshot, so a `Square` can address either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const H8: Square = Square(63);

    /// Validate a raw index coming from the engine or the host.
    pub fn new(index: u32) -> AbiResult<Self> {
        square_index(index).map(Square)
    }

    /// Build a square from zero-based file (a = 0) and rank (1 = 0).
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then(|| Square(rank * 8 + file))
    }

    /// Iterate all 64 squares in ascending index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SQUARES as u8).map(Square)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Single-bit bitboard with only this square set.
    pub fn flag(self) -> u64 {
        1u64 << self.0
    }

    /// Upper-case label as drawn on the board ("A1" .. "H8").
    pub fn label(self) -> String {
        format!("{}{}", (b'A' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl TryFrom<u32> for Square {
    type Error = AbiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Square::new(value)
    }
}

impl From<Square> for u32 {
    fn from(square: Square) -> Self {
        square.0 as u32
    }
}

/// Error returned when a square name like `e4` cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid square name: {0:?}")]
pub struct ParseSquareError(pub String);

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(ParseSquareError(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::from_coords(file, rank).ok_or_else(|| ParseSquareError(s.to_string()))
    }
}

/// Who is driving each side of the board
///
/// In `HumanVsEngine` the engine answers automatically whenever it is
/// `engine_side` to move; clicks during that time only move the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlayMode {
    HumanVsHuman,
    HumanVsEngine { engine_side: Side },
}

impl Default for PlayMode {
    fn default() -> Self {
        PlayMode::HumanVsEngine {
            engine_side: Side::Black,
        }
    }
}

impl PlayMode {
    /// Whether the human controls `side`.
    pub fn is_human(&self, side: Side) -> bool {
        match self {
            PlayMode::HumanVsHuman => true,
            PlayMode::HumanVsEngine { engine_side } => *engine_side != side,
        }
    }

    pub fn engine_side(&self) -> Option<Side> {
        match self {
            PlayMode::HumanVsHuman => None,
            PlayMode::HumanVsEngine { engine_side } => Some(*engine_side),
        }
    }
}
