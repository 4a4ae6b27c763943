//! Debug overlays
//!
//! Each [`OverlayMode`] names one family of engine bitboard queries. Modes
//! that exist per side query both sides and are drawn as a pair (white only,
//! black only, both); the rest are a single mask with a fixed paint.

use crate::rendering::pipeline::Paint;
use engine_abi::{BoardHandle, EngineExports, Side};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which bitboard family to visualise behind the pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayMode {
    #[default]
    None,
    All,
    Kings,
    Castling,
    LastMove,
    EnPassant,
    Attacks,
    SlidingChecks,
    BishopPins,
    RookPins,
    EnPassantBishopPins,
    EnPassantRookPins,
}

/// Masks to paint for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLayer {
    Empty,
    Single { mask: u64, paint: Paint },
    Pair { white: u64, black: u64 },
}

impl OverlayMode {
    pub const ALL: [OverlayMode; 12] = [
        OverlayMode::None,
        OverlayMode::All,
        OverlayMode::Kings,
        OverlayMode::Castling,
        OverlayMode::LastMove,
        OverlayMode::EnPassant,
        OverlayMode::Attacks,
        OverlayMode::SlidingChecks,
        OverlayMode::BishopPins,
        OverlayMode::RookPins,
        OverlayMode::EnPassantBishopPins,
        OverlayMode::EnPassantRookPins,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlayMode::None => "none",
            OverlayMode::All => "all",
            OverlayMode::Kings => "kings",
            OverlayMode::Castling => "castling",
            OverlayMode::LastMove => "last-move",
            OverlayMode::EnPassant => "en-passant",
            OverlayMode::Attacks => "attacks",
            OverlayMode::SlidingChecks => "sliding-checks",
            OverlayMode::BishopPins => "bishop-pins",
            OverlayMode::RookPins => "rook-pins",
            OverlayMode::EnPassantBishopPins => "en-passant-bishop-pins",
            OverlayMode::EnPassantRookPins => "en-passant-rook-pins",
        }
    }

    /// Issue the read-only queries behind this mode.
    pub fn layer<E: EngineExports + ?Sized>(self, engine: &E, board: BoardHandle) -> OverlayLayer {
        let pair = |query: fn(&E, BoardHandle, Side) -> u64| OverlayLayer::Pair {
            white: query(engine, board, Side::White),
            black: query(engine, board, Side::Black),
        };
        match self {
            OverlayMode::None => OverlayLayer::Empty,
            OverlayMode::All => pair(E::get_positions_bb),
            OverlayMode::Kings => pair(E::get_kings_bb),
            OverlayMode::Castling => pair(E::get_castling_bb),
            OverlayMode::LastMove => OverlayLayer::Single {
                mask: engine.get_last_move_bb(board),
                paint: Paint::Green,
            },
            OverlayMode::EnPassant => OverlayLayer::Single {
                mask: engine.get_french_move_bb(board),
                paint: Paint::Black,
            },
            OverlayMode::Attacks => pair(E::get_attack_bb),
            OverlayMode::SlidingChecks => pair(E::sliding_checks_bb),
            OverlayMode::BishopPins => pair(E::pins_by_bishop_bb),
            OverlayMode::RookPins => pair(E::pins_by_rook_bb),
            OverlayMode::EnPassantBishopPins => pair(E::pins_french_by_bishop_bb),
            OverlayMode::EnPassantRookPins => pair(E::pins_french_by_rook_bb),
        }
    }
}

impl fmt::Display for OverlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown overlay name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown overlay mode {0:?}")]
pub struct ParseOverlayError(pub String);

impl FromStr for OverlayMode {
    type Err = ParseOverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OverlayMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseOverlayError(s.to_string()))
    }
}
