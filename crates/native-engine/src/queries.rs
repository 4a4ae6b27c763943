//! Read-only bitboard queries behind the overlay calls
//!
//! Every function answers for one side: "pins" are pins against that side's
//! king, "sliding checks" are check rays aimed at that side's king.

use crate::board::{color_of, move_endpoints, BoardState};
use engine_abi::Side;
use shakmaty::{attacks, Bitboard, Chess, Color, EnPassantMode, Position, Square};

pub fn positions(position: &Chess, side: Side) -> Bitboard {
    position.board().by_color(color_of(side))
}

pub fn kings(position: &Chess, side: Side) -> Bitboard {
    let board = position.board();
    board.kings() & board.by_color(color_of(side))
}

/// Rooks that still carry castling rights
pub fn castling(position: &Chess, side: Side) -> Bitboard {
    position.castles().castling_rights() & position.board().by_color(color_of(side))
}

pub fn last_move(state: &BoardState) -> Bitboard {
    match state.last_move {
        Some((from, to)) => Bitboard::from_square(from) | Bitboard::from_square(to),
        None => Bitboard::EMPTY,
    }
}

pub fn en_passant_target(position: &Chess) -> Bitboard {
    position
        .ep_square(EnPassantMode::Legal)
        .map_or(Bitboard::EMPTY, Bitboard::from_square)
}

/// Every square attacked by at least one piece of `side`
pub fn attacked_by(position: &Chess, side: Side) -> Bitboard {
    let board = position.board();
    board
        .by_color(color_of(side))
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, sq| acc | board.attacks_from(sq))
}

/// Rays of enemy sliders currently giving check to `side`'s king
pub fn sliding_checks(position: &Chess, side: Side) -> Bitboard {
    let board = position.board();
    let us = color_of(side);
    let Some(king) = board.king_of(us) else {
        return Bitboard::EMPTY;
    };
    let sliders = (board.bishops() | board.rooks() | board.queens()) & board.by_color(!us);
    sliders
        .into_iter()
        .filter(|&slider| board.attacks_from(slider).contains(king))
        .fold(Bitboard::EMPTY, |acc, slider| {
            acc | attacks::between(king, slider) | Bitboard::from_square(slider)
        })
}

#[derive(Debug, Clone, Copy)]
enum Line {
    Diagonal,
    Orthogonal,
}

impl Line {
    fn rays(self, square: Square, occupied: Bitboard) -> Bitboard {
        match self {
            Line::Diagonal => attacks::bishop_attacks(square, occupied),
            Line::Orthogonal => attacks::rook_attacks(square, occupied),
        }
    }

    fn sliders(self, position: &Chess, color: Color) -> Bitboard {
        let board = position.board();
        let movers = match self {
            Line::Diagonal => board.bishops() | board.queens(),
            Line::Orthogonal => board.rooks() | board.queens(),
        };
        movers & board.by_color(color)
    }
}

fn pins(position: &Chess, side: Side, line: Line) -> Bitboard {
    let board = position.board();
    let us = color_of(side);
    let Some(king) = board.king_of(us) else {
        return Bitboard::EMPTY;
    };
    let snipers = line.rays(king, Bitboard::EMPTY) & line.sliders(position, !us);
    let mut pinned = Bitboard::EMPTY;
    for sniper in snipers {
        let ray = attacks::between(king, sniper);
        let blockers = ray & board.occupied();
        if blockers.count() == 1 && (blockers & board.by_color(us)).any() {
            pinned |= ray | Bitboard::from_square(sniper);
        }
    }
    pinned
}

pub fn pins_by_bishop(position: &Chess, side: Side) -> Bitboard {
    pins(position, side, Line::Diagonal)
}

pub fn pins_by_rook(position: &Chess, side: Side) -> Bitboard {
    pins(position, side, Line::Orthogonal)
}

/// Lines that would open onto `side`'s king if `side` captured en passant
///
/// An en-passant capture removes two pawns from the board at once, which can
/// expose the king along a line no ordinary pin detection covers.
fn en_passant_pins(position: &Chess, side: Side, line: Line) -> Bitboard {
    let board = position.board();
    let us = color_of(side);
    if position.turn() != us {
        return Bitboard::EMPTY;
    }
    let (Some(king), Some(target)) = (board.king_of(us), position.maybe_ep_square()) else {
        return Bitboard::EMPTY;
    };
    let capturers = attacks::pawn_attacks(!us, target) & board.pawns() & board.by_color(us);
    let victim_rank = match us {
        Color::White => target.rank().offset(-1),
        Color::Black => target.rank().offset(1),
    };
    let Some(victim_rank) = victim_rank else {
        return Bitboard::EMPTY;
    };
    let victim = Square::from_coords(target.file(), victim_rank);

    let mut exposed = Bitboard::EMPTY;
    for capturer in capturers {
        let occupied = (board.occupied() ^ Bitboard::from_square(capturer) ^ Bitboard::from_square(victim))
            | Bitboard::from_square(target);
        let snipers = line.rays(king, occupied) & line.sliders(position, !us);
        for sniper in snipers {
            exposed |= attacks::between(king, sniper) | Bitboard::from_square(sniper);
        }
    }
    exposed
}

pub fn pins_en_passant_by_bishop(position: &Chess, side: Side) -> Bitboard {
    en_passant_pins(position, side, Line::Diagonal)
}

pub fn pins_en_passant_by_rook(position: &Chess, side: Side) -> Bitboard {
    en_passant_pins(position, side, Line::Orthogonal)
}

/// Legal destinations of whatever stands on `square`
pub fn possible_moves(position: &Chess, square: Square) -> Bitboard {
    position
        .legal_moves()
        .iter()
        .filter_map(move_endpoints)
        .filter(|(from, _)| *from == square)
        .fold(Bitboard::EMPTY, |acc, (_, to)| acc | Bitboard::from_square(to))
}
