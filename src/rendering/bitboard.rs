//! Bitboard decoding
//!
//! Engine queries answer with a `u64` where bit `i` means square `i`.
//! [`squares_of`] walks the set bits lowest first without allocating, and
//! [`classify_pair`] merges a white and a black mask into one per-square
//! class so the overlay can colour squares claimed by both sides.

use crate::game::types::Square;
use engine_abi::BOARD_SQUARES;

/// Lazy iterator over the squares of a bitboard, ascending
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Square::new(index).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

/// Every square whose bit is set in `mask`, lowest index first.
pub fn squares_of(mask: u64) -> Squares {
    Squares(mask)
}

/// Membership of a square in a pair of masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairClass {
    #[default]
    None,
    OnlyFirst,
    OnlySecond,
    Both,
}

/// Per-square classification of two masks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairClassification([PairClass; BOARD_SQUARES]);

impl PairClassification {
    pub fn class_of(&self, square: Square) -> PairClass {
        self.0[square.index() as usize]
    }

    /// Squares that are in at least one mask, with their class
    pub fn marked(&self) -> impl Iterator<Item = (Square, PairClass)> + '_ {
        Square::all()
            .map(|square| (square, self.class_of(square)))
            .filter(|(_, class)| *class != PairClass::None)
    }
}

/// Classify each square by its membership in `first` and `second`.
pub fn classify_pair(first: u64, second: u64) -> PairClassification {
    let mut classes = [PairClass::None; BOARD_SQUARES];
    for square in squares_of(first | second) {
        let flag = square.flag();
        classes[square.index() as usize] = match (first & flag != 0, second & flag != 0) {
            (true, true) => PairClass::Both,
            (true, false) => PairClass::OnlyFirst,
            (false, true) => PairClass::OnlySecond,
            (false, false) => PairClass::None,
        };
    }
    PairClassification(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares_ascending() {
        let squares: Vec<u8> = squares_of(0x8000_0000_0000_0101).map(Square::index).collect();
        assert_eq!(squares, vec![0, 8, 63]);
        assert_eq!(squares_of(0).count(), 0);
        assert_eq!(squares_of(u64::MAX).len(), 64);
    }

    #[test]
    fn test_classify_pair() {
        let a1 = Square::A1;
        let b1 = Square::from_coords(1, 0).unwrap();
        let c1 = Square::from_coords(2, 0).unwrap();
        let h8 = Square::H8;

        let classes = classify_pair(a1.flag() | c1.flag(), b1.flag() | c1.flag());
        assert_eq!(classes.class_of(a1), PairClass::OnlyFirst);
        assert_eq!(classes.class_of(b1), PairClass::OnlySecond);
        assert_eq!(classes.class_of(c1), PairClass::Both);
        assert_eq!(classes.class_of(h8), PairClass::None);
        assert_eq!(classes.marked().count(), 3);
    }
}
