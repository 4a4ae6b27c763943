//! Piece sprite atlas
//!
//! The piece sheet is a grid of equally sized cells. [`SpriteAtlas`] maps
//! every (kind, side) pair to a cell and is checked once when built: all
//! twelve pieces present, every cell inside the grid, no two pieces sharing
//! a cell. Lookups afterwards cannot fail.

use crate::rendering::error::{RenderError, RenderResult};
use engine_abi::{PieceKind, Side};

/// Cell position in the sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteOffset {
    pub column: u8,
    pub row: u8,
}

/// Validated (kind, side) to sprite cell table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAtlas {
    cells: [[SpriteOffset; 2]; 6],
}

fn slot(kind: PieceKind) -> usize {
    kind.code() as usize - 1
}

impl SpriteAtlas {
    /// The standard sheet: one column per kind in code order, white on the
    /// top row and black below.
    pub fn standard() -> Self {
        let mut cells = [[SpriteOffset { column: 0, row: 0 }; 2]; 6];
        for kind in PieceKind::ALL {
            for side in Side::ALL {
                cells[slot(kind)][side.index() as usize] = SpriteOffset {
                    column: slot(kind) as u8,
                    row: side.index() as u8,
                };
            }
        }
        Self { cells }
    }

    /// Build a custom atlas, rejecting incomplete or inconsistent tables.
    pub fn from_entries<I>(columns: u8, rows: u8, entries: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = ((PieceKind, Side), SpriteOffset)>,
    {
        let mut table: [[Option<SpriteOffset>; 2]; 6] = [[None; 2]; 6];
        for ((kind, side), offset) in entries {
            if offset.column >= columns || offset.row >= rows {
                return Err(RenderError::SpriteOutOfBounds {
                    kind,
                    side,
                    column: offset.column,
                    row: offset.row,
                });
            }
            table[slot(kind)][side.index() as usize] = Some(offset);
        }

        let mut cells = [[SpriteOffset { column: 0, row: 0 }; 2]; 6];
        let mut seen: Vec<SpriteOffset> = Vec::with_capacity(12);
        for kind in PieceKind::ALL {
            for side in Side::ALL {
                let offset = table[slot(kind)][side.index() as usize]
                    .ok_or(RenderError::MissingSprite { kind, side })?;
                if seen.contains(&offset) {
                    return Err(RenderError::DuplicateSprite {
                        column: offset.column,
                        row: offset.row,
                    });
                }
                seen.push(offset);
                cells[slot(kind)][side.index() as usize] = offset;
            }
        }

        Ok(Self { cells })
    }

    pub fn sprite(&self, kind: PieceKind, side: Side) -> SpriteOffset {
        self.cells[slot(kind)][side.index() as usize]
    }
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_entries() -> Vec<((PieceKind, Side), SpriteOffset)> {
        let atlas = SpriteAtlas::standard();
        PieceKind::ALL
            .into_iter()
            .flat_map(|kind| Side::ALL.into_iter().map(move |side| (kind, side)))
            .map(|key| (key, atlas.sprite(key.0, key.1)))
            .collect()
    }

    #[test]
    fn test_standard_layout() {
        let atlas = SpriteAtlas::standard();
        assert_eq!(
            atlas.sprite(PieceKind::King, Side::White),
            SpriteOffset { column: 0, row: 0 }
        );
        assert_eq!(
            atlas.sprite(PieceKind::Pawn, Side::Black),
            SpriteOffset { column: 5, row: 1 }
        );
        assert_eq!(
            SpriteAtlas::from_entries(6, 2, standard_entries()),
            Ok(atlas)
        );
    }

    #[test]
    fn test_missing_entry() {
        let mut entries = standard_entries();
        entries.retain(|((kind, side), _)| !(*kind == PieceKind::Knight && *side == Side::Black));
        assert_eq!(
            SpriteAtlas::from_entries(6, 2, entries),
            Err(RenderError::MissingSprite {
                kind: PieceKind::Knight,
                side: Side::Black
            })
        );
    }

    #[test]
    fn test_out_of_bounds_and_duplicates() {
        let entries = standard_entries();
        assert!(matches!(
            SpriteAtlas::from_entries(5, 2, entries.clone()),
            Err(RenderError::SpriteOutOfBounds { .. })
        ));

        let mut duplicated = entries;
        duplicated[1].1 = duplicated[0].1;
        assert!(matches!(
            SpriteAtlas::from_entries(6, 2, duplicated),
            Err(RenderError::DuplicateSprite { column: 0, row: 0 })
        ));
    }
}
