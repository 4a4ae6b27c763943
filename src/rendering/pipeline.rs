//! Frame building
//!
//! [`render`] turns the current engine state into a [`Frame`]: a status
//! line, the material balance, the FEN, and an ordered list of
//! [`DrawCommand`]s. It only issues read-only engine queries, so calling it
//! any number of times changes nothing.
//!
//! # Draw order
//!
//! 1. `Clear`
//! 2. Overlay fills for the active [`OverlayMode`]
//! 3. Selection: a small yellow marker on the armed square if it holds a
//!    piece, then small fills on its legal destinations (light blue for a
//!    white piece, red otherwise)
//! 4. Pieces, a1 to h8, each followed by its label when labels are on

use crate::boundary::snapshot::BoardSnapshot;
use crate::game::selection::Selection;
use crate::game::types::Square;
use crate::rendering::bitboard::{classify_pair, squares_of, PairClass};
use crate::rendering::overlay::{OverlayLayer, OverlayMode};
use crate::rendering::sprites::{SpriteAtlas, SpriteOffset};
use engine_abi::{BoardHandle, EngineExports, PieceKind, Side};
use tracing::warn;

/// Named fill colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Red,
    Blue,
    Purple,
    Green,
    Black,
    Yellow,
    LightBlue,
}

/// How far a fill is pulled in from the square's edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inset {
    /// Marker in the middle of the square, 25% in from each edge
    Small,
    /// Nearly the whole square, 5% in from each edge
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    FillSquare {
        square: Square,
        paint: Paint,
        inset: Inset,
    },
    Sprite {
        square: Square,
        kind: PieceKind,
        side: Side,
        sprite: SpriteOffset,
    },
    Label {
        square: Square,
        text: String,
    },
}

/// Everything the host needs to paint one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub status: String,
    pub material_eval: i32,
    pub fen: String,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub show_labels: bool,
}

/// Controller-side state a frame depends on
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub board: BoardHandle,
    pub snapshot: &'a BoardSnapshot,
    pub selection: Selection,
    pub overlay: OverlayMode,
    pub status: &'a str,
    pub fen: &'a str,
}

/// Build the frame for `view`.
pub fn render<E: EngineExports + ?Sized>(
    engine: &E,
    view: &BoardView<'_>,
    atlas: &SpriteAtlas,
    options: RenderOptions,
) -> Frame {
    let mut commands = vec![DrawCommand::Clear];

    push_overlay(&mut commands, view.overlay.layer(engine, view.board));
    if let Some(armed) = view.selection.armed() {
        push_selection(&mut commands, engine, view.board, armed);
    }
    push_pieces(&mut commands, view.snapshot, atlas, options);

    Frame {
        status: view.status.to_string(),
        material_eval: engine.get_material_eval(view.board),
        fen: view.fen.to_string(),
        commands,
    }
}

fn push_overlay(commands: &mut Vec<DrawCommand>, layer: OverlayLayer) {
    match layer {
        OverlayLayer::Empty => {}
        OverlayLayer::Single { mask, paint } => {
            commands.extend(squares_of(mask).map(|square| DrawCommand::FillSquare {
                square,
                paint,
                inset: Inset::Small,
            }));
        }
        OverlayLayer::Pair { white, black } => {
            for (square, class) in classify_pair(white, black).marked() {
                let paint = match class {
                    PairClass::OnlyFirst => Paint::Red,
                    PairClass::OnlySecond => Paint::Blue,
                    PairClass::Both => Paint::Purple,
                    PairClass::None => continue,
                };
                commands.push(DrawCommand::FillSquare {
                    square,
                    paint,
                    inset: Inset::Large,
                });
            }
        }
    }
}

fn push_selection<E: EngineExports + ?Sized>(
    commands: &mut Vec<DrawCommand>,
    engine: &E,
    board: BoardHandle,
    armed: Square,
) {
    let white = engine.get_positions_bb(board, Side::White);
    let black = engine.get_positions_bb(board, Side::Black);
    let flag = armed.flag();

    if (white | black) & flag != 0 {
        commands.push(DrawCommand::FillSquare {
            square: armed,
            paint: Paint::Yellow,
            inset: Inset::Small,
        });
    }

    let paint = if white & flag != 0 {
        Paint::LightBlue
    } else {
        Paint::Red
    };
    let targets = engine.get_possible_moves_bb(board, armed.index() as u32);
    commands.extend(squares_of(targets).map(|square| DrawCommand::FillSquare {
        square,
        paint,
        inset: Inset::Small,
    }));
}

fn push_pieces(
    commands: &mut Vec<DrawCommand>,
    snapshot: &BoardSnapshot,
    atlas: &SpriteAtlas,
    options: RenderOptions,
) {
    for (square, code) in snapshot.iter() {
        match code.decode() {
            Ok(Some((kind, side))) => commands.push(DrawCommand::Sprite {
                square,
                kind,
                side,
                sprite: atlas.sprite(kind, side),
            }),
            Ok(None) => {}
            Err(e) => warn!("[RENDER] Skipping square {}: {}", square, e),
        }
        if options.show_labels {
            commands.push(DrawCommand::Label {
                square,
                text: square.label(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_overlay_paints() {
        let mut commands = Vec::new();
        let a1 = Square::A1;
        let h8 = Square::H8;
        let b1 = Square::from_coords(1, 0).unwrap();
        push_overlay(
            &mut commands,
            OverlayLayer::Pair {
                white: a1.flag() | b1.flag(),
                black: b1.flag() | h8.flag(),
            },
        );
        assert_eq!(
            commands,
            vec![
                DrawCommand::FillSquare {
                    square: a1,
                    paint: Paint::Red,
                    inset: Inset::Large
                },
                DrawCommand::FillSquare {
                    square: b1,
                    paint: Paint::Purple,
                    inset: Inset::Large
                },
                DrawCommand::FillSquare {
                    square: h8,
                    paint: Paint::Blue,
                    inset: Inset::Large
                },
            ]
        );
    }

    #[test]
    fn test_single_overlay_is_small() {
        let mut commands = Vec::new();
        push_overlay(
            &mut commands,
            OverlayLayer::Single {
                mask: Square::H8.flag(),
                paint: Paint::Green,
            },
        );
        assert_eq!(
            commands,
            vec![DrawCommand::FillSquare {
                square: Square::H8,
                paint: Paint::Green,
                inset: Inset::Small
            }]
        );
    }

    #[test]
    fn test_labels_follow_each_square() {
        let mut codes = [engine_abi::PieceCode::EMPTY; 64];
        codes[0] = engine_abi::PieceCode::encode(PieceKind::Rook, Side::White);
        codes[1] = engine_abi::PieceCode(0xfe);
        let snapshot = BoardSnapshot::from_codes(codes);

        let mut commands = Vec::new();
        push_pieces(
            &mut commands,
            &snapshot,
            &SpriteAtlas::standard(),
            RenderOptions { show_labels: true },
        );

        assert_eq!(commands.len(), 65);
        assert!(matches!(
            commands[0],
            DrawCommand::Sprite {
                kind: PieceKind::Rook,
                side: Side::White,
                ..
            }
        ));
        assert_eq!(
            commands[1],
            DrawCommand::Label {
                square: Square::A1,
                text: "A1".to_string()
            }
        );
        // the invalid byte on b1 only yields its label
        assert_eq!(
            commands[2],
            DrawCommand::Label {
                square: Square::from_coords(1, 0).unwrap(),
                text: "B1".to_string()
            }
        );
    }
}
