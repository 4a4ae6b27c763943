//! Two-click move selection
//!
//! ```text
//! Idle        --click(s)------------------------> Armed(s)
//! Armed(a)    --click(b), opponent's turn-------> Armed(b)
//! Armed(a)    --click(b), human's turn----------> attempt a -> b
//!   attempt accepted or game over --------------> Idle
//!   attempt illegal ----------------------------> Armed(b)
//! ```
//!
//! The machine itself never talks to the engine. [`Selection::click`] says
//! whether a move should be attempted; the session reports the verdict back
//! through [`Selection::move_played`] or [`Selection::move_rejected`].

use crate::game::types::Square;

/// Current click selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed(Square),
}

/// What a click asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Selection moved to this square, nothing else happens
    Armed(Square),
    /// Try to play a move; the selection stays on `from` until settled
    Attempt { from: Square, to: Square },
}

impl Selection {
    pub fn armed(&self) -> Option<Square> {
        match self {
            Selection::Idle => None,
            Selection::Armed(square) => Some(*square),
        }
    }

    /// Feed a click on `square`. `human_turn` is false while the engine is
    /// to move or the game is over.
    pub fn click(&mut self, square: Square, human_turn: bool) -> ClickAction {
        match *self {
            Selection::Armed(from) if human_turn => ClickAction::Attempt { from, to: square },
            _ => {
                *self = Selection::Armed(square);
                ClickAction::Armed(square)
            }
        }
    }

    /// The attempted move was played.
    pub fn move_played(&mut self) {
        *self = Selection::Idle;
    }

    /// The attempted move was illegal; the destination becomes the new
    /// selection.
    pub fn move_rejected(&mut self, to: Square) {
        *self = Selection::Armed(to);
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }
}
