//! Per-board game state and its snapshot encoding

use engine_abi::{PieceCode, PieceKind, Side, WasmPtr, BOARD_SQUARES};
use shakmaty::{Chess, Color, File, Move, Outcome, Position, Role, Square};

/// Everything the engine tracks for one board handle
#[derive(Debug, Clone)]
pub struct BoardState {
    pub position: Chess,
    /// `(from, to)` of the most recent move, as the user would click it
    pub last_move: Option<(Square, Square)>,
    /// Address of this board's 64-byte piece array
    pub snapshot: WasmPtr,
}

impl BoardState {
    pub fn new(snapshot: WasmPtr) -> Self {
        Self {
            position: Chess::default(),
            last_move: None,
            snapshot,
        }
    }

    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.last_move = None;
    }

    /// Play an already-validated move
    pub fn play(&mut self, m: &Move) {
        self.last_move = move_endpoints(m);
        self.position.play_unchecked(m);
    }

    /// Dense piece array, index 0 = a1
    pub fn encode_snapshot(&self) -> [u8; BOARD_SQUARES] {
        let mut out = [0u8; BOARD_SQUARES];
        let board = self.position.board();
        for (index, slot) in out.iter_mut().enumerate() {
            let square = Square::new(index as u32);
            if let Some(piece) = board.piece_at(square) {
                *slot = PieceCode::encode(kind_of(piece.role), side_of(piece.color)).0;
            }
        }
        out
    }

    /// End-of-game text, `None` while the game is still on
    pub fn outcome_message(&self) -> Option<String> {
        let outcome = self.position.outcome()?;
        let text = match outcome {
            Outcome::Decisive { winner } => {
                format!("{} wins by checkmate.", side_of(winner).name())
            }
            Outcome::Draw if self.position.is_stalemate() => "Draw by stalemate.".to_string(),
            Outcome::Draw => "Draw by insufficient material.".to_string(),
        };
        Some(text)
    }
}

/// Origin and destination squares as seen by a user clicking the board
///
/// Castling is reported as the king's two-square hop rather than shakmaty's
/// king-takes-rook form.
pub fn move_endpoints(m: &Move) -> Option<(Square, Square)> {
    match *m {
        Move::Normal { from, to, .. } => Some((from, to)),
        Move::EnPassant { from, to } => Some((from, to)),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                File::G
            } else {
                File::C
            };
            Some((king, Square::from_coords(file, king.rank())))
        }
        Move::Put { .. } => None,
    }
}

pub fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

pub fn color_of(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

pub fn kind_of(role: Role) -> PieceKind {
    match role {
        Role::King => PieceKind::King,
        Role::Queen => PieceKind::Queen,
        Role::Bishop => PieceKind::Bishop,
        Role::Knight => PieceKind::Knight,
        Role::Rook => PieceKind::Rook,
        Role::Pawn => PieceKind::Pawn,
    }
}
