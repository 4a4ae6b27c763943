//! The engine's exported call surface
//!
//! Mirrors the function table a WebAssembly chess engine exports. Calls that
//! can change game state take `&mut self`; bitboard and turn queries take
//! `&self` and are safe to issue at any time, any number of times.
//!
//! Text never crosses the boundary as a Rust `String`. The caller writes
//! bytes into a region it previously obtained from [`EngineExports::alloc`]
//! and passes `(ptr, len)`; the engine writes back into a region and returns
//! a length. The controller side of that dance lives in the controller's
//! marshaller.

use crate::piece::Side;

/// Address inside the engine's linear memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WasmPtr(pub u32);

impl WasmPtr {
    pub const NULL: WasmPtr = WasmPtr(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn offset(self) -> usize {
        self.0 as usize
    }
}

/// Opaque reference to engine-owned game state
///
/// Zero is never a valid handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardHandle(pub u32);

impl BoardHandle {
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Function table exported by an engine
pub trait EngineExports {
    /// The engine's whole linear memory
    fn memory(&self) -> &[u8];

    /// Mutable view of the linear memory, for writing request text
    fn memory_mut(&mut self) -> &mut [u8];

    /// Protocol version the engine speaks
    fn protocol_version(&self) -> i32;

    /// One-time initialisation, called after the version check
    fn setup(&mut self);

    /// Reserve `capacity` bytes; [`WasmPtr::NULL`] when memory is exhausted
    fn alloc(&mut self, capacity: u32) -> WasmPtr;

    /// Create a board at the initial position
    fn create_board(&mut self) -> BoardHandle;

    /// Reset `board` to the initial position, returning the handle to use afterwards
    fn restart_game(&mut self, board: BoardHandle) -> BoardHandle;

    /// Load the FEN text at `fen[..len]`; `false` when the engine rejects it
    fn set_from_fen(&mut self, board: BoardHandle, fen: WasmPtr, len: u32) -> bool;

    /// Write the position's FEN into `out`; bytes written, 0 on failure
    fn get_fen(&mut self, board: BoardHandle, out: WasmPtr, capacity: u32) -> u32;

    /// Attempt a move between two square indices, see `codes` for the result
    fn play_human_move(
        &mut self,
        board: BoardHandle,
        from: u32,
        to: u32,
        msg: WasmPtr,
        msg_capacity: u32,
    ) -> i32;

    /// Search and play the engine's own move. May block for a long time.
    fn play_bot_move(&mut self, board: BoardHandle, msg: WasmPtr, msg_capacity: u32) -> i32;

    /// Forward search limits. Values are not interpreted by the caller.
    fn change_settings(&mut self, max_time_ms: u32, max_depth: u32);

    fn is_white_turn(&self, board: BoardHandle) -> bool;

    /// Material balance from white's point of view
    fn get_material_eval(&self, board: BoardHandle) -> i32;

    fn get_positions_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn get_kings_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn get_castling_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn get_last_move_bb(&self, board: BoardHandle) -> u64;

    /// En-passant target square, if any
    fn get_french_move_bb(&self, board: BoardHandle) -> u64;

    fn get_attack_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn sliding_checks_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn pins_by_bishop_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn pins_by_rook_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn pins_french_by_bishop_bb(&self, board: BoardHandle, side: Side) -> u64;
    fn pins_french_by_rook_bb(&self, board: BoardHandle, side: Side) -> u64;

    /// Legal destinations of the piece on `square`
    fn get_possible_moves_bb(&self, board: BoardHandle, square: u32) -> u64;

    /// Base address of the board's dense 64-byte piece array
    ///
    /// The bytes behind it change on every mutating call.
    fn get_board_data(&self, board: BoardHandle) -> WasmPtr;
}
