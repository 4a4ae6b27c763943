//! Native chess engine behind the linear-memory ABI
//!
//! Implements [`EngineExports`] in-process so the board controller can be
//! driven without a WebAssembly runtime: the "linear memory" is an owned
//! byte buffer, board handles index an internal table, and every failure is
//! reported through the same sentinels a compiled engine would return.
//!
//! # Example
//!
//! ```rust
//! use engine_abi::{EngineExports, PROTOCOL_VERSION};
//! use native_engine::NativeEngine;
//!
//! let mut engine = NativeEngine::new();
//! assert_eq!(engine.protocol_version(), PROTOCOL_VERSION);
//! let board = engine.create_board();
//! assert!(engine.is_white_turn(board));
//! ```

pub mod board;
pub mod error;
pub mod evaluation;
pub mod memory;
pub mod queries;
pub mod search;

use board::{move_endpoints, BoardState};
use engine_abi::codes::game_over_code;
use engine_abi::{
    square_index, BoardHandle, EngineExports, Side, WasmPtr, BOARD_SQUARES, ENGINE_ERROR,
    ENGINE_ILLEGAL_MOVE, ENGINE_OK, PROTOCOL_VERSION,
};
use error::{EngineError, EngineResult};
use memory::LinearMemory;
use search::{find_best_move, SearchLimits};
use shakmaty::fen::Fen;
use shakmaty::{Bitboard, CastlingMode, Chess, EnPassantMode, Move, Position, Role, Square};
use tracing::{debug, info, warn};
use web_time::Instant;

/// In-process engine instance
#[derive(Debug)]
pub struct NativeEngine {
    memory: LinearMemory,
    boards: Vec<BoardState>,
    limits: SearchLimits,
    protocol_version: i32,
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::with_memory(LinearMemory::default())
    }

    pub fn with_memory(memory: LinearMemory) -> Self {
        Self {
            memory,
            boards: Vec::new(),
            limits: SearchLimits::default(),
            protocol_version: PROTOCOL_VERSION,
        }
    }

    /// Report a different protocol version, for exercising controller startup checks
    pub fn with_protocol_version(mut self, version: i32) -> Self {
        self.protocol_version = version;
        self
    }

    fn board(&self, handle: BoardHandle) -> EngineResult<&BoardState> {
        (handle.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.boards.get(index))
            .ok_or(EngineError::InvalidHandle { handle: handle.0 })
    }

    fn board_mut(&mut self, handle: BoardHandle) -> EngineResult<&mut BoardState> {
        (handle.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.boards.get_mut(index))
            .ok_or(EngineError::InvalidHandle { handle: handle.0 })
    }

    /// Rewrite the board's dense piece array after a state change
    fn sync_snapshot(&mut self, handle: BoardHandle) -> EngineResult<()> {
        let state = self.board(handle)?;
        let bytes = state.encode_snapshot();
        let ptr = state.snapshot;
        self.memory
            .slice_mut(ptr, BOARD_SQUARES as u32)?
            .copy_from_slice(&bytes);
        Ok(())
    }

    fn write_message(&mut self, text: &str, msg: WasmPtr, capacity: u32) -> EngineResult<i32> {
        let bytes = text.as_bytes();
        if bytes.len() > capacity as usize {
            return Err(EngineError::MessageTooLong {
                len: bytes.len(),
                capacity,
            });
        }
        self.memory
            .slice_mut(msg, bytes.len() as u32)?
            .copy_from_slice(bytes);
        Ok(game_over_code(bytes.len()))
    }

    /// Result code for the position after a move (or before one, if already over)
    fn report(&mut self, handle: BoardHandle, msg: WasmPtr, capacity: u32) -> EngineResult<i32> {
        match self.board(handle)?.outcome_message() {
            Some(text) => {
                info!("[ENGINE] Game over: {}", text);
                self.write_message(&text, msg, capacity)
            }
            None => Ok(ENGINE_OK),
        }
    }

    fn try_human_move(
        &mut self,
        handle: BoardHandle,
        from: u32,
        to: u32,
        msg: WasmPtr,
        capacity: u32,
    ) -> EngineResult<i32> {
        let from = Square::new(u32::from(square_index(from)?));
        let to = Square::new(u32::from(square_index(to)?));

        let state = self.board(handle)?;
        if state.outcome_message().is_some() {
            return self.report(handle, msg, capacity);
        }

        let candidates: Vec<Move> = state
            .position
            .legal_moves()
            .into_iter()
            .filter(|m| move_endpoints(m) == Some((from, to)))
            .collect();
        let chosen = candidates
            .iter()
            .find(|m| m.promotion() == Some(Role::Queen))
            .or_else(|| candidates.first())
            .cloned();

        let Some(chosen) = chosen else {
            debug!("[ENGINE] Rejected move {} -> {}", from, to);
            return Ok(ENGINE_ILLEGAL_MOVE);
        };

        self.board_mut(handle)?.play(&chosen);
        self.sync_snapshot(handle)?;
        self.report(handle, msg, capacity)
    }

    fn try_bot_move(&mut self, handle: BoardHandle, msg: WasmPtr, capacity: u32) -> EngineResult<i32> {
        let state = self.board(handle)?;
        if state.outcome_message().is_some() {
            return self.report(handle, msg, capacity);
        }

        let start = Instant::now();
        let Some(result) = find_best_move(&state.position, self.limits) else {
            return self.report(handle, msg, capacity);
        };
        info!(
            "[ENGINE] Search: score={} depth={} nodes={} time={}ms",
            result.score,
            result.depth,
            result.nodes,
            start.elapsed().as_millis()
        );

        self.board_mut(handle)?.play(&result.best_move);
        self.sync_snapshot(handle)?;
        self.report(handle, msg, capacity)
    }

    fn try_set_from_fen(&mut self, handle: BoardHandle, fen: WasmPtr, len: u32) -> EngineResult<()> {
        let text = self.memory.slice(fen, len)?;
        let parsed = Fen::from_ascii(text).map_err(|e| EngineError::InvalidFen {
            message: e.to_string(),
        })?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| EngineError::InvalidFen {
                message: e.to_string(),
            })?;
        let state = self.board_mut(handle)?;
        state.position = position;
        state.last_move = None;
        self.sync_snapshot(handle)
    }

    fn try_get_fen(&mut self, handle: BoardHandle, out: WasmPtr, capacity: u32) -> EngineResult<u32> {
        let text = Fen::from_position(self.board(handle)?.position.clone(), EnPassantMode::Legal)
            .to_string();
        let bytes = text.as_bytes();
        if bytes.len() > capacity as usize {
            return Err(EngineError::MessageTooLong {
                len: bytes.len(),
                capacity,
            });
        }
        self.memory
            .slice_mut(out, bytes.len() as u32)?
            .copy_from_slice(bytes);
        Ok(bytes.len() as u32)
    }

    fn query(&self, handle: BoardHandle, f: impl FnOnce(&BoardState) -> Bitboard) -> u64 {
        match self.board(handle) {
            Ok(state) => f(state).0,
            Err(e) => {
                warn!("[ENGINE] Query failed: {}", e);
                0
            }
        }
    }
}

/// Collapse an internal failure into the protocol's error sentinel
fn code_or_error(result: EngineResult<i32>) -> i32 {
    result.unwrap_or_else(|e| {
        warn!("[ENGINE] {}", e);
        ENGINE_ERROR
    })
}

impl EngineExports for NativeEngine {
    fn memory(&self) -> &[u8] {
        self.memory.bytes()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.bytes_mut()
    }

    fn protocol_version(&self) -> i32 {
        self.protocol_version
    }

    fn setup(&mut self) {
        debug!("[ENGINE] Setup complete, {} bytes of memory", self.memory.bytes().len());
    }

    fn alloc(&mut self, capacity: u32) -> WasmPtr {
        self.memory.alloc(capacity as usize).unwrap_or_else(|| {
            warn!("[ENGINE] Out of memory allocating {} bytes", capacity);
            WasmPtr::NULL
        })
    }

    fn create_board(&mut self) -> BoardHandle {
        let Some(snapshot) = self.memory.alloc(BOARD_SQUARES) else {
            warn!("[ENGINE] Out of memory creating board");
            return BoardHandle(0);
        };
        self.boards.push(BoardState::new(snapshot));
        let handle = BoardHandle(self.boards.len() as u32);
        if let Err(e) = self.sync_snapshot(handle) {
            warn!("[ENGINE] {}", e);
            return BoardHandle(0);
        }
        handle
    }

    fn restart_game(&mut self, board: BoardHandle) -> BoardHandle {
        let restarted = self
            .board_mut(board)
            .map(BoardState::reset)
            .and_then(|_| self.sync_snapshot(board));
        match restarted {
            Ok(()) => board,
            Err(e) => {
                warn!("[ENGINE] Restart failed: {}", e);
                BoardHandle(0)
            }
        }
    }

    fn set_from_fen(&mut self, board: BoardHandle, fen: WasmPtr, len: u32) -> bool {
        match self.try_set_from_fen(board, fen, len) {
            Ok(()) => true,
            Err(e) => {
                debug!("[ENGINE] {}", e);
                false
            }
        }
    }

    fn get_fen(&mut self, board: BoardHandle, out: WasmPtr, capacity: u32) -> u32 {
        self.try_get_fen(board, out, capacity).unwrap_or_else(|e| {
            warn!("[ENGINE] {}", e);
            0
        })
    }

    fn play_human_move(
        &mut self,
        board: BoardHandle,
        from: u32,
        to: u32,
        msg: WasmPtr,
        msg_capacity: u32,
    ) -> i32 {
        code_or_error(self.try_human_move(board, from, to, msg, msg_capacity))
    }

    fn play_bot_move(&mut self, board: BoardHandle, msg: WasmPtr, msg_capacity: u32) -> i32 {
        code_or_error(self.try_bot_move(board, msg, msg_capacity))
    }

    fn change_settings(&mut self, max_time_ms: u32, max_depth: u32) {
        self.limits = SearchLimits {
            max_time_ms,
            max_depth,
        };
        debug!("[ENGINE] Limits now {:?}", self.limits);
    }

    fn is_white_turn(&self, board: BoardHandle) -> bool {
        self.board(board)
            .map(|state| state.position.turn().is_white())
            .unwrap_or(false)
    }

    fn get_material_eval(&self, board: BoardHandle) -> i32 {
        self.board(board)
            .map(|state| evaluation::material_eval(state.position.board()))
            .unwrap_or(0)
    }

    fn get_positions_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::positions(&s.position, side))
    }

    fn get_kings_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::kings(&s.position, side))
    }

    fn get_castling_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::castling(&s.position, side))
    }

    fn get_last_move_bb(&self, board: BoardHandle) -> u64 {
        self.query(board, queries::last_move)
    }

    fn get_french_move_bb(&self, board: BoardHandle) -> u64 {
        self.query(board, |s| queries::en_passant_target(&s.position))
    }

    fn get_attack_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::attacked_by(&s.position, side))
    }

    fn sliding_checks_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::sliding_checks(&s.position, side))
    }

    fn pins_by_bishop_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::pins_by_bishop(&s.position, side))
    }

    fn pins_by_rook_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::pins_by_rook(&s.position, side))
    }

    fn pins_french_by_bishop_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::pins_en_passant_by_bishop(&s.position, side))
    }

    fn pins_french_by_rook_bb(&self, board: BoardHandle, side: Side) -> u64 {
        self.query(board, |s| queries::pins_en_passant_by_rook(&s.position, side))
    }

    fn get_possible_moves_bb(&self, board: BoardHandle, square: u32) -> u64 {
        let Ok(index) = square_index(square) else {
            return 0;
        };
        let square = Square::new(u32::from(index));
        self.query(board, |s| queries::possible_moves(&s.position, square))
    }

    fn get_board_data(&self, board: BoardHandle) -> WasmPtr {
        self.board(board)
            .map(|state| state.snapshot)
            .unwrap_or(WasmPtr::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUF: u32 = 512;

    fn setup() -> (NativeEngine, BoardHandle, WasmPtr, WasmPtr) {
        let mut engine = NativeEngine::new();
        engine.setup();
        let board = engine.create_board();
        let fen = engine.alloc(BUF);
        let msg = engine.alloc(BUF);
        (engine, board, fen, msg)
    }

    fn read_fen(engine: &mut NativeEngine, board: BoardHandle, fen: WasmPtr) -> String {
        let len = engine.get_fen(board, fen, BUF);
        let bytes = &engine.memory()[fen.offset()..fen.offset() + len as usize];
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn load_fen(engine: &mut NativeEngine, board: BoardHandle, fen: WasmPtr, text: &str) -> bool {
        let offset = fen.offset();
        engine.memory_mut()[offset..offset + text.len()].copy_from_slice(text.as_bytes());
        engine.set_from_fen(board, fen, text.len() as u32)
    }

    #[test]
    fn test_human_move_updates_snapshot() {
        let (mut engine, board, _fen, msg) = setup();
        assert_eq!(engine.play_human_move(board, 12, 28, msg, BUF), ENGINE_OK);
        let data = engine.get_board_data(board).offset();
        assert_eq!(engine.memory()[data + 12], 0);
        assert_ne!(engine.memory()[data + 28], 0);
        assert!(!engine.is_white_turn(board));
        assert_eq!(engine.get_last_move_bb(board), (1u64 << 12) | (1u64 << 28));
    }

    #[test]
    fn test_illegal_move_leaves_board_alone() {
        let (mut engine, board, fen, msg) = setup();
        let before = read_fen(&mut engine, board, fen);
        assert_eq!(engine.play_human_move(board, 12, 36, msg, BUF), ENGINE_ILLEGAL_MOVE);
        assert_eq!(read_fen(&mut engine, board, fen), before);
    }

    #[test]
    fn test_out_of_range_square_is_an_error() {
        let (mut engine, board, _fen, msg) = setup();
        assert_eq!(engine.play_human_move(board, 64, 28, msg, BUF), ENGINE_ERROR);
    }

    #[test]
    fn test_unknown_handle_is_an_error() {
        let (mut engine, _board, _fen, msg) = setup();
        assert_eq!(engine.play_human_move(BoardHandle(99), 12, 28, msg, BUF), ENGINE_ERROR);
        assert_eq!(engine.get_positions_bb(BoardHandle(99), Side::White), 0);
    }

    #[test]
    fn test_fools_mate_reports_message_length() {
        let (mut engine, board, _fen, msg) = setup();
        for (from, to) in [(13, 21), (52, 36), (14, 30)] {
            assert_eq!(engine.play_human_move(board, from, to, msg, BUF), ENGINE_OK);
        }
        // Qd8-h4#
        let code = engine.play_human_move(board, 59, 31, msg, BUF);
        let expected = "Black wins by checkmate.";
        assert_eq!(code, expected.len() as i32);
        let text = &engine.memory()[msg.offset()..msg.offset() + expected.len()];
        assert_eq!(text, expected.as_bytes());
    }

    #[test]
    fn test_message_that_does_not_fit_is_an_error() {
        let (mut engine, board, _fen, msg) = setup();
        for (from, to) in [(13, 21), (52, 36), (14, 30)] {
            engine.play_human_move(board, from, to, msg, BUF);
        }
        assert_eq!(engine.play_human_move(board, 59, 31, msg, 4), ENGINE_ERROR);
    }

    #[test]
    fn test_castling_by_king_hop() {
        let (mut engine, board, fen, msg) = setup();
        assert!(load_fen(&mut engine, board, fen, "4k3/8/8/8/8/8/8/4K2R w K - 0 1"));
        assert_ne!(engine.get_possible_moves_bb(board, 4) & (1u64 << 6), 0);
        assert_eq!(engine.play_human_move(board, 4, 6, msg, BUF), ENGINE_OK);
        let data = engine.get_board_data(board).offset();
        assert_ne!(engine.memory()[data + 5], 0, "rook lands on f1");
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let (mut engine, board, fen, msg) = setup();
        assert!(load_fen(&mut engine, board, fen, "7k/P7/8/8/8/8/8/K7 w - - 0 1"));
        assert_eq!(engine.play_human_move(board, 48, 56, msg, BUF), ENGINE_OK);
        assert!(read_fen(&mut engine, board, fen).starts_with("Q6k/"));
    }

    #[test]
    fn test_bad_fen_is_rejected() {
        let (mut engine, board, fen, _msg) = setup();
        assert!(!load_fen(&mut engine, board, fen, "not a fen"));
        assert!(read_fen(&mut engine, board, fen).starts_with("rnbqkbnr/pppppppp/"));
    }

    #[test]
    fn test_restart_keeps_handle() {
        let (mut engine, board, fen, msg) = setup();
        engine.play_human_move(board, 12, 28, msg, BUF);
        assert_eq!(engine.restart_game(board), board);
        assert_eq!(
            read_fen(&mut engine, board, fen),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        assert_eq!(engine.get_last_move_bb(board), 0);
    }

    #[test]
    fn test_bot_move_answers() {
        let (mut engine, board, _fen, msg) = setup();
        engine.change_settings(200, 1);
        engine.play_human_move(board, 12, 28, msg, BUF);
        assert_eq!(engine.play_bot_move(board, msg, BUF), ENGINE_OK);
        assert!(engine.is_white_turn(board));
    }

    #[test]
    fn test_get_fen_too_small_returns_zero() {
        let (mut engine, board, fen, _msg) = setup();
        assert_eq!(engine.get_fen(board, fen, 10), 0);
    }
}
