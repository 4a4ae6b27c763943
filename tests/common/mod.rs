//! Scripted engine for controller tests
//!
//! [`ScriptedEngine`] implements the engine exports with canned answers and
//! records every call in a shared [`CallLog`], so a test can keep the log
//! even after the engine has moved into a session (or been dropped by a
//! failed start).

#![allow(dead_code)]

use engine_abi::{BoardHandle, EngineExports, Side, WasmPtr, ENGINE_OK, PROTOCOL_VERSION};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const MEMORY_SIZE: usize = 4096;
const BOARD_DATA: u32 = 3072;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ProtocolVersion,
    Setup,
    Alloc(u32),
    CreateBoard,
    RestartGame(BoardHandle),
    SetFromFen(String),
    GetFen,
    PlayHumanMove {
        board: BoardHandle,
        from: u32,
        to: u32,
    },
    PlayBotMove,
    ChangeSettings(u32, u32),
    Query(&'static str),
}

impl Call {
    pub fn is_query(&self) -> bool {
        matches!(self, Call::Query(_))
    }
}

/// Shared record of engine calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Every call except read-only queries
    pub fn mutating(&self) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|call| !call.is_query())
            .cloned()
            .collect()
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| wanted(call)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A canned result code plus the message written before returning it
#[derive(Debug, Clone)]
pub struct Scripted {
    pub code: i32,
    pub message: Option<String>,
}

impl Scripted {
    pub fn code(code: i32) -> Self {
        Self {
            code,
            message: None,
        }
    }

    pub fn game_over(message: &str) -> Self {
        Self {
            code: message.len() as i32,
            message: Some(message.to_string()),
        }
    }
}

pub struct ScriptedEngine {
    log: CallLog,
    memory: Vec<u8>,
    next_alloc: u32,
    pub version: i32,
    pub board: [u8; 64],
    pub white_turn: bool,
    pub fen: String,
    pub fen_len_override: Option<u32>,
    pub accept_fen: bool,
    pub create_handle: BoardHandle,
    pub restart_handle: Option<BoardHandle>,
    pub human_results: VecDeque<Scripted>,
    pub bot_results: VecDeque<Scripted>,
    pub positions: [u64; 2],
    pub possible_moves: u64,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            memory: vec![0; MEMORY_SIZE],
            next_alloc: 8,
            version: PROTOCOL_VERSION,
            board: [0; 64],
            white_turn: true,
            fen: START_FEN.to_string(),
            fen_len_override: None,
            accept_fen: true,
            create_handle: BoardHandle(1),
            restart_handle: None,
            human_results: VecDeque::new(),
            bot_results: VecDeque::new(),
            positions: [0; 2],
            possible_moves: 0,
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn with_human_results(mut self, results: impl IntoIterator<Item = Scripted>) -> Self {
        self.human_results.extend(results);
        self
    }

    pub fn with_bot_results(mut self, results: impl IntoIterator<Item = Scripted>) -> Self {
        self.bot_results.extend(results);
        self
    }

    fn write(&mut self, ptr: WasmPtr, bytes: &[u8]) {
        let start = ptr.offset();
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
    }

    fn sync_board(&mut self) {
        let board = self.board;
        self.write(WasmPtr(BOARD_DATA), &board);
    }

    fn play(&mut self, scripted: Scripted, msg: WasmPtr) -> i32 {
        if let Some(message) = &scripted.message {
            let bytes = message.clone().into_bytes();
            self.write(msg, &bytes);
        }
        if scripted.code == ENGINE_OK || scripted.code > 0 {
            self.white_turn = !self.white_turn;
        }
        self.sync_board();
        scripted.code
    }
}

impl EngineExports for ScriptedEngine {
    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn protocol_version(&self) -> i32 {
        self.log.push(Call::ProtocolVersion);
        self.version
    }

    fn setup(&mut self) {
        self.log.push(Call::Setup);
    }

    fn alloc(&mut self, capacity: u32) -> WasmPtr {
        self.log.push(Call::Alloc(capacity));
        if self.next_alloc as usize + capacity as usize > BOARD_DATA as usize {
            return WasmPtr::NULL;
        }
        let ptr = WasmPtr(self.next_alloc);
        self.next_alloc += capacity;
        ptr
    }

    fn create_board(&mut self) -> BoardHandle {
        self.log.push(Call::CreateBoard);
        self.sync_board();
        self.create_handle
    }

    fn restart_game(&mut self, board: BoardHandle) -> BoardHandle {
        self.log.push(Call::RestartGame(board));
        self.white_turn = true;
        self.fen = START_FEN.to_string();
        self.sync_board();
        self.restart_handle.unwrap_or(board)
    }

    fn set_from_fen(&mut self, _board: BoardHandle, fen: WasmPtr, len: u32) -> bool {
        let start = fen.offset();
        let text = String::from_utf8_lossy(&self.memory[start..start + len as usize]).into_owned();
        self.log.push(Call::SetFromFen(text.clone()));
        if self.accept_fen {
            self.white_turn = text.split_whitespace().nth(1) != Some("b");
            self.fen = text;
        }
        self.accept_fen
    }

    fn get_fen(&mut self, _board: BoardHandle, out: WasmPtr, capacity: u32) -> u32 {
        self.log.push(Call::GetFen);
        if let Some(len) = self.fen_len_override {
            return len;
        }
        if self.fen.len() > capacity as usize {
            return 0;
        }
        let bytes = self.fen.clone().into_bytes();
        self.write(out, &bytes);
        bytes.len() as u32
    }

    fn play_human_move(
        &mut self,
        board: BoardHandle,
        from: u32,
        to: u32,
        msg: WasmPtr,
        _msg_capacity: u32,
    ) -> i32 {
        self.log.push(Call::PlayHumanMove { board, from, to });
        let scripted = self
            .human_results
            .pop_front()
            .unwrap_or(Scripted::code(ENGINE_OK));
        self.play(scripted, msg)
    }

    fn play_bot_move(&mut self, _board: BoardHandle, msg: WasmPtr, _msg_capacity: u32) -> i32 {
        self.log.push(Call::PlayBotMove);
        let scripted = self
            .bot_results
            .pop_front()
            .unwrap_or(Scripted::code(ENGINE_OK));
        self.play(scripted, msg)
    }

    fn change_settings(&mut self, max_time_ms: u32, max_depth: u32) {
        self.log.push(Call::ChangeSettings(max_time_ms, max_depth));
    }

    fn is_white_turn(&self, _board: BoardHandle) -> bool {
        self.log.push(Call::Query("is_white_turn"));
        self.white_turn
    }

    fn get_material_eval(&self, _board: BoardHandle) -> i32 {
        self.log.push(Call::Query("get_material_eval"));
        0
    }

    fn get_positions_bb(&self, _board: BoardHandle, side: Side) -> u64 {
        self.log.push(Call::Query("get_positions_bb"));
        self.positions[side.index() as usize]
    }

    fn get_kings_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("get_kings_bb"));
        0
    }

    fn get_castling_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("get_castling_bb"));
        0
    }

    fn get_last_move_bb(&self, _board: BoardHandle) -> u64 {
        self.log.push(Call::Query("get_last_move_bb"));
        0
    }

    fn get_french_move_bb(&self, _board: BoardHandle) -> u64 {
        self.log.push(Call::Query("get_french_move_bb"));
        0
    }

    fn get_attack_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("get_attack_bb"));
        0
    }

    fn sliding_checks_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("sliding_checks_bb"));
        0
    }

    fn pins_by_bishop_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("pins_by_bishop_bb"));
        0
    }

    fn pins_by_rook_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("pins_by_rook_bb"));
        0
    }

    fn pins_french_by_bishop_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("pins_french_by_bishop_bb"));
        0
    }

    fn pins_french_by_rook_bb(&self, _board: BoardHandle, _side: Side) -> u64 {
        self.log.push(Call::Query("pins_french_by_rook_bb"));
        0
    }

    fn get_possible_moves_bb(&self, _board: BoardHandle, _square: u32) -> u64 {
        self.log.push(Call::Query("get_possible_moves_bb"));
        self.possible_moves
    }

    fn get_board_data(&self, _board: BoardHandle) -> WasmPtr {
        self.log.push(Call::Query("get_board_data"));
        WasmPtr(BOARD_DATA)
    }
}
