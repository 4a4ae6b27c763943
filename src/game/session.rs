//! Game session - the controller's single owner of engine state
//!
//! A [`Session`] owns the engine instance, its board handle, the two
//! marshalling regions and everything the controller tracks on top: the
//! click selection, the game-over message, the FEN history, the pending
//! engine reply and whether an engine failure has disabled play.
//!
//! # Lifecycle
//!
//! ```text
//! start ──version ok──> Active <──restart── Disabled
//!   │                     │                    ^
//!   └─version mismatch─> (no session)          │
//!                         └──engine fatal──────┘
//! ```
//!
//! # Engine replies
//!
//! After a human move in [`PlayMode::HumanVsEngine`] the engine's reply is
//! not computed right away. It is queued on the session's scheduler with a
//! short delay so the host can paint the human move first, then run by
//! [`Session::run_pending`]. Each queued reply carries the generation it was
//! queued in; restart, pause, FEN loads and play-mode changes bump the
//! generation, so a reply that survives one of those is dropped instead of
//! played against the wrong position.
//!
//! # Errors
//!
//! Illegal moves and game over are ordinary outcomes ([`MoveOutcome`]).
//! Anything the protocol cannot explain becomes [`GameError::EngineFatal`];
//! the first one is logged, and from then on every game-mutating call
//! answers [`GameError::SessionDisabled`] without touching the engine until
//! [`Session::restart`] succeeds.

use crate::boundary::marshaller::{read_text, write_text_exact};
use crate::boundary::{BoardSnapshot, MarshalError, MemoryRegion, ProtocolV3, ResultClass, ResultProtocol};
use crate::core::config::{ControllerConfig, Settings};
use crate::game::error::{GameError, GameResult};
use crate::game::game_over::GameOverMessage;
use crate::game::scheduler::{Scheduler, TaskHandle};
use crate::game::selection::{ClickAction, Selection};
use crate::game::stats::EngineStats;
use crate::game::types::{PlayMode, Square};
use crate::rendering::overlay::OverlayMode;
use crate::rendering::pipeline::{render, BoardView, Frame, RenderOptions};
use crate::rendering::sprites::SpriteAtlas;
use engine_abi::{BoardHandle, EngineExports, Side};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use web_time::Instant;

/// Result of a move that the engine processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move played, game continues
    Played,
    /// Move rejected by the engine, board unchanged
    Illegal,
    /// Move played and ended the game
    GameOver(GameOverMessage),
}

/// What a click did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Selection moved, no engine call
    Armed(Square),
    /// A move was submitted
    Move(MoveOutcome),
}

/// Queued engine reply, valid only in the generation it was queued in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EngineReply {
    generation: u64,
}

pub struct Session<E: EngineExports> {
    engine: E,
    board: BoardHandle,
    protocol: ProtocolV3,
    fen_region: MemoryRegion,
    msg_region: MemoryRegion,
    play_mode: PlayMode,
    settings: Settings,
    reply_delay: Duration,
    overlay: OverlayMode,
    selection: Selection,
    game_over: Option<GameOverMessage>,
    disabled: Option<GameError>,
    paused: bool,
    generation: u64,
    pending_reply: Option<TaskHandle>,
    scheduler: Scheduler<EngineReply>,
    history: Vec<String>,
    stats: EngineStats,
}

impl<E: EngineExports> Session<E> {
    /// Handshake with `engine` and create the game board.
    ///
    /// The protocol version is checked before anything else; on mismatch the
    /// engine receives no further calls. Afterwards: `setup`, `create_board`,
    /// two buffer allocations, and the configured search limits.
    pub fn start(mut engine: E, config: &ControllerConfig) -> GameResult<Self> {
        let protocol = ProtocolV3::new(config.buffer_size);
        let found = engine.protocol_version();
        if found != protocol.version() {
            let mismatch = GameError::ProtocolVersionMismatch {
                expected: protocol.version(),
                found,
            };
            error!("[ENGINE] {}", mismatch);
            return Err(mismatch);
        }

        engine.setup();
        let board = engine.create_board();
        if board.is_null() {
            return Err(GameError::fatal("create_board", "engine returned a null board handle"));
        }
        let fen_region = MemoryRegion::allocate(&mut engine, config.buffer_size)
            .map_err(|e| GameError::fatal("alloc", e))?;
        let msg_region = MemoryRegion::allocate(&mut engine, config.buffer_size)
            .map_err(|e| GameError::fatal("alloc", e))?;
        engine.change_settings(config.settings.think_time_ms, config.settings.depth_limit);

        let mut session = Self {
            engine,
            board,
            protocol,
            fen_region,
            msg_region,
            play_mode: config.play_mode,
            settings: config.settings,
            reply_delay: config.reply_delay(),
            overlay: config.overlay,
            selection: Selection::Idle,
            game_over: None,
            disabled: None,
            paused: false,
            generation: 0,
            pending_reply: None,
            scheduler: Scheduler::new(),
            history: Vec::new(),
            stats: EngineStats::default(),
        };
        session.record_position()?;
        session.schedule_reply_if_engine_turn(Instant::now());

        info!(
            "[SESSION] Started on protocol v{} with {:?}",
            session.protocol.version(),
            session.play_mode
        );
        Ok(session)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn board(&self) -> BoardHandle {
        self.board
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn game_over(&self) -> Option<&GameOverMessage> {
        self.game_over.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }

    /// The engine failure that disabled the session, if any
    pub fn disabled_reason(&self) -> Option<&GameError> {
        self.disabled.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// FEN after every position of the current game, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// FEN of the current position
    pub fn current_fen(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or_default()
    }

    pub fn overlay(&self) -> OverlayMode {
        self.overlay
    }

    pub fn set_overlay(&mut self, overlay: OverlayMode) {
        debug!("[SESSION] Overlay set to {}", overlay);
        self.overlay = overlay;
    }

    pub fn side_to_move(&self) -> Side {
        if self.engine.is_white_turn(self.board) {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Whether a click right now could submit a move
    pub fn is_human_turn(&self) -> bool {
        self.game_over.is_none() && self.play_mode.is_human(self.side_to_move())
    }

    pub fn has_pending_reply(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// When the host should next call [`Session::run_pending`]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    // ========================================================================
    // Moves
    // ========================================================================

    /// Route a click on `square` through the selection machine.
    ///
    /// Clicks while the engine is to move, or after the game ended, only
    /// move the selection.
    pub fn click(&mut self, square: Square) -> GameResult<ClickOutcome> {
        self.ensure_enabled()?;
        let human_turn = self.is_human_turn();
        match self.selection.click(square, human_turn) {
            ClickAction::Armed(armed) => {
                debug!("[SESSION] Armed {}", armed);
                Ok(ClickOutcome::Armed(armed))
            }
            ClickAction::Attempt { from, to } => {
                self.submit_human_move(from, to).map(ClickOutcome::Move)
            }
        }
    }

    /// Click `from` then `to`, dropping whatever was armed before.
    pub fn play_move(&mut self, from: Square, to: Square) -> GameResult<ClickOutcome> {
        self.ensure_enabled()?;
        self.selection.clear();
        self.click(from)?;
        self.click(to)
    }

    /// Ask the engine to play `from -> to` for the human.
    ///
    /// Requires `from` to be the armed selection. Promotions are chosen by
    /// the engine.
    pub fn submit_human_move(&mut self, from: Square, to: Square) -> GameResult<MoveOutcome> {
        self.ensure_enabled()?;
        self.ensure_not_over()?;
        if self.selection.armed() != Some(from) {
            return Err(GameError::NotArmed { from });
        }

        let raw = self.engine.play_human_move(
            self.board,
            from.into(),
            to.into(),
            self.msg_region.base(),
            self.msg_region.capacity(),
        );
        let outcome = self.apply_result("play_human_move", raw)?;

        match &outcome {
            MoveOutcome::Played => {
                info!("[SESSION] Human played {} -> {}", from, to);
                self.selection.move_played();
                self.schedule_reply_if_engine_turn(Instant::now());
            }
            MoveOutcome::GameOver(_) => self.selection.move_played(),
            MoveOutcome::Illegal => {
                debug!("[SESSION] Illegal move {} -> {}", from, to);
                self.selection.move_rejected(to);
            }
        }
        Ok(outcome)
    }

    /// Let the engine search and play a move for the side to move.
    ///
    /// Blocks for as long as the engine thinks.
    pub fn request_engine_move(&mut self) -> GameResult<MoveOutcome> {
        self.ensure_enabled()?;
        self.ensure_not_over()?;
        self.cancel_pending_reply();

        info!(
            "[ENGINE] Thinking for {} (limit {} ms, depth {})",
            self.side_to_move(),
            self.settings.think_time_ms,
            self.settings.depth_limit
        );
        let start = Instant::now();
        let raw = self
            .engine
            .play_bot_move(self.board, self.msg_region.base(), self.msg_region.capacity());
        let elapsed = start.elapsed();

        let outcome = self.apply_result("play_bot_move", raw)?;
        if outcome == MoveOutcome::Illegal {
            return Err(self.fail(GameError::fatal(
                "play_bot_move",
                "engine reported its own move as illegal",
            )));
        }
        self.stats.record(elapsed);
        info!("[ENGINE] Found move in {}ms", elapsed.as_millis());
        if outcome == MoveOutcome::Played {
            self.schedule_reply_if_engine_turn(Instant::now());
        }
        Ok(outcome)
    }

    /// Run the engine reply if it is due at `now`.
    ///
    /// Returns the reply's outcome, or `None` when nothing was due or the
    /// due reply belonged to an earlier generation.
    pub fn run_pending(&mut self, now: Instant) -> GameResult<Option<MoveOutcome>> {
        let mut outcome = None;
        for (handle, reply) in self.scheduler.take_due(now) {
            if reply.generation != self.generation || self.pending_reply != Some(handle) {
                debug!("[SCHEDULER] Dropping stale engine reply {:?}", handle);
                continue;
            }
            self.pending_reply = None;
            outcome = Some(self.request_engine_move()?);
        }
        Ok(outcome)
    }

    // ========================================================================
    // Controls
    // ========================================================================

    /// Reset to the initial position.
    ///
    /// Also clears a disabled session; the engine is asked to restart even
    /// after a fatal error. The handle the engine returns is used from now on.
    pub fn restart(&mut self) -> GameResult<()> {
        self.cancel_pending_reply();
        debug!("[SESSION] History before restart: {:?}", self.history);

        let board = self.engine.restart_game(self.board);
        if board.is_null() {
            return Err(self.fail(GameError::fatal(
                "restart_game",
                "engine returned a null board handle",
            )));
        }
        if board != self.board {
            info!("[SESSION] Engine moved the board to handle {:?}", board);
        }

        self.board = board;
        self.disabled = None;
        self.game_over = None;
        self.selection.clear();
        self.stats = EngineStats::default();
        self.history.clear();
        self.record_position()?;

        info!("[SESSION] Game restarted");
        self.schedule_reply_if_engine_turn(Instant::now());
        Ok(())
    }

    /// Stop the engine from replying until [`Session::resume`].
    pub fn pause(&mut self) {
        self.cancel_pending_reply();
        self.paused = true;
        info!("[SESSION] Paused");
    }

    pub fn resume(&mut self) {
        self.paused = false;
        info!("[SESSION] Resumed");
        self.schedule_reply_if_engine_turn(Instant::now());
    }

    /// Change who plays which side; a pending reply is dropped and
    /// re-queued if the engine is now to move.
    pub fn set_play_mode(&mut self, play_mode: PlayMode) {
        self.cancel_pending_reply();
        self.play_mode = play_mode;
        info!("[SESSION] Play mode set to {:?}", play_mode);
        self.schedule_reply_if_engine_turn(Instant::now());
    }

    /// Forward new search limits to the engine.
    pub fn change_settings(&mut self, settings: Settings) -> GameResult<()> {
        self.ensure_enabled()?;
        self.engine
            .change_settings(settings.think_time_ms, settings.depth_limit);
        self.settings = settings;
        info!(
            "[SESSION] Engine settings: {} ms, depth {}",
            settings.think_time_ms, settings.depth_limit
        );
        Ok(())
    }

    /// Replace the position with `fen`.
    ///
    /// Text longer than the FEN buffer is refused before the engine sees it.
    /// A FEN the engine rejects leaves the board as it was.
    pub fn set_from_fen(&mut self, fen: &str) -> GameResult<()> {
        self.ensure_enabled()?;
        self.cancel_pending_reply();

        let written = match write_text_exact(self.engine.memory_mut(), self.fen_region, fen) {
            Ok(written) => written,
            Err(MarshalError::Overflow { needed, capacity }) => {
                warn!("[MARSHAL] FEN of {} bytes exceeds {} byte buffer", needed, capacity);
                self.schedule_reply_if_engine_turn(Instant::now());
                return Err(GameError::MarshallingOverflow { needed, capacity });
            }
            Err(e) => return Err(self.fail(GameError::fatal("set_from_fen", e))),
        };

        if !self
            .engine
            .set_from_fen(self.board, self.fen_region.base(), written)
        {
            warn!("[SESSION] Engine rejected FEN {:?}", fen);
            self.schedule_reply_if_engine_turn(Instant::now());
            return Err(GameError::InvalidFen {
                fen: fen.to_string(),
            });
        }

        self.selection.clear();
        self.game_over = None;
        self.history.clear();
        self.record_position()?;
        info!("[SESSION] Loaded position {}", self.current_fen());
        self.schedule_reply_if_engine_turn(Instant::now());
        Ok(())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Copy the engine's board bytes.
    pub fn snapshot(&mut self) -> GameResult<BoardSnapshot> {
        let base = self.engine.get_board_data(self.board);
        BoardSnapshot::read(self.engine.memory(), base)
            .map_err(|e| self.fail(GameError::fatal("get_board_data", e)))
    }

    /// One-line description of the game state
    pub fn status_line(&self) -> String {
        if self.disabled.is_some() {
            return "Engine error. Restart to continue.".to_string();
        }
        if let Some(message) = &self.game_over {
            return message.text().to_string();
        }
        let side = self.side_to_move();
        if self.pending_reply.is_some() {
            format!("{side} to move (engine thinking)")
        } else if self.paused && !self.play_mode.is_human(side) {
            format!("{side} to move (paused)")
        } else {
            format!("{side} to move")
        }
    }

    /// Build the frame for the current state.
    pub fn frame(&mut self, atlas: &SpriteAtlas, options: RenderOptions) -> GameResult<Frame> {
        let snapshot = self.snapshot()?;
        let status = self.status_line();
        let view = BoardView {
            board: self.board,
            snapshot: &snapshot,
            selection: self.selection,
            overlay: self.overlay,
            status: &status,
            fen: self.current_fen(),
        };
        Ok(render(&self.engine, &view, atlas, options))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_enabled(&self) -> GameResult<()> {
        if self.disabled.is_some() {
            return Err(GameError::SessionDisabled);
        }
        Ok(())
    }

    fn ensure_not_over(&self) -> GameResult<()> {
        match &self.game_over {
            Some(message) => Err(GameError::GameOver {
                message: message.text().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Classify a result code and do the bookkeeping shared by human and
    /// engine moves.
    fn apply_result(&mut self, operation: &'static str, raw: i32) -> GameResult<MoveOutcome> {
        match self.protocol.classify(raw) {
            ResultClass::Continue => {
                self.record_position()?;
                Ok(MoveOutcome::Played)
            }
            ResultClass::IllegalMove => Ok(MoveOutcome::Illegal),
            ResultClass::GameOver { message_len } => {
                let text = read_text(self.engine.memory(), self.msg_region, message_len)
                    .map_err(|e| self.fail(GameError::fatal(operation, e)))?;
                info!("[SESSION] Game over: {}", text);
                let message = GameOverMessage::new(text);
                self.game_over = Some(message.clone());
                self.record_position()?;
                Ok(MoveOutcome::GameOver(message))
            }
            ResultClass::EngineFatal { raw } => Err(self.fail(GameError::fatal(
                operation,
                format!("result code {raw}"),
            ))),
        }
    }

    /// Read the FEN of the current position into the history.
    fn record_position(&mut self) -> GameResult<()> {
        let len = self.engine.get_fen(
            self.board,
            self.fen_region.base(),
            self.fen_region.capacity(),
        );
        if len == 0 {
            return Err(self.fail(GameError::fatal("get_fen", "engine wrote no FEN")));
        }
        let fen = read_text(self.engine.memory(), self.fen_region, len)
            .map_err(|e| self.fail(GameError::fatal("get_fen", e)))?;
        self.history.push(fen);
        Ok(())
    }

    fn schedule_reply_if_engine_turn(&mut self, now: Instant) {
        if self.paused
            || self.disabled.is_some()
            || self.game_over.is_some()
            || self.pending_reply.is_some()
            || self.play_mode.is_human(self.side_to_move())
        {
            return;
        }
        let handle = self.scheduler.schedule(
            EngineReply {
                generation: self.generation,
            },
            self.reply_delay,
            now,
        );
        self.pending_reply = Some(handle);
    }

    fn cancel_pending_reply(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending_reply.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Disable the session. Only the first failure is logged.
    fn fail(&mut self, failure: GameError) -> GameError {
        if self.disabled.is_none() {
            error!("[ENGINE] {}. Controls disabled until restart.", failure);
        }
        self.cancel_pending_reply();
        self.selection.clear();
        self.disabled = Some(failure.clone());
        failure
    }
}
