//! Terminal host for the board controller
//!
//! Runs a [`Session`] against the built-in engine and reads one command per
//! line from stdin (`help` lists them). After every command the board is
//! printed, then any due engine reply runs and the board is printed again,
//! so the human move is always visible before the engine starts thinking.

use anyhow::{Context, Result};
use chess_board_controller::core::{
    default_config_path, load_config, load_config_or_default, save_config, ControllerConfig,
    Settings,
};
use chess_board_controller::game::{ClickOutcome, MoveOutcome, PlayMode, Session};
use chess_board_controller::input::{BoardGeometry, HostCommand, HELP};
use chess_board_controller::rendering::text::rasterize;
use chess_board_controller::rendering::{OverlayMode, RenderOptions, SpriteAtlas};
use clap::{Parser, ValueEnum};
use engine_abi::Side;
use native_engine::NativeEngine;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Two humans share the board
    Human,
    /// The engine answers every human move
    Engine,
}

#[derive(Parser, Debug)]
#[command(name = "board-controller", about = "Play chess against the built-in engine")]
struct Args {
    /// Config file to load instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config back to the config file
    #[arg(long)]
    save_config: bool,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Side the engine plays in engine mode
    #[arg(long, value_enum)]
    engine_side: Option<SideArg>,

    /// Engine think time per move in milliseconds
    #[arg(long)]
    time_ms: Option<u32>,

    /// Engine search depth limit
    #[arg(long)]
    depth: Option<u32>,

    /// Print square labels around the board
    #[arg(long)]
    labels: bool,

    /// Initial overlay mode
    #[arg(long)]
    overlay: Option<OverlayMode>,

    /// Board edge length used by `point x y`
    #[arg(long, default_value_t = 800.0)]
    board_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

impl Args {
    /// Layer command-line flags over the loaded config.
    fn apply(&self, config: &mut ControllerConfig) {
        let engine_side = self
            .engine_side
            .map(Side::from)
            .or(config.play_mode.engine_side())
            .unwrap_or(Side::Black);
        match self.mode {
            Some(ModeArg::Human) => config.play_mode = PlayMode::HumanVsHuman,
            Some(ModeArg::Engine) => config.play_mode = PlayMode::HumanVsEngine { engine_side },
            None if self.engine_side.is_some() => {
                config.play_mode = PlayMode::HumanVsEngine { engine_side }
            }
            None => {}
        }
        if let Some(time_ms) = self.time_ms {
            config.settings.think_time_ms = time_ms;
        }
        if let Some(depth) = self.depth {
            config.settings.depth_limit = depth;
        }
        if self.labels {
            config.show_labels = true;
        }
        if let Some(overlay) = self.overlay {
            config.overlay = overlay;
        }
    }
}

/// Display state owned by the host, not the session
struct Host {
    atlas: SpriteAtlas,
    options: RenderOptions,
    geometry: BoardGeometry,
}

enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = if args.config.is_some() {
        load_config(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else {
        load_config_or_default(&config_path)
    };
    args.apply(&mut config);
    config.validate()?;
    if args.save_config {
        save_config(&config_path, &config)?;
    }

    let mut session = Session::start(NativeEngine::new(), &config)
        .context("engine handshake failed")?;
    let mut host = Host {
        atlas: SpriteAtlas::standard(),
        options: RenderOptions {
            show_labels: config.show_labels,
        },
        geometry: BoardGeometry::new(args.board_size),
    };
    info!("[SESSION] Type `help` for commands");

    draw(&mut session, &host);
    drive_engine(&mut session, &host);

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match line.parse::<HostCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match execute(&mut session, &mut host, command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("{e}"),
        }
        draw(&mut session, &host);
        drive_engine(&mut session, &host);
    }
    Ok(())
}

fn execute(
    session: &mut Session<NativeEngine>,
    host: &mut Host,
    command: HostCommand,
) -> Result<Flow> {
    match command {
        HostCommand::Click(square) => report_click(session.click(square)?),
        HostCommand::Point { x, y } => match host.geometry.square_at(x, y) {
            Some(square) => report_click(session.click(square)?),
            None => println!("({x}, {y}) is off the board"),
        },
        HostCommand::Move { from, to } => report_click(session.play_move(from, to)?),
        HostCommand::Engine => report_move(&session.request_engine_move()?),
        HostCommand::Restart => session.restart()?,
        HostCommand::Pause => session.pause(),
        HostCommand::Resume => session.resume(),
        HostCommand::Fen(fen) => session.set_from_fen(&fen)?,
        HostCommand::Overlay(mode) => session.set_overlay(mode),
        HostCommand::Settings {
            think_time_ms,
            depth_limit,
        } => session.change_settings(Settings {
            think_time_ms,
            depth_limit,
        })?,
        HostCommand::Mode(mode) => session.set_play_mode(mode),
        HostCommand::Labels(on) => host.options.show_labels = on,
        HostCommand::History => {
            for (ply, fen) in session.history().iter().enumerate() {
                println!("{ply:>3}  {fen}");
            }
            let stats = session.stats();
            if let Some(average) = stats.average_think() {
                println!("engine: {} moves, {:?} average", stats.moves, average);
            }
        }
        HostCommand::Show => {}
        HostCommand::Help => println!("{HELP}"),
        HostCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn report_click(outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::Armed(square) => println!("selected {square}"),
        ClickOutcome::Move(outcome) => report_move(&outcome),
    }
}

fn report_move(outcome: &MoveOutcome) {
    match outcome {
        MoveOutcome::Played => {}
        MoveOutcome::Illegal => println!("illegal move"),
        MoveOutcome::GameOver(message) => println!("{message}"),
    }
}

fn draw(session: &mut Session<NativeEngine>, host: &Host) {
    match session.frame(&host.atlas, host.options) {
        Ok(frame) => print!("{}", rasterize(&frame)),
        Err(e) => println!("{e}"),
    }
}

/// Wait for and run queued engine replies, redrawing after each.
fn drive_engine(session: &mut Session<NativeEngine>, host: &Host) {
    while let Some(deadline) = session.next_deadline() {
        std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
        match session.run_pending(Instant::now()) {
            Ok(Some(outcome)) => report_move(&outcome),
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
        draw(session, host);
    }
}
