//! Host command parsing
//!
//! The terminal host reads one command per line. Parsing is separate from
//! execution so the grammar can be tested without a session.

use crate::game::types::{ParseSquareError, PlayMode, Square};
use crate::rendering::overlay::{OverlayMode, ParseOverlayError};
use engine_abi::Side;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Click a named square
    Click(Square),
    /// Click at surface coordinates
    Point { x: f32, y: f32 },
    /// Two clicks in a row
    Move { from: Square, to: Square },
    /// Let the engine move now
    Engine,
    Restart,
    Pause,
    Resume,
    Fen(String),
    Overlay(OverlayMode),
    Settings { think_time_ms: u32, depth_limit: u32 },
    Mode(PlayMode),
    Labels(bool),
    History,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}, try `help`")]
    UnknownCommand(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("bad number {0:?}")]
    BadNumber(String),

    #[error(transparent)]
    Square(#[from] ParseSquareError),

    #[error(transparent)]
    Overlay(#[from] ParseOverlayError),
}

pub const HELP: &str = "\
commands:
  <square>              click a square, e.g. e2
  <from> <to>           click two squares, e.g. e2 e4
  point <x> <y>         click at board coordinates
  engine                let the engine move now
  restart | pause | resume
  fen <text>            load a position
  overlay <mode>        none, all, kings, castling, last-move, en-passant,
                        attacks, sliding-checks, bishop-pins, rook-pins,
                        en-passant-bishop-pins, en-passant-rook-pins
  settings <ms> <depth> engine search limits
  mode human|white|black  human vs human, or the engine's side
  labels on|off
  history | show | help | quit";

fn number<T: FromStr>(raw: Option<&str>, command: &'static str, expected: &'static str) -> Result<T, InputError> {
    let raw = raw.ok_or(InputError::MissingArgument { command, expected })?;
    raw.parse().map_err(|_| InputError::BadNumber(raw.to_string()))
}

impl FromStr for HostCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(HostCommand::Show);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "engine" | "go" => HostCommand::Engine,
            "restart" => HostCommand::Restart,
            "pause" => HostCommand::Pause,
            "resume" => HostCommand::Resume,
            "history" => HostCommand::History,
            "show" => HostCommand::Show,
            "help" | "?" => HostCommand::Help,
            "quit" | "exit" => HostCommand::Quit,
            "fen" => {
                let fen = line[head.len()..].trim();
                if fen.is_empty() {
                    return Err(InputError::MissingArgument {
                        command: "fen",
                        expected: "a FEN string",
                    });
                }
                HostCommand::Fen(fen.to_string())
            }
            "overlay" => {
                let name = words.next().ok_or(InputError::MissingArgument {
                    command: "overlay",
                    expected: "a mode name",
                })?;
                HostCommand::Overlay(name.parse()?)
            }
            "settings" => HostCommand::Settings {
                think_time_ms: number(words.next(), "settings", "<ms> <depth>")?,
                depth_limit: number(words.next(), "settings", "<ms> <depth>")?,
            },
            "point" => HostCommand::Point {
                x: number(words.next(), "point", "<x> <y>")?,
                y: number(words.next(), "point", "<x> <y>")?,
            },
            "mode" => match words.next() {
                Some("human") => HostCommand::Mode(PlayMode::HumanVsHuman),
                Some("white") => HostCommand::Mode(PlayMode::HumanVsEngine {
                    engine_side: Side::White,
                }),
                Some("black") => HostCommand::Mode(PlayMode::HumanVsEngine {
                    engine_side: Side::Black,
                }),
                _ => {
                    return Err(InputError::MissingArgument {
                        command: "mode",
                        expected: "human, white or black",
                    })
                }
            },
            "labels" => match words.next() {
                Some("on") => HostCommand::Labels(true),
                Some("off") => HostCommand::Labels(false),
                _ => {
                    return Err(InputError::MissingArgument {
                        command: "labels",
                        expected: "on or off",
                    })
                }
            },
            _ => {
                let Ok(from) = head.parse::<Square>() else {
                    return Err(InputError::UnknownCommand(head.to_string()));
                };
                match words.next() {
                    Some(to) => HostCommand::Move {
                        from,
                        to: to.parse()?,
                    },
                    None => HostCommand::Click(from),
                }
            }
        };
        Ok(command)
    }
}
