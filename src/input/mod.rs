//! Input module - turning host events into session calls
//!
//! - [`pointer`] - surface coordinates to squares
//! - [`command`] - line-based command grammar for the terminal host

pub mod command;
pub mod pointer;

pub use command::{HostCommand, InputError, HELP};
pub use pointer::BoardGeometry;
