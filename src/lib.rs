//! Board interaction controller for a chess engine behind a linear-memory ABI
//!
//! The engine owns the rules, the search and the board. This crate owns
//! everything around it: the startup handshake, marshalling text through the
//! engine's memory, decoding result codes, the two-click selection, deferred
//! engine replies, and turning engine state into draw commands.
//!
//! # Architecture
//!
//! - [`boundary`] - raw memory and result codes
//! - [`game`] - the [`game::Session`] and its state machines
//! - [`rendering`] - frames, overlays and sprites
//! - [`input`] - pointer geometry and host commands
//! - [`core`] - configuration and its persistence

pub mod boundary;
pub mod core;
pub mod game;
pub mod input;
pub mod rendering;
