//! Rendering module - turns engine state into draw commands
//!
//! Rendering never mutates the game. It reads the board snapshot and a
//! handful of bitboard queries and produces a [`Frame`] that any host can
//! paint: a canvas, a GUI toolkit, or the terminal via [`text::rasterize`].
//!
//! # Architecture
//!
//! - [`bitboard`] - lazy square iteration and pair classification
//! - [`overlay`] - named debug overlays backed by engine queries
//! - [`sprites`] - validated piece sprite atlas
//! - [`pipeline`] - frame assembly in a fixed draw order
//! - [`text`] - character-grid rasterizer used by the CLI

pub mod bitboard;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod sprites;
pub mod text;

pub use error::{RenderError, RenderResult};
pub use overlay::OverlayMode;
pub use pipeline::{render, BoardView, DrawCommand, Frame, Inset, Paint, RenderOptions};
pub use sprites::{SpriteAtlas, SpriteOffset};
