//! Terminal rasterizer for frames
//!
//! Draws a [`Frame`] as an 8x8 character grid, rank 8 at the top. Each cell
//! is the piece letter (upper case for white, `.` for empty) followed by a
//! marker for the last fill painted on that square:
//!
//! | paint     | marker |
//! |-----------|--------|
//! | red       | `r`    |
//! | blue      | `b`    |
//! | purple    | `#`    |
//! | green     | `~`    |
//! | black     | `@`    |
//! | yellow    | `*`    |
//! | lightblue | `o`    |
//!
//! Coordinates are printed around the grid when the frame carries labels.

use crate::rendering::pipeline::{DrawCommand, Frame, Paint};
use engine_abi::Side;
use std::fmt::Write;

fn marker(paint: Paint) -> char {
    match paint {
        Paint::Red => 'r',
        Paint::Blue => 'b',
        Paint::Purple => '#',
        Paint::Green => '~',
        Paint::Black => '@',
        Paint::Yellow => '*',
        Paint::LightBlue => 'o',
    }
}

/// Render `frame` as multi-line text.
pub fn rasterize(frame: &Frame) -> String {
    let mut pieces = ['.'; 64];
    let mut marks = [' '; 64];
    let mut labelled = false;

    for command in &frame.commands {
        match command {
            DrawCommand::Clear => {
                pieces = ['.'; 64];
                marks = [' '; 64];
            }
            DrawCommand::FillSquare { square, paint, .. } => {
                marks[square.index() as usize] = marker(*paint);
            }
            DrawCommand::Sprite {
                square, kind, side, ..
            } => {
                let letter = kind.letter();
                pieces[square.index() as usize] = match side {
                    Side::White => letter.to_ascii_uppercase(),
                    Side::Black => letter,
                };
            }
            DrawCommand::Label { .. } => labelled = true,
        }
    }

    let mut out = String::new();
    for rank in (0..8).rev() {
        if labelled {
            let _ = write!(out, "{} ", rank + 1);
        }
        for file in 0..8 {
            let index = rank * 8 + file;
            out.push(pieces[index]);
            out.push(marks[index]);
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    if labelled {
        out.push_str("  A  B  C  D  E  F  G  H\n");
    }
    let _ = writeln!(out, "{}", frame.status);
    let _ = writeln!(out, "eval {:+}  fen {}", frame.material_eval, frame.fen);
    out
}
