//! ASCII-art glyphs for neighborhood occupants.

use crate::canvas::{CanvasError, TextCanvas};
use shapetown_core::CellKind;

/// Width of every glyph block in characters.
pub const GLYPH_WIDTH: u32 = 5;
/// Height of every glyph block in rows.
pub const GLYPH_HEIGHT: u32 = 3;

/// Fixed art block for `kind`; every line is `GLYPH_WIDTH` characters and
/// there are `GLYPH_HEIGHT` lines. The blank block for vacant cells lets a
/// full-grid redraw overwrite stale art without clearing the canvas.
#[must_use]
pub const fn art(kind: CellKind) -> &'static str {
    match kind {
        CellKind::Empty => "     \n     \n     ",
        CellKind::Triangle => "  ,  \n / \\ \n/___\\",
        CellKind::Square => ".---.\n|   |\n'---'",
    }
}

/// Draw the glyph for `kind` onto the canvas at character offset `(x, y)`.
pub fn draw(canvas: &mut TextCanvas, kind: CellKind, x: u32, y: u32) -> Result<(), CanvasError> {
    canvas.overlay(x, y, art(kind))
}
