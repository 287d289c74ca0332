//! Terminal presentation for the shapetown neighborhood simulation.

pub mod canvas;
pub mod glyph;
pub mod terminal;

pub use canvas::{CanvasError, TextCanvas};
pub use glyph::{GLYPH_HEIGHT, GLYPH_WIDTH};
pub use terminal::{AnimationOptions, DEFAULT_FRAME_DELAY, RunReport, animate};
