//! Bounds-checked character canvas that frames are composed onto.

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Errors produced by canvas construction and access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    #[error("invalid canvas size: {0}")]
    InvalidSize(&'static str),
    /// A canvas access used a coordinate outside the canvas.
    #[error("coordinate ({x}, {y}) out of bounds for {width}x{height} canvas")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Fixed-size 2D character buffer in row-major layout.
///
/// A transient per-frame artifact: the animation driver redraws the whole
/// canvas every frame, so it carries no simulation state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCanvas {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl TextCanvas {
    /// Construct a canvas filled with spaces.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidSize(
                "canvas dimensions must be non-zero",
            ));
        }
        Ok(Self {
            width,
            height,
            cells: vec![' '; (width as usize) * (height as usize)],
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), CanvasError> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Read the character at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<char, CanvasError> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.offset(x, y)])
    }

    /// Write one character at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, ch: char) -> Result<(), CanvasError> {
        self.check_bounds(x, y)?;
        let idx = self.offset(x, y);
        self.cells[idx] = ch;
        Ok(())
    }

    /// Overlay `text` starting at `(x, y)`; each `\n` advances one row and
    /// returns to the starting column.
    pub fn overlay(&mut self, x: u32, y: u32, text: &str) -> Result<(), CanvasError> {
        let mut cx = x;
        let mut cy = y;
        for ch in text.chars() {
            if ch == '\n' {
                cx = x;
                cy += 1;
            } else {
                self.set(cx, cy, ch)?;
                cx += 1;
            }
        }
        Ok(())
    }

    /// Reset every cell to a space.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Write the canvas to `out` as newline-terminated rows.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for y in 0..self.height {
            let start = self.offset(0, y);
            let row: String = self.cells[start..start + self.width as usize]
                .iter()
                .collect();
            writeln!(out, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let start = self.offset(0, y);
            let row: String = self.cells[start..start + self.width as usize]
                .iter()
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
