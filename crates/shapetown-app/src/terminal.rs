//! Frame-stepping animation driver for the terminal.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use serde::Serialize;
use shapetown_core::{CellKind, Neighborhood, StepSummary};
use tracing::{debug, info};

use crate::canvas::TextCanvas;
use crate::glyph::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Minimum pause between frames so they stay visually distinguishable.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Knobs for one animation run.
#[derive(Debug, Clone)]
pub struct AnimationOptions {
    /// Number of render+relocate frames; the run stops only on exhaustion.
    pub frames: u32,
    /// Real-time pause after each frame; zero skips the pause entirely.
    pub frame_delay: Duration,
    /// Rewind the cursor and redraw in place instead of streaming frames.
    pub rewind_between_frames: bool,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            frames: 1000,
            frame_delay: DEFAULT_FRAME_DELAY,
            rewind_between_frames: false,
        }
    }
}

/// Draw every cell's glyph onto the canvas at its pixel offset.
pub fn render_frame(neighborhood: &Neighborhood, canvas: &mut TextCanvas) -> Result<()> {
    let grid = neighborhood.grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let kind = grid.get(x, y)?;
            glyph::draw(canvas, kind, x * GLYPH_WIDTH, y * GLYPH_HEIGHT)?;
        }
    }
    Ok(())
}

/// Animate `options.frames` frames onto `out`.
///
/// Each frame renders the current grid through the glyph blocks, flushes
/// the canvas, runs one relocation pass, then pauses. Zero frames renders
/// nothing and mutates nothing.
pub fn animate<W: Write>(
    neighborhood: &mut Neighborhood,
    options: &AnimationOptions,
    out: &mut W,
) -> Result<RunReport> {
    let grid = neighborhood.grid();
    let mut canvas = TextCanvas::new(grid.width() * GLYPH_WIDTH, grid.height() * GLYPH_HEIGHT)
        .context("failed to size the frame canvas")?;
    let mut report = RunReport::new(neighborhood);

    for frame in 0..options.frames {
        render_frame(neighborhood, &mut canvas)?;
        if options.rewind_between_frames {
            execute!(out, MoveTo(0, 0), Clear(ClearType::FromCursorDown))
                .context("failed to rewind the terminal cursor")?;
        }
        canvas.render(out).context("failed to flush the frame")?;
        out.flush().context("failed to flush the output sink")?;

        let summary = neighborhood.step()?;
        report.record(&summary);
        debug!(
            frame,
            tick = summary.tick.0,
            relocations = summary.relocations,
            "frame complete"
        );

        if !options.frame_delay.is_zero() {
            thread::sleep(options.frame_delay);
        }
    }

    report.finalize();
    info!(
        frames = report.summary.frame_count,
        total_relocations = report.summary.total_relocations,
        settled = report.summary.settled,
        "animation complete"
    );
    Ok(report)
}

/// Occupancy snapshot taken before the first frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OccupancyStats {
    pub occupied: usize,
    pub triangles: usize,
    pub squares: usize,
}

impl OccupancyStats {
    fn capture(neighborhood: &Neighborhood) -> Self {
        let grid = neighborhood.grid();
        Self {
            occupied: grid.occupied(),
            triangles: grid.count(CellKind::Triangle),
            squares: grid.count(CellKind::Square),
        }
    }
}

/// Per-frame slice of a run report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameStats {
    pub tick: u64,
    pub relocations: usize,
    pub occupied: usize,
}

impl FrameStats {
    fn from_summary(summary: &StepSummary) -> Self {
        Self {
            tick: summary.tick.0,
            relocations: summary.relocations,
            occupied: summary.occupied,
        }
    }
}

/// Aggregate figures for a completed run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub frame_count: usize,
    pub total_relocations: usize,
    pub final_tick: u64,
    /// Whether the last frame relocated nobody.
    pub settled: bool,
}

/// Structured record of an animation run, serializable for headless runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    initial: OccupancyStats,
    frames: Vec<FrameStats>,
    summary: RunSummary,
}

impl RunReport {
    fn new(neighborhood: &Neighborhood) -> Self {
        Self {
            initial: OccupancyStats::capture(neighborhood),
            frames: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    fn record(&mut self, summary: &StepSummary) {
        self.frames.push(FrameStats::from_summary(summary));
    }

    fn finalize(&mut self) {
        self.summary = RunSummary {
            frame_count: self.frames.len(),
            total_relocations: self.frames.iter().map(|frame| frame.relocations).sum(),
            final_tick: self.frames.last().map_or(0, |frame| frame.tick),
            settled: self.frames.last().is_some_and(|frame| frame.relocations == 0),
        };
    }

    #[must_use]
    pub fn initial(&self) -> &OccupancyStats {
        &self.initial
    }

    #[must_use]
    pub fn frames(&self) -> &[FrameStats] {
        &self.frames
    }

    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Serialize the report as pretty JSON at `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("failed to serialize run report")?;
        Ok(())
    }
}
