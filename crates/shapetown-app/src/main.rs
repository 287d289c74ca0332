use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use shapetown_app::terminal::{self, AnimationOptions};
use shapetown_core::{Neighborhood, NeighborhoodConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "shapetown",
    version,
    about = "Terminal Schelling-style neighborhood simulation"
)]
struct Cli {
    /// Neighborhood width in cells (16 glyph blocks span an 80-column terminal).
    #[arg(long, default_value_t = 16)]
    width: u32,

    /// Neighborhood height in cells.
    #[arg(long, default_value_t = 8)]
    height: u32,

    /// Number of frames to animate.
    #[arg(long, default_value_t = 1000)]
    frames: u32,

    /// RNG seed; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Target fraction of cells occupied at start, in [0, 1).
    #[arg(long, default_value_t = 0.5)]
    ratio_filled: f64,

    /// Minimum alike/different neighbor ratio for an occupant to stay put.
    #[arg(long, default_value_t = 0.33)]
    ratio_alike_happy: f64,

    /// Minimum different/alike neighbor ratio for an occupant to stay put.
    #[arg(long, default_value_t = 0.05)]
    ratio_different_happy: f64,

    /// Delay between frames in milliseconds.
    #[arg(long, default_value_t = 100)]
    frame_delay_ms: u64,

    /// Stream frames instead of redrawing the terminal in place.
    #[arg(long)]
    headless: bool,

    /// Write a JSON run report to this path when the animation finishes.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = NeighborhoodConfig {
        width: cli.width,
        height: cli.height,
        ratio_filled: cli.ratio_filled,
        ratio_alike_happy: cli.ratio_alike_happy,
        ratio_different_happy: cli.ratio_different_happy,
        rng_seed: cli.seed,
        ..NeighborhoodConfig::default()
    };
    let mut neighborhood = Neighborhood::new(config)?;
    info!(
        width = cli.width,
        height = cli.height,
        frames = cli.frames,
        occupied = neighborhood.grid().occupied(),
        "starting neighborhood animation"
    );

    let options = AnimationOptions {
        frames: cli.frames,
        frame_delay: Duration::from_millis(cli.frame_delay_ms),
        rewind_between_frames: !cli.headless,
    };
    let report = terminal::animate(&mut neighborhood, &options, &mut io::stdout())?;

    if let Some(path) = cli.report {
        report.write_json(&path)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}
