use std::env;
use std::fs;
use std::time::Duration;

use shapetown_app::terminal::{AnimationOptions, animate};
use shapetown_app::{GLYPH_HEIGHT, GLYPH_WIDTH};
use shapetown_core::{CellKind, Neighborhood, NeighborhoodConfig};

fn seeded_config(seed: u64) -> NeighborhoodConfig {
    NeighborhoodConfig {
        width: 6,
        height: 4,
        ratio_filled: 0.5,
        rng_seed: Some(seed),
        ..NeighborhoodConfig::default()
    }
}

fn headless_options(frames: u32) -> AnimationOptions {
    AnimationOptions {
        frames,
        frame_delay: Duration::ZERO,
        rewind_between_frames: false,
    }
}

#[test]
fn seeded_animations_emit_identical_output() {
    let mut out_a = Vec::new();
    let mut out_b = Vec::new();

    let mut a = Neighborhood::new(seeded_config(0xCAFE)).expect("a");
    let mut b = Neighborhood::new(seeded_config(0xCAFE)).expect("b");
    animate(&mut a, &headless_options(6), &mut out_a).expect("animate a");
    animate(&mut b, &headless_options(6), &mut out_b).expect("animate b");

    assert!(!out_a.is_empty());
    assert_eq!(out_a, out_b);
    assert_eq!(a.grid(), b.grid());
}

#[test]
fn animation_preserves_population_and_frame_geometry() {
    let mut neighborhood = Neighborhood::new(seeded_config(99)).expect("neighborhood");
    let triangles = neighborhood.grid().count(CellKind::Triangle);
    let squares = neighborhood.grid().count(CellKind::Square);

    let mut out = Vec::new();
    let report = animate(&mut neighborhood, &headless_options(8), &mut out).expect("animate");

    assert_eq!(neighborhood.grid().count(CellKind::Triangle), triangles);
    assert_eq!(neighborhood.grid().count(CellKind::Square), squares);

    let text = String::from_utf8(out).expect("utf8");
    let rows_per_frame = 4 * GLYPH_HEIGHT as usize;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8 * rows_per_frame);
    assert!(
        lines
            .iter()
            .all(|line| line.chars().count() == 6 * GLYPH_WIDTH as usize)
    );
    assert_eq!(report.summary().frame_count, 8);
    assert_eq!(report.summary().final_tick, 8);
}

#[test]
fn run_report_round_trips_through_json() {
    let mut neighborhood = Neighborhood::new(seeded_config(5)).expect("neighborhood");
    let mut out = Vec::new();
    let report = animate(&mut neighborhood, &headless_options(4), &mut out).expect("animate");

    let path = env::temp_dir().join(format!("shapetown-report-{}.json", std::process::id()));
    report.write_json(&path).expect("write report");

    let raw = fs::read_to_string(&path).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse report");
    assert_eq!(value["summary"]["frame_count"], 4);
    assert_eq!(
        value["initial"]["occupied"],
        serde_json::json!(report.initial().occupied)
    );
    assert_eq!(value["frames"].as_array().map(Vec::len), Some(4));

    let _ = fs::remove_file(&path);
}
