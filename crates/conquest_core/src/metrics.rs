//! Snapshot metrics computed from `GameState`.
//!
//! `compute_metrics(&GameState) -> MetricsSnapshot` samples the current state
//! for time-series analysis. No state mutation, no IO.

use crate::{GameState, Owner};
use serde::Serialize;
use std::io::Write;

/// Current schema version — bump when fields are added/removed/reordered.
const METRICS_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub metrics_version: u32,

    // Territory
    pub player_planets: u32,
    pub ai_planets: u32,
    pub neutral_planets: u32,

    // Stationed units
    pub player_garrison: u64,
    pub ai_garrison: u64,

    // In flight
    pub fleets_in_flight: u32,
    pub player_units_in_flight: u64,
    pub ai_units_in_flight: u64,

    // Standing orders
    pub auto_transfer_links: u32,
}

#[allow(clippy::cast_possible_truncation)]
pub fn compute_metrics(state: &GameState) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot {
        tick: state.meta.tick,
        metrics_version: METRICS_VERSION,
        player_planets: 0,
        ai_planets: 0,
        neutral_planets: 0,
        player_garrison: 0,
        ai_garrison: 0,
        fleets_in_flight: state.fleets.len() as u32,
        player_units_in_flight: 0,
        ai_units_in_flight: 0,
        auto_transfer_links: 0,
    };

    for planet in &state.planets {
        match planet.owner {
            Owner::Player => {
                snapshot.player_planets += 1;
                snapshot.player_garrison += u64::from(planet.garrison);
            }
            Owner::Ai => {
                snapshot.ai_planets += 1;
                snapshot.ai_garrison += u64::from(planet.garrison);
            }
            Owner::Neutral => snapshot.neutral_planets += 1,
        }
        if planet.auto_transfer_target.is_some() {
            snapshot.auto_transfer_links += 1;
        }
    }

    for fleet in state.fleets.iter().filter(|f| !f.destroyed) {
        match fleet.owner {
            Owner::Player => snapshot.player_units_in_flight += u64::from(fleet.units),
            Owner::Ai => snapshot.ai_units_in_flight += u64::from(fleet.units),
            Owner::Neutral => {}
        }
    }

    snapshot
}

/// Write the CSV header row for metrics.
pub fn write_metrics_header(writer: &mut impl std::io::Write) -> std::io::Result<()> {
    writeln!(
        writer,
        "tick,metrics_version,\
         player_planets,ai_planets,neutral_planets,\
         player_garrison,ai_garrison,\
         fleets_in_flight,player_units_in_flight,ai_units_in_flight,\
         auto_transfer_links"
    )
}

/// Append a single metrics snapshot as a CSV row.
pub fn append_metrics_row(
    writer: &mut impl std::io::Write,
    snapshot: &MetricsSnapshot,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{},{},{},{},{},{},{}",
        snapshot.tick,
        snapshot.metrics_version,
        snapshot.player_planets,
        snapshot.ai_planets,
        snapshot.neutral_planets,
        snapshot.player_garrison,
        snapshot.ai_garrison,
        snapshot.fleets_in_flight,
        snapshot.player_units_in_flight,
        snapshot.ai_units_in_flight,
        snapshot.auto_transfer_links,
    )
}

/// Buffered metrics CSV writer for one run directory (`metrics_000.csv`).
pub struct MetricsFileWriter {
    path: std::path::PathBuf,
    writer: std::io::BufWriter<std::fs::File>,
}

impl MetricsFileWriter {
    /// Create a new writer, opening the CSV file with a header row.
    pub fn new(run_dir: &std::path::Path) -> std::io::Result<Self> {
        let path = run_dir.join("metrics_000.csv");
        let file = std::fs::File::create(&path)?;
        let mut writer = std::io::BufWriter::new(file);
        write_metrics_header(&mut writer)?;
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn write_row(&mut self, snapshot: &MetricsSnapshot) -> std::io::Result<()> {
        append_metrics_row(&mut self.writer, snapshot)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
