use conquest_core::{MetricsSnapshot, Owner};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Per-seed record written to `run_result.json`.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub run_schema_version: u32,
    pub run_id: String,
    pub git_sha: String,
    pub git_dirty: bool,
    pub seed: u64,
    pub match_id: String,
    pub winner: Option<Owner>,
    pub tick_end: u64,
    pub max_ticks: u64,
    pub tick_ms: u64,
    pub wall_time_ms: u64,
    pub sim_ticks_per_second: f64,
    pub final_metrics: MetricsSnapshot,
    pub metrics_path: String,
}

impl RunResult {
    /// Write JSON atomically: write to `.tmp` then rename.
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// One row of the batch-level `results.csv`.
#[derive(Debug, Serialize)]
pub struct ResultRow {
    pub seed: u64,
    pub outcome: String,
    pub ticks: u64,
    pub player_planets: u32,
    pub ai_planets: u32,
    pub neutral_planets: u32,
    pub player_units: u64,
    pub ai_units: u64,
    pub wall_time_ms: u64,
}

impl ResultRow {
    pub fn new(
        seed: u64,
        winner: Option<Owner>,
        snapshot: &MetricsSnapshot,
        wall_time_ms: u64,
    ) -> Self {
        Self {
            seed,
            outcome: winner.map_or_else(|| "unfinished".to_string(), |w| w.to_string()),
            ticks: snapshot.tick,
            player_planets: snapshot.player_planets,
            ai_planets: snapshot.ai_planets,
            neutral_planets: snapshot.neutral_planets,
            player_units: snapshot.player_garrison + snapshot.player_units_in_flight,
            ai_units: snapshot.ai_garrison + snapshot.ai_units_in_flight,
            wall_time_ms,
        }
    }
}

pub fn write_results_csv(path: &Path, rows: &[ResultRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn git_sha() -> String {
    env!("GIT_SHA").to_string()
}

pub fn git_dirty() -> bool {
    env!("GIT_DIRTY") == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            tick: 1000,
            metrics_version: 1,
            player_planets: 12,
            ai_planets: 0,
            neutral_planets: 30,
            player_garrison: 40,
            ai_garrison: 0,
            fleets_in_flight: 2,
            player_units_in_flight: 9,
            ai_units_in_flight: 0,
            auto_transfer_links: 3,
        }
    }

    #[test]
    fn test_row_sums_stationed_and_flying_units() {
        let row = ResultRow::new(7, Some(Owner::Player), &sample_snapshot(), 15);
        assert_eq!(row.outcome, "player");
        assert_eq!(row.ticks, 1000);
        assert_eq!(row.player_units, 49);
        assert_eq!(row.ai_units, 0);
    }

    #[test]
    fn test_unfinished_row() {
        let row = ResultRow::new(7, None, &sample_snapshot(), 15);
        assert_eq!(row.outcome, "unfinished");
    }

    #[test]
    fn test_results_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let rows = vec![
            ResultRow::new(1, Some(Owner::Ai), &sample_snapshot(), 10),
            ResultRow::new(2, None, &sample_snapshot(), 11),
        ];
        write_results_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("seed,outcome,ticks,"));
        assert!(lines[1].starts_with("1,ai,1000,"));
        assert!(lines[2].starts_with("2,unfinished,1000,"));
    }

    #[test]
    fn test_run_result_serializes_winner() {
        let result = RunResult {
            run_schema_version: 1,
            run_id: "run".to_string(),
            git_sha: git_sha(),
            git_dirty: git_dirty(),
            seed: 3,
            match_id: "m".to_string(),
            winner: Some(Owner::Ai),
            tick_end: 1000,
            max_ticks: 2000,
            tick_ms: 16,
            wall_time_ms: 5,
            sim_ticks_per_second: 200_000.0,
            final_metrics: sample_snapshot(),
            metrics_path: "metrics_000.csv".to_string(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_result.json");
        result.write_atomic(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["winner"], "Ai");
        assert_eq!(parsed["final_metrics"]["player_planets"], 12);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
