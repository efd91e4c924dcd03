use crate::run_result::{self, RunResult};
use anyhow::{Context, Result};
use conquest_control::{Autoplay, OpponentController};
use conquest_core::{compute_metrics, Match, MetricsFileWriter, MetricsSnapshot, Owner, Rules};
use conquest_world::{build_seeded_state, WorldConfig};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

/// Per-seed match settings shared by every seed in a batch.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub max_ticks: u64,
    pub tick_ms: u64,
    pub metrics_every: u64,
}

pub struct SeedResult {
    pub seed: u64,
    pub winner: Option<Owner>,
    pub final_snapshot: MetricsSnapshot,
    pub wall_time_ms: u64,
}

/// Plays one computer-vs-computer match and writes its run directory.
pub fn run_seed(
    config: &WorldConfig,
    seed: u64,
    settings: RunSettings,
    seed_dir: &Path,
) -> Result<SeedResult> {
    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    let rules = Rules::default();
    let mut now_ms = 0u64;
    let state = build_seeded_state(config, &rules, seed, now_ms);
    let match_id = state.meta.match_id.to_string();
    let mut game = Match::new(state, rules, OpponentController::default());
    let mut player = Autoplay::new(Owner::Player, now_ms);

    std::fs::create_dir_all(seed_dir)
        .with_context(|| format!("creating seed directory: {}", seed_dir.display()))?;
    let mut metrics_writer = MetricsFileWriter::new(seed_dir)
        .with_context(|| format!("opening metrics CSV in {}", seed_dir.display()))?;

    for _ in 0..settings.max_ticks {
        now_ms += settings.tick_ms;
        player.drive(&mut game, now_ms);
        let outcome = game.tick(now_ms);

        if game.state().meta.tick % settings.metrics_every == 0 {
            metrics_writer
                .write_row(&compute_metrics(game.state()))
                .context("writing metrics row")?;
        }
        if outcome.status.is_over() {
            break;
        }
    }

    // Always capture final snapshot
    let final_snapshot = compute_metrics(game.state());
    if final_snapshot.tick % settings.metrics_every != 0 {
        metrics_writer
            .write_row(&final_snapshot)
            .context("writing final metrics row")?;
    }
    metrics_writer.flush().context("flushing metrics")?;

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = start.elapsed().as_millis() as u64;
    let sim_ticks_per_second = if wall_time_ms > 0 {
        (final_snapshot.tick as f64) / (wall_time_ms as f64 / 1000.0)
    } else {
        0.0
    };
    let winner = game.status().winner();
    tracing::info!(seed, ?winner, ticks = final_snapshot.tick, wall_time_ms, "seed finished");

    let run_result = RunResult {
        run_schema_version: 1,
        run_id,
        git_sha: run_result::git_sha(),
        git_dirty: run_result::git_dirty(),
        seed,
        match_id,
        winner,
        tick_end: final_snapshot.tick,
        max_ticks: settings.max_ticks,
        tick_ms: settings.tick_ms,
        wall_time_ms,
        sim_ticks_per_second,
        final_metrics: final_snapshot.clone(),
        metrics_path: "metrics_000.csv".to_string(),
    };
    run_result
        .write_atomic(&seed_dir.join("run_result.json"))
        .context("writing run_result.json")?;

    Ok(SeedResult {
        seed,
        winner,
        final_snapshot,
        wall_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHORT: RunSettings = RunSettings {
        max_ticks: 120,
        tick_ms: 16,
        metrics_every: 60,
    };

    #[test]
    fn test_run_seed_produces_output() {
        let temp_dir = TempDir::new().unwrap();
        let seed_dir = temp_dir.path().join("seed_42");

        let result = run_seed(&WorldConfig::default(), 42, SHORT, &seed_dir).unwrap();

        assert_eq!(result.seed, 42);
        assert_eq!(result.final_snapshot.tick, 120);
        assert_eq!(result.winner, None);
        assert!(seed_dir.join("metrics_000.csv").exists());
        assert!(seed_dir.join("run_result.json").exists());

        let metrics = std::fs::read_to_string(seed_dir.join("metrics_000.csv")).unwrap();
        // Header plus samples at ticks 60 and 120.
        assert_eq!(metrics.lines().count(), 3);

        let content_str = std::fs::read_to_string(seed_dir.join("run_result.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content_str).unwrap();
        assert_eq!(parsed["run_schema_version"], 1);
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["tick_end"], 120);
        assert!(parsed["final_metrics"].is_object());
    }

    #[test]
    fn test_run_seed_determinism() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        let config = WorldConfig::default();

        let result1 = run_seed(&config, 42, SHORT, &dir1.path().join("seed_42")).unwrap();
        let result2 = run_seed(&config, 42, SHORT, &dir2.path().join("seed_42")).unwrap();

        assert_eq!(result1.final_snapshot.tick, result2.final_snapshot.tick);
        assert_eq!(
            result1.final_snapshot.player_planets,
            result2.final_snapshot.player_planets
        );
        assert_eq!(
            result1.final_snapshot.ai_garrison,
            result2.final_snapshot.ai_garrison
        );
        let read = |dir: &TempDir| {
            std::fs::read_to_string(dir.path().join("seed_42/metrics_000.csv")).unwrap()
        };
        assert_eq!(read(&dir1), read(&dir2));
    }
}
