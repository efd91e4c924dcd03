use crate::runner::SeedResult;
use conquest_core::{MetricsSnapshot, Owner};
use serde::Serialize;

type Extractor = (&'static str, Box<dyn Fn(&MetricsSnapshot) -> f64>);

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub seed_count: usize,
    pub player_wins: usize,
    pub ai_wins: usize,
    pub unfinished: usize,
    /// Mean final tick over finished matches; `None` if none finished.
    pub mean_ticks_to_finish: Option<f64>,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

fn extractors() -> Vec<Extractor> {
    vec![
        ("final_tick", Box::new(|s| s.tick as f64)),
        ("player_planets", Box::new(|s| f64::from(s.player_planets))),
        ("ai_planets", Box::new(|s| f64::from(s.ai_planets))),
        (
            "neutral_planets",
            Box::new(|s| f64::from(s.neutral_planets)),
        ),
        (
            "player_units",
            Box::new(|s| (s.player_garrison + s.player_units_in_flight) as f64),
        ),
        (
            "ai_units",
            Box::new(|s| (s.ai_garrison + s.ai_units_in_flight) as f64),
        ),
    ]
}

pub fn compute_summary(results: &[SeedResult]) -> SummaryStats {
    let count_wins = |side: Owner| results.iter().filter(|r| r.winner == Some(side)).count();
    let finished: Vec<f64> = results
        .iter()
        .filter(|r| r.winner.is_some())
        .map(|r| r.final_snapshot.tick as f64)
        .collect();
    let mean_ticks_to_finish =
        (!finished.is_empty()).then(|| finished.iter().sum::<f64>() / finished.len() as f64);

    let metrics = extractors()
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = results.iter().map(|r| extract(&r.final_snapshot)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    SummaryStats {
        seed_count: results.len(),
        player_wins: count_wins(Owner::Player),
        ai_wins: count_wins(Owner::Ai),
        unfinished: results.len() - finished.len(),
        mean_ticks_to_finish,
        metrics,
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> MetricSummary {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let stddev = variance.sqrt();

    MetricSummary {
        name: name.to_string(),
        mean,
        min,
        max,
        stddev,
    }
}

pub fn print_summary(seeds: usize, max_ticks: u64, stats: &SummaryStats) {
    println!();
    println!("=== Batch Summary: {seeds} seeds × {max_ticks} max ticks ===");
    println!(
        "Outcomes: player={}  ai={}  unfinished={}",
        stats.player_wins, stats.ai_wins, stats.unfinished
    );
    if let Some(mean) = stats.mean_ticks_to_finish {
        println!("Mean ticks to finish: {mean:.1}");
    }
    println!();
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(64));
    for m in &stats.metrics {
        println!(
            "{:<20} {:>10.1} {:>10.1} {:>10.1} {:>10.2}",
            m.name, m.mean, m.min, m.max, m.stddev
        );
    }
}
