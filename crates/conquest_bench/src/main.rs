use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod run_result;
mod runner;
mod seeds;
mod summary;

#[derive(Parser)]
#[command(
    name = "conquest_bench",
    about = "Batch runner for computer-vs-computer conquest matches"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match per seed in parallel.
    Run {
        /// Seeds: `1..=32`, `1..33`, or a comma-separated list.
        #[arg(long, default_value = "1..=32")]
        seeds: String,
        #[arg(long, default_value_t = 36_000)]
        max_ticks: u64,
        /// Synthetic wall-clock milliseconds per tick.
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
        /// Sample metrics every N ticks.
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        metrics_every: u64,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

fn run(
    seed_spec: &str,
    settings: runner::RunSettings,
    content_dir: &str,
    output_dir: &str,
) -> Result<()> {
    let seeds = seeds::parse_seeds(seed_spec)?;
    let config = conquest_world::load_world_config(content_dir)?;

    println!(
        "Running {} seeds × {} max ticks ({} ms/tick)",
        seeds.len(),
        settings.max_ticks,
        settings.tick_ms
    );

    // Create timestamped output directory.
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("bench_{timestamp}"));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    println!("Output: {}", run_dir.display());

    // Run all seeds in parallel.
    let results: Vec<Result<runner::SeedResult>> = seeds
        .par_iter()
        .map(|&seed| {
            let seed_dir = run_dir.join(format!("seed_{seed}"));
            runner::run_seed(&config, seed, settings, &seed_dir)
        })
        .collect();

    // Collect results, reporting any failures.
    let mut seed_results = Vec::new();
    for result in results {
        match result {
            Ok(seed_result) => seed_results.push(seed_result),
            Err(err) => eprintln!("Seed failed: {err:#}"),
        }
    }
    if seed_results.is_empty() {
        anyhow::bail!("all seeds failed");
    }

    let rows: Vec<run_result::ResultRow> = seed_results
        .iter()
        .map(|r| run_result::ResultRow::new(r.seed, r.winner, &r.final_snapshot, r.wall_time_ms))
        .collect();
    let results_path = run_dir.join("results.csv");
    run_result::write_results_csv(&results_path, &rows)
        .with_context(|| format!("writing {}", results_path.display()))?;

    let stats = summary::compute_summary(&seed_results);
    summary::print_summary(seed_results.len(), settings.max_ticks, &stats);

    let summary_path = run_dir.join("summary.json");
    let summary_json = serde_json::to_string_pretty(&stats).context("serializing summary")?;
    std::fs::write(&summary_path, summary_json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    println!("Results written to {}", results_path.display());
    println!("Summary written to {}", summary_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            seeds,
            max_ticks,
            tick_ms,
            metrics_every,
            content_dir,
            output_dir,
        } => {
            let settings = runner::RunSettings {
                max_ticks,
                tick_ms,
                metrics_every,
            };
            run(&seeds, settings, &content_dir, &output_dir)?;
        }
    }
    Ok(())
}
