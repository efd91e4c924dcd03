use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use conquest_control::{Autoplay, OpponentController};
use conquest_core::{compute_metrics, Event, GameState, Match, MetricsFileWriter, Owner, Rules};
use conquest_world::{build_seeded_state, load_world_config};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "conquest_cli", about = "Territory conquest simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match headlessly against the built-in opponent.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Stop after this many ticks even if the match is still going.
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    /// World seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Synthetic wall-clock milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    print_every: u64,
    /// Sample metrics every N ticks.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    metrics_every: u64,
    /// Let a second controller play the player side.
    #[arg(long)]
    autoplay: bool,
    /// Disable automatic metrics collection to runs/ directory.
    #[arg(long)]
    no_metrics: bool,
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{timestamp}_seed{seed}")
}

fn create_run_dir(run_id: &str) -> Result<PathBuf> {
    let dir = PathBuf::from("runs").join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

fn write_run_info(
    dir: &Path,
    run_id: &str,
    seed: u64,
    args: &RunArgs,
    content_version: &str,
) -> Result<()> {
    let info = serde_json::json!({
        "run_id": run_id,
        "seed": seed,
        "content_version": content_version,
        "metrics_every": args.metrics_every,
        "runner": "conquest_cli",
        "args": {
            "max_ticks": args.max_ticks,
            "tick_ms": args.tick_ms,
            "print_every": args.print_every,
            "autoplay": args.autoplay,
        }
    });
    let path = dir.join("run_info.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &info)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn run(args: &RunArgs) -> Result<()> {
    let config = load_world_config(&args.content_dir)?;
    let rules = Rules::default();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut now_ms = 0u64;
    let state = build_seeded_state(&config, &rules, seed, now_ms);

    // Set up per-run metrics directory.
    let mut metrics_writer: Option<MetricsFileWriter> = None;
    if !args.no_metrics {
        let run_id = generate_run_id(seed);
        let run_dir = create_run_dir(&run_id)?;
        write_run_info(&run_dir, &run_id, seed, args, &config.content_version)?;
        let writer = MetricsFileWriter::new(&run_dir)
            .with_context(|| format!("opening metrics CSV in {}", run_dir.display()))?;
        metrics_writer = Some(writer);
        println!("Run directory: {}", run_dir.display());
    }

    println!(
        "Starting match: seed={seed} match_id={} planets={} connections={} autoplay={}",
        state.meta.match_id,
        state.planets.len(),
        state.connections.len(),
        args.autoplay,
    );
    println!("{}", "-".repeat(80));

    let mut game = Match::new(state, rules, OpponentController::default());
    let mut autoplay = args.autoplay.then(|| Autoplay::new(Owner::Player, now_ms));

    for _ in 0..args.max_ticks {
        now_ms += args.tick_ms;
        if let Some(player) = autoplay.as_mut() {
            player.drive(&mut game, now_ms);
        }
        let outcome = game.tick(now_ms);

        // Print notable events regardless of print_every.
        for envelope in &outcome.events {
            print_notable(envelope.tick, &envelope.event);
        }

        let tick = game.state().meta.tick;
        if tick % args.print_every == 0 {
            print_status(game.state(), now_ms);
        }
        if let Some(ref mut writer) = metrics_writer {
            if tick % args.metrics_every == 0 {
                let snapshot = compute_metrics(game.state());
                writer.write_row(&snapshot).context("writing metrics row")?;
            }
        }
        if outcome.status.is_over() {
            break;
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "Done. {:?} at tick {}:",
        game.status(),
        game.state().meta.tick
    );
    print_status(game.state(), now_ms);

    if let Some(ref mut writer) = metrics_writer {
        writer.flush().context("final metrics flush")?;
        println!("Metrics written to {}", writer.path().display());
    }

    Ok(())
}

fn print_notable(tick: u64, event: &Event) {
    match event {
        Event::PlanetCaptured {
            planet,
            previous_owner,
            new_owner,
            garrison,
        } => println!(
            "*** {new_owner} captured {planet} from {previous_owner} \
             with {garrison} units at tick={tick:05} ***"
        ),
        Event::MatchEnded { winner } => {
            println!("*** MATCH OVER: {winner} wins at tick={tick:05} ***");
        }
        _ => {}
    }
}

fn print_status(state: &GameState, now_ms: u64) {
    let m = compute_metrics(state);
    let seconds = now_ms / 1000;
    println!(
        "[tick={tick:05}  t={seconds:4}s]  \
         player={pp:2} ({pg:4} units)  ai={ap:2} ({ag:4} units)  neutral={np:2}  \
         fleets={fl:3}  links={links}",
        tick = m.tick,
        pp = m.player_planets,
        pg = m.player_garrison + m.player_units_in_flight,
        ap = m.ai_planets,
        ag = m.ai_garrison + m.ai_units_in_flight,
        np = m.neutral_planets,
        fl = m.fleets_in_flight,
        links = m.auto_transfer_links,
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(&args)?,
    }
    Ok(())
}
