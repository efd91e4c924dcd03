//! World configuration and match setup shared between conquest_cli and conquest_bench.

use anyhow::{Context, Result};
use conquest_core::geometry::is_well_spaced;
use conquest_core::topology::generate_connections;
use conquest_core::{
    generate_match_id, Counters, GameState, MatchStatus, MetaState, Owner, Planet, PlanetId,
    Point, Rules, Timers,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Board layout loaded from `world.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    pub content_version: String,
    pub width: f64,
    pub height: f64,
    pub planet_count_min: usize,
    pub planet_count_max: usize,
    pub planet_radius: f64,
    /// Minimum planet spacing as a fraction of the shorter board side; also
    /// the margin kept from every board edge.
    pub min_spacing_ratio: f64,
    pub placement_attempts: u32,
    pub starting_garrison: u32,
    /// Home positions as fractions of the board size.
    pub player_home: (f64, f64),
    pub ai_home: (f64, f64),
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            content_version: "0.1.0".to_string(),
            width: 1280.0,
            height: 720.0,
            planet_count_min: 40,
            planet_count_max: 50,
            planet_radius: 20.0,
            min_spacing_ratio: 0.08,
            placement_attempts: 300,
            starting_garrison: 5,
            player_home: (0.25, 0.5),
            ai_home: (0.75, 0.5),
        }
    }
}

impl WorldConfig {
    pub fn min_spacing(&self) -> f64 {
        self.width.min(self.height) * self.min_spacing_ratio
    }

    fn home(&self, fraction: (f64, f64)) -> Point {
        Point::new(self.width * fraction.0, self.height * fraction.1)
    }
}

/// Validates a world config, panicking on any authoring error.
///
/// Catches mistakes like an inverted planet-count range, a margin that leaves
/// no room to place planets, or home planets that overlap.
pub fn validate_world_config(config: &WorldConfig) {
    assert!(
        config.width > 0.0 && config.height > 0.0,
        "board size must be positive, got {}x{}",
        config.width,
        config.height,
    );
    assert!(
        config.planet_count_min >= 2,
        "planet_count_min must leave room for both home planets, got {}",
        config.planet_count_min,
    );
    assert!(
        config.planet_count_min <= config.planet_count_max,
        "planet_count_min {} exceeds planet_count_max {}",
        config.planet_count_min,
        config.planet_count_max,
    );
    assert!(
        config.planet_radius > 0.0,
        "planet_radius must be positive, got {}",
        config.planet_radius,
    );
    let margin = config.min_spacing();
    assert!(
        margin > 0.0 && config.width > 2.0 * margin && config.height > 2.0 * margin,
        "min_spacing_ratio {} leaves no placeable area on a {}x{} board",
        config.min_spacing_ratio,
        config.width,
        config.height,
    );
    assert!(
        config.placement_attempts > 0,
        "placement_attempts must be positive"
    );
    assert!(
        config.starting_garrison > 0,
        "starting_garrison must be positive"
    );
    for (name, (fx, fy)) in [("player_home", config.player_home), ("ai_home", config.ai_home)] {
        assert!(
            (0.0..=1.0).contains(&fx) && (0.0..=1.0).contains(&fy),
            "{name} ({fx}, {fy}) is outside the board",
        );
    }
    let gap = config
        .home(config.player_home)
        .distance_to(config.home(config.ai_home));
    assert!(
        gap >= margin,
        "home planets are {gap:.1} apart, closer than min spacing {margin:.1}",
    );
}

pub fn load_world_config(content_dir: &str) -> Result<WorldConfig> {
    let path = Path::new(content_dir).join("world.json");
    let config: WorldConfig = serde_json::from_str(
        &std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
    )
    .with_context(|| format!("parsing {}", path.display()))?;
    validate_world_config(&config);
    Ok(config)
}

/// Random position inside the margin that keeps min spacing from `planets`,
/// or `None` once the attempts run out.
fn place_planet(config: &WorldConfig, planets: &[Planet], rng: &mut impl Rng) -> Option<Point> {
    let spacing = config.min_spacing();
    for _ in 0..config.placement_attempts {
        let candidate = Point::new(
            rng.gen_range(spacing..config.width - spacing),
            rng.gen_range(spacing..config.height - spacing),
        );
        if is_well_spaced(candidate, planets.iter().map(|p| p.position), spacing) {
            return Some(candidate);
        }
    }
    None
}

/// Player home is planet 0, Ai home is planet 1, the rest are neutral.
///
/// Planets that cannot be placed are skipped, so the result may hold fewer
/// planets than the drawn count.
pub fn generate_planets(config: &WorldConfig, rng: &mut impl Rng) -> Vec<Planet> {
    let target = rng.gen_range(config.planet_count_min..=config.planet_count_max);
    let mut planets = Vec::with_capacity(target);
    for (owner, fraction) in [
        (Owner::Player, config.player_home),
        (Owner::Ai, config.ai_home),
    ] {
        planets.push(Planet::new(
            PlanetId(planets.len()),
            config.home(fraction),
            config.planet_radius,
            owner,
            config.starting_garrison,
        ));
    }

    for slot in 2..target {
        if let Some(position) = place_planet(config, &planets, rng) {
            planets.push(Planet::new(
                PlanetId(planets.len()),
                position,
                config.planet_radius,
                Owner::Neutral,
                0,
            ));
        } else {
            tracing::warn!(
                slot,
                attempts = config.placement_attempts,
                "could not find a valid position for planet; skipping"
            );
        }
    }
    planets
}

pub fn build_initial_state(
    config: &WorldConfig,
    rules: &Rules,
    seed: u64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> GameState {
    let match_id = generate_match_id(rng);
    let planets = generate_planets(config, rng);
    let positions: Vec<Point> = planets.iter().map(|p| p.position).collect();
    let connections = generate_connections(&positions, rules.supplemental_connection_ratio);
    tracing::info!(
        %match_id,
        seed,
        planets = planets.len(),
        connections = connections.len(),
        "world generated"
    );
    GameState {
        meta: MetaState {
            tick: 0,
            seed,
            match_id,
        },
        status: MatchStatus::InProgress,
        planets,
        connections,
        fleets: Vec::new(),
        timers: Timers::starting_at(now_ms),
        selected: None,
        counters: Counters::default(),
    }
}

/// `build_initial_state` driven by a `ChaCha8Rng` seeded from `seed`.
pub fn build_seeded_state(
    config: &WorldConfig,
    rules: &Rules,
    seed: u64,
    now_ms: u64,
) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    build_initial_state(config, rules, seed, now_ms, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_core::topology::degree;

    #[test]
    fn test_default_config_passes_validation() {
        validate_world_config(&WorldConfig::default()); // should not panic
    }

    #[test]
    #[should_panic(expected = "exceeds planet_count_max")]
    fn test_inverted_count_range_panics() {
        let config = WorldConfig {
            planet_count_min: 10,
            planet_count_max: 5,
            ..WorldConfig::default()
        };
        validate_world_config(&config);
    }

    #[test]
    #[should_panic(expected = "leaves no placeable area")]
    fn test_oversized_margin_panics() {
        let config = WorldConfig {
            min_spacing_ratio: 0.6,
            ..WorldConfig::default()
        };
        validate_world_config(&config);
    }

    #[test]
    #[should_panic(expected = "closer than min spacing")]
    fn test_overlapping_homes_panic() {
        let config = WorldConfig {
            ai_home: (0.26, 0.5),
            ..WorldConfig::default()
        };
        validate_world_config(&config);
    }

    #[test]
    fn test_homes_are_first_two_planets() {
        let config = WorldConfig::default();
        let planets = generate_planets(&config, &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(planets[0].owner, Owner::Player);
        assert_eq!(planets[0].position, Point::new(320.0, 360.0));
        assert_eq!(planets[0].garrison, 5);
        assert_eq!(planets[1].owner, Owner::Ai);
        assert_eq!(planets[1].position, Point::new(960.0, 360.0));
        assert_eq!(planets[1].garrison, 5);
        assert!(planets[2..]
            .iter()
            .all(|p| p.owner == Owner::Neutral && p.garrison == 0));
    }

    #[test]
    fn test_planets_respect_spacing_and_margin() {
        let config = WorldConfig::default();
        let spacing = config.min_spacing();
        for seed in 0..10 {
            let planets = generate_planets(&config, &mut ChaCha8Rng::seed_from_u64(seed));
            assert!(planets.len() <= config.planet_count_max);
            for (i, planet) in planets.iter().enumerate() {
                assert_eq!(planet.id, PlanetId(i));
                let x = planet.position.x;
                assert!(x >= spacing && x <= config.width - spacing);
                for other in &planets[i + 1..] {
                    assert!(planet.position.distance_to(other.position) >= spacing);
                }
            }
        }
    }

    #[test]
    fn test_crowded_board_skips_planets() {
        let config = WorldConfig {
            width: 200.0,
            height: 200.0,
            min_spacing_ratio: 0.3,
            player_home: (0.35, 0.5),
            ai_home: (0.65, 0.5),
            placement_attempts: 20,
            ..WorldConfig::default()
        };
        validate_world_config(&config);
        let planets = generate_planets(&config, &mut ChaCha8Rng::seed_from_u64(3));
        assert!(planets.len() < config.planet_count_min);
        assert!(planets.len() >= 2);
    }

    #[test]
    fn test_initial_state_is_connected_and_seeded() {
        let config = WorldConfig::default();
        let state = build_seeded_state(&config, &Rules::default(), 99, 5_000);

        assert_eq!(state.meta.seed, 99);
        assert_eq!(state.meta.tick, 0);
        assert_eq!(state.timers.last_production_ms, 5_000);
        assert_eq!(state.timers.last_strategic_ms, 5_000);
        for planet in &state.planets {
            assert!(degree(&state.connections, planet.id) >= 1);
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = WorldConfig::default();
        let rules = Rules::default();
        let a = build_seeded_state(&config, &rules, 5, 0);
        let b = build_seeded_state(&config, &rules, 5, 0);
        assert_eq!(a.meta.match_id, b.meta.match_id);
        assert_eq!(a.planets, b.planets);
        assert_eq!(a.connections, b.connections);

        let c = build_seeded_state(&config, &rules, 6, 0);
        assert_ne!(a.meta.match_id, c.meta.match_id);
    }
}
