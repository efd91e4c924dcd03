//! Shared test fixtures for conquest_core and downstream crates.
//!
//! `duel_state()` is the two-planet match used by most engine tests.
//! `state_from()` builds arbitrary boards with hand-picked connections so
//! tests do not depend on the topology generator.

use crate::{
    Connection, ConnectionKind, Counters, GameState, MatchStatus, MetaState, Owner, Planet,
    PlanetId, Point, Timers,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Wall-clock origin used by fixture states; timers start here.
pub const START_MS: u64 = 1_000_000;

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

pub fn planet(id: usize, x: f64, y: f64, owner: Owner, garrison: u32) -> Planet {
    Planet::new(PlanetId(id), Point::new(x, y), 20.0, owner, garrison)
}

pub fn edge(a: usize, b: usize) -> Connection {
    Connection {
        a: PlanetId(a),
        b: PlanetId(b),
        kind: ConnectionKind::Tree,
    }
}

/// A state over `planets` (ids must equal their index) joined by `edges`.
pub fn state_from(planets: Vec<Planet>, edges: Vec<Connection>) -> GameState {
    for (index, planet) in planets.iter().enumerate() {
        assert_eq!(planet.id, PlanetId(index), "fixture planet ids must be indices");
    }
    GameState {
        meta: MetaState {
            tick: 0,
            seed: 42,
            match_id: Uuid::nil(),
        },
        status: MatchStatus::InProgress,
        planets,
        connections: edges,
        fleets: Vec::new(),
        timers: Timers::starting_at(START_MS),
        selected: None,
        counters: Counters::default(),
    }
}

/// Player planet 0 at (100, 100) and Ai planet 1 at (300, 100), directly connected.
pub fn duel_state(player_garrison: u32, ai_garrison: u32) -> GameState {
    state_from(
        vec![
            planet(0, 100.0, 100.0, Owner::Player, player_garrison),
            planet(1, 300.0, 100.0, Owner::Ai, ai_garrison),
        ],
        vec![edge(0, 1)],
    )
}

/// Player home, a neutral hub, and an Ai home in a line: 0 - 1 - 2.
pub fn corridor_state(player_garrison: u32, ai_garrison: u32) -> GameState {
    state_from(
        vec![
            planet(0, 100.0, 100.0, Owner::Player, player_garrison),
            planet(1, 300.0, 100.0, Owner::Neutral, 0),
            planet(2, 500.0, 100.0, Owner::Ai, ai_garrison),
        ],
        vec![edge(0, 1), edge(1, 2)],
    )
}
