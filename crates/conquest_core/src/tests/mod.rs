use super::*;
use crate::test_fixtures::{corridor_state, duel_state, edge, planet, state_from, START_MS};

mod battles;
mod scenarios;

// --- Shared test helpers ------------------------------------------------

fn passive_match(state: GameState) -> Match<PassiveOpponent> {
    Match::new(state, Rules::default(), PassiveOpponent)
}

/// Ticks at a frozen clock (so no throttled cadence fires) until no fleets
/// remain. Returns every event produced.
fn fly_until_empty<O: Opponent>(game: &mut Match<O>, max_ticks: u32) -> Vec<EventEnvelope> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        let outcome = game.tick(START_MS);
        events.extend(outcome.events);
        if game.state().fleets.is_empty() {
            return events;
        }
    }
    panic!("fleets still in flight after {max_ticks} ticks");
}

fn snapshot_bytes<O: Opponent>(game: &Match<O>) -> Vec<u8> {
    serde_json::to_vec(&game.snapshot()).unwrap()
}
