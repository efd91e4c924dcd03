//! `conquest_core` — deterministic territory-conquest simulation.
//!
//! No IO beyond the optional metrics writer. Time enters only through the
//! `now_ms` passed to each tick; randomness only through a caller-supplied Rng.

mod arrival;
mod commands;
mod engine;
mod fleet;
pub mod geometry;
mod id;
pub mod metrics;
mod session;
pub mod topology;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use arrival::{locate_destination, resolve_arrival};
pub use commands::apply_command;
pub use engine::{planet_count, tick, Opponent, PassiveOpponent};
pub use fleet::{resolve_battle, Advance, BattleOutcome};
pub use id::generate_match_id;
pub use metrics::{compute_metrics, MetricsFileWriter, MetricsSnapshot};
pub use session::{Match, TickOutcome};
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(counters.next_event_id);
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

pub(crate) fn push_event(state: &mut GameState, events: &mut Vec<EventEnvelope>, event: Event) {
    let tick = state.meta.tick;
    events.push(emit(&mut state.counters, tick, event));
}

#[cfg(test)]
mod tests;
