use crate::arrival::{locate_destination, resolve_arrival};
use crate::commands::{apply_command, launch_fleet};
use crate::fleet::{resolve_battle, Advance};
use crate::push_event;
use crate::{
    ArrivalOutcome, Event, EventEnvelope, GameState, MatchStatus, Owner, PlanetId, Rules,
};

/// The computer-controlled side's decision seam.
///
/// The engine calls the opportunistic pass every tick and the strategic pass
/// once its cooldown has elapsed. Commands are applied in order right after
/// each pass returns.
pub trait Opponent {
    fn opportunistic_commands(&mut self, state: &GameState, rules: &Rules) -> Vec<crate::Command>;

    /// `actions_taken` counts launches already made this tick.
    fn strategic_commands(
        &mut self,
        state: &GameState,
        rules: &Rules,
        actions_taken: usize,
    ) -> Vec<crate::Command>;
}

/// An opponent that never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveOpponent;

impl Opponent for PassiveOpponent {
    fn opportunistic_commands(&mut self, _: &GameState, _: &Rules) -> Vec<crate::Command> {
        Vec::new()
    }

    fn strategic_commands(&mut self, _: &GameState, _: &Rules, _: usize) -> Vec<crate::Command> {
        Vec::new()
    }
}

/// Advance the simulation by one tick at wall-clock time `now_ms`.
///
/// Order of operations:
/// 1. Production, if its interval has elapsed.
/// 2. Fleet battles over all live pairs, then advancement and arrivals.
/// 3. Auto-transfer launches, if their interval has elapsed.
/// 4. Opponent passes.
/// 5. Win check.
/// 6. Increment tick counter.
///
/// A finished match is terminal: the state is left untouched and no events
/// are produced.
pub fn tick(
    state: &mut GameState,
    rules: &Rules,
    now_ms: u64,
    opponent: &mut impl Opponent,
) -> Vec<EventEnvelope> {
    let mut events = Vec::new();
    if state.status.is_over() {
        return events;
    }

    apply_production(state, rules, now_ms, &mut events);
    update_fleets(state, rules, &mut events);
    run_auto_transfers(state, rules, now_ms, &mut events);
    run_opponent(state, rules, now_ms, opponent, &mut events);
    check_winner(state, &mut events);

    state.meta.tick += 1;
    events
}

/// Counts planets held by `owner`.
pub fn planet_count(state: &GameState, owner: Owner) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let count = state.planets.iter().filter(|p| p.owner == owner).count() as u32;
    count
}

fn apply_production(
    state: &mut GameState,
    rules: &Rules,
    now_ms: u64,
    events: &mut Vec<EventEnvelope>,
) {
    if now_ms.saturating_sub(state.timers.last_production_ms) < rules.production_interval_ms {
        return;
    }
    let mut producing = 0;
    for planet in state.planets.iter_mut().filter(|p| p.owner.is_side()) {
        planet.garrison += 1;
        producing += 1;
    }
    state.timers.last_production_ms = now_ms;
    push_event(state, events, Event::ProductionApplied { planets: producing });
}

/// Pairwise battles first, so a fleet destroyed this tick can never arrive
/// this tick. Destroyed and arrived fleets leave the live set.
fn update_fleets(state: &mut GameState, rules: &Rules, events: &mut Vec<EventEnvelope>) {
    resolve_battles(state, rules, events);

    // Walk newest-first; arrivals within one tick resolve in that order.
    let mut arrived = Vec::new();
    let mut index = state.fleets.len();
    while index > 0 {
        index -= 1;
        match state.fleets[index].advance() {
            Advance::InFlight => {}
            Advance::Lost => {
                state.fleets.remove(index);
            }
            Advance::Arrived => arrived.push(state.fleets.remove(index)),
        }
    }

    for fleet in arrived {
        let located = locate_destination(&state.planets, fleet.destination);
        debug_assert!(located.is_some(), "fleet {} arrived at no planet", fleet.id);
        let Some(planet_id) = located else {
            tracing::error!(fleet_id = %fleet.id, "fleet arrived at no planet, dropped");
            continue;
        };
        debug_assert_eq!(planet_id, fleet.to);
        let outcome = resolve_arrival(&mut state.planets[planet_id.0], &fleet);
        tracing::debug!(fleet_id = %fleet.id, planet = %planet_id, ?outcome, "fleet arrived");
        push_event(
            state,
            events,
            Event::FleetArrived {
                fleet_id: fleet.id,
                planet: planet_id,
                outcome,
            },
        );
        if let ArrivalOutcome::Captured { previous_owner } = outcome {
            announce_capture(state, planet_id, previous_owner, events);
        }
        let player = planet_count(state, Owner::Player);
        let ai = planet_count(state, Owner::Ai);
        push_event(state, events, Event::PlanetCountsChanged { player, ai });
    }
}

fn resolve_battles(state: &mut GameState, rules: &Rules, events: &mut Vec<EventEnvelope>) {
    let mut outcomes = Vec::new();
    let count = state.fleets.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = state.fleets.split_at_mut(j);
            let first = &mut head[i];
            let second = &mut tail[0];
            if first.destroyed || second.destroyed {
                continue;
            }
            if !first.in_battle_range(second, rules.battle_range) {
                continue;
            }
            if let Some(outcome) = resolve_battle(first, second) {
                tracing::debug!(
                    first = %first.id,
                    second = %second.id,
                    survivor = ?outcome.survivor,
                    remaining = outcome.remaining_units,
                    "battle resolved"
                );
                outcomes.push((first.id, second.id, outcome));
            }
        }
    }
    for (first, second, outcome) in outcomes {
        push_event(
            state,
            events,
            Event::BattleResolved {
                first,
                second,
                survivor: outcome.survivor,
                remaining_units: outcome.remaining_units,
            },
        );
    }
}

fn announce_capture(
    state: &mut GameState,
    planet_id: PlanetId,
    previous_owner: Owner,
    events: &mut Vec<EventEnvelope>,
) {
    let planet = &state.planets[planet_id.0];
    let (new_owner, garrison) = (planet.owner, planet.garrison);
    tracing::info!(planet = %planet_id, %previous_owner, %new_owner, garrison, "planet captured");
    push_event(
        state,
        events,
        Event::PlanetCaptured {
            planet: planet_id,
            previous_owner,
            new_owner,
            garrison,
        },
    );
}

fn run_auto_transfers(
    state: &mut GameState,
    rules: &Rules,
    now_ms: u64,
    events: &mut Vec<EventEnvelope>,
) {
    if now_ms.saturating_sub(state.timers.last_auto_transfer_ms) < rules.auto_transfer_interval_ms
    {
        return;
    }
    let links: Vec<(PlanetId, PlanetId)> = state
        .planets
        .iter()
        .filter(|p| p.owner.is_side() && p.garrison > 0)
        .filter_map(|p| p.auto_transfer_target.map(|target| (p.id, target)))
        .collect();
    for (from, to) in links {
        launch_fleet(state, rules, from, to, events);
    }
    state.timers.last_auto_transfer_ms = now_ms;
}

fn run_opponent(
    state: &mut GameState,
    rules: &Rules,
    now_ms: u64,
    opponent: &mut impl Opponent,
    events: &mut Vec<EventEnvelope>,
) {
    let mut actions_taken = 0;
    for command in opponent.opportunistic_commands(state, rules) {
        if apply_command(state, rules, &command, events) && command.is_launch() {
            actions_taken += 1;
        }
    }

    if now_ms.saturating_sub(state.timers.last_strategic_ms) < rules.ai_cooldown_ms {
        return;
    }
    for command in opponent.strategic_commands(state, rules, actions_taken) {
        apply_command(state, rules, &command, events);
    }
    state.timers.last_strategic_ms = now_ms;
}

fn check_winner(state: &mut GameState, events: &mut Vec<EventEnvelope>) {
    let winner = if planet_count(state, Owner::Player) == 0 {
        Owner::Ai
    } else if planet_count(state, Owner::Ai) == 0 {
        Owner::Player
    } else {
        return;
    };
    state.status = MatchStatus::Won { winner };
    tracing::info!(%winner, tick = state.meta.tick, "match ended");
    push_event(state, events, Event::MatchEnded { winner });
}
