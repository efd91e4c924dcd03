use crate::push_event;
use crate::topology::are_connected;
use crate::{Command, Event, EventEnvelope, Fleet, FleetId, GameState, Owner, PlanetId, Rules};

/// Validates and applies one command. Returns `false` (and changes nothing)
/// when the command is rejected.
pub fn apply_command(
    state: &mut GameState,
    rules: &Rules,
    command: &Command,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    match *command {
        Command::LaunchFleet { from, to } => launch_fleet(state, rules, from, to, events),
        Command::ToggleAutoTransfer { from, to } => toggle_auto_transfer(state, from, to, events),
        Command::SetAutoTransfer { from, to } => set_auto_transfer(state, from, to, events),
        Command::ClearAutoTransfers { owner } => clear_auto_transfers(state, owner, events),
    }
}

fn linkable(state: &GameState, from: PlanetId, to: PlanetId) -> bool {
    from != to
        && from.0 < state.planets.len()
        && to.0 < state.planets.len()
        && are_connected(&state.connections, from, to)
}

/// Empties `from`'s garrison into a single fleet bound for `to`.
pub(crate) fn launch_fleet(
    state: &mut GameState,
    rules: &Rules,
    from: PlanetId,
    to: PlanetId,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    if !linkable(state, from, to) {
        return false;
    }
    let source = &state.planets[from.0];
    if source.garrison == 0 || !source.owner.is_side() {
        return false;
    }
    let units = source.garrison;
    let owner = source.owner;
    let fleet_id = FleetId(state.counters.next_fleet_id);
    state.counters.next_fleet_id += 1;

    let fleet = Fleet::launch(
        fleet_id,
        &state.planets[from.0],
        &state.planets[to.0],
        units,
        owner,
        rules,
    );
    state.planets[from.0].garrison = 0;
    state.fleets.push(fleet);

    tracing::debug!(%fleet_id, %owner, %from, %to, units, "fleet launched");
    push_event(
        state,
        events,
        Event::FleetLaunched {
            fleet_id,
            owner,
            from,
            to,
            units,
        },
    );
    true
}

fn toggle_auto_transfer(
    state: &mut GameState,
    from: PlanetId,
    to: PlanetId,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    if !linkable(state, from, to) {
        return false;
    }
    if state.planets[from.0].auto_transfer_target == Some(to) {
        state.planets[from.0].auto_transfer_target = None;
        state.planets[to.0].auto_transfer_source = None;
        push_event(state, events, Event::AutoTransferCleared { from, to });
        return true;
    }

    // Replace the previous outgoing link from `from`.
    if let Some(old_target) = state.planets[from.0].auto_transfer_target.take() {
        if state.planets[old_target.0].auto_transfer_source == Some(from) {
            state.planets[old_target.0].auto_transfer_source = None;
        }
        push_event(state, events, Event::AutoTransferCleared { from, to: old_target });
    }
    // Replace the previous incoming link into `to`.
    if let Some(old_source) = state.planets[to.0].auto_transfer_source.take() {
        if state.planets[old_source.0].auto_transfer_target == Some(to) {
            state.planets[old_source.0].auto_transfer_target = None;
            push_event(state, events, Event::AutoTransferCleared { from: old_source, to });
        }
    }

    link(state, from, to, events);
    true
}

fn set_auto_transfer(
    state: &mut GameState,
    from: PlanetId,
    to: PlanetId,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    if !linkable(state, from, to) {
        return false;
    }
    link(state, from, to, events);
    true
}

fn link(state: &mut GameState, from: PlanetId, to: PlanetId, events: &mut Vec<EventEnvelope>) {
    state.planets[from.0].auto_transfer_target = Some(to);
    state.planets[to.0].auto_transfer_source = Some(from);
    push_event(state, events, Event::AutoTransferSet { from, to });
}

fn clear_auto_transfers(
    state: &mut GameState,
    owner: Owner,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    let mut cleared = Vec::new();
    for planet in state.planets.iter_mut().filter(|p| p.owner == owner) {
        if let Some(target) = planet.auto_transfer_target.take() {
            cleared.push((planet.id, target));
        }
        planet.auto_transfer_source = None;
    }
    for (from, to) in cleared {
        push_event(state, events, Event::AutoTransferCleared { from, to });
    }
    true
}
