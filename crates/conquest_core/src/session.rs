//! The match facade handed to rendering and input collaborators.

use crate::commands::apply_command;
use crate::engine::{tick, Opponent};
use crate::topology::connection_near_point;
use crate::{
    Command, Connection, EventEnvelope, FleetView, GameState, MatchStatus, Owner, PlanetId, Point,
    Rules, Snapshot,
};

/// Result of one `Match::tick`.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub status: MatchStatus,
    /// Events from intents accepted since the previous tick, then this tick's events.
    pub events: Vec<EventEnvelope>,
}

/// Owns the match state and sequences every mutation of it.
pub struct Match<O: Opponent> {
    state: GameState,
    rules: Rules,
    opponent: O,
    pending_events: Vec<EventEnvelope>,
}

impl<O: Opponent> Match<O> {
    pub fn new(state: GameState, rules: Rules, opponent: O) -> Self {
        Self {
            state,
            rules,
            opponent,
            pending_events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn status(&self) -> MatchStatus {
        self.state.status
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.state.meta.tick,
            status: self.state.status,
            planets: self.state.planets.clone(),
            connections: self.state.connections.clone(),
            fleets: self.state.fleets.iter().map(FleetView::from).collect(),
        }
    }

    /// The planet whose disc contains `point`.
    pub fn planet_at(&self, point: Point) -> Option<PlanetId> {
        self.state
            .planets
            .iter()
            .find(|p| p.contains_point(point))
            .map(|p| p.id)
    }

    /// The first connection within the pick threshold of `point`.
    pub fn connection_at(&self, point: Point) -> Option<Connection> {
        connection_near_point(
            &self.state.planets,
            &self.state.connections,
            point,
            self.rules.connection_pick_threshold,
        )
        .map(|index| self.state.connections[index])
    }

    /// Selects a player-owned planet, replacing any previous selection.
    pub fn select_planet(&mut self, planet: PlanetId) -> bool {
        if self.state.status.is_over() {
            return false;
        }
        let selectable = self
            .state
            .planets
            .get(planet.0)
            .is_some_and(|p| p.owner == Owner::Player);
        self.deselect_all();
        if selectable {
            self.state.planets[planet.0].selected = true;
            self.state.selected = Some(planet);
        }
        selectable
    }

    pub fn deselect_all(&mut self) {
        if let Some(previous) = self.state.selected.take() {
            self.state.planets[previous.0].selected = false;
        }
    }

    /// Launches `from`'s whole garrison at `to`. Rejected unless the planets
    /// are connected and `from` has units.
    pub fn issue_fleet(&mut self, from: PlanetId, to: PlanetId) -> bool {
        self.submit(Command::LaunchFleet { from, to })
    }

    pub fn toggle_auto_transfer(&mut self, from: PlanetId, to: PlanetId) -> bool {
        self.submit(Command::ToggleAutoTransfer { from, to })
    }

    /// Applies a raw command on behalf of an external controller (autoplay).
    pub fn submit(&mut self, command: Command) -> bool {
        if self.state.status.is_over() {
            return false;
        }
        apply_command(&mut self.state, &self.rules, &command, &mut self.pending_events)
    }

    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        let mut events = std::mem::take(&mut self.pending_events);
        events.extend(tick(&mut self.state, &self.rules, now_ms, &mut self.opponent));
        TickOutcome {
            status: self.state.status,
            events,
        }
    }
}
