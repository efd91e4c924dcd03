use conquest_core::topology::{are_connected, degree};
use conquest_core::{Command, GameState, Match, Opponent, Owner, PlanetId, Rules};

/// Plays one side of a match:
/// 1. Every tick, strike any connected enemy planet this planet outnumbers.
/// 2. Each cooldown, pick the best-connected enemy planet as the objective.
/// 3. Expand into the most valuable reachable neutral planet.
/// 4. Funnel every connected planet into the one nearest the objective, and
///    assault from there once it holds enough units.
#[derive(Debug, Clone, Copy)]
pub struct OpponentController {
    side: Owner,
}

impl OpponentController {
    pub fn new(side: Owner) -> Self {
        Self { side }
    }

    pub fn side(&self) -> Owner {
        self.side
    }
}

impl Default for OpponentController {
    fn default() -> Self {
        Self::new(Owner::Ai)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Planets held by `owner`, in planet order.
fn owned_by(state: &GameState, owner: Owner) -> Vec<PlanetId> {
    state
        .planets
        .iter()
        .filter(|p| p.owner == owner)
        .map(|p| p.id)
        .collect()
}

/// Planets held by `owner` that have units to send, in planet order.
fn armed(state: &GameState, owner: Owner) -> Vec<PlanetId> {
    state
        .planets
        .iter()
        .filter(|p| p.owner == owner && p.garrison > 0)
        .map(|p| p.id)
        .collect()
}

fn distance(state: &GameState, a: PlanetId, b: PlanetId) -> f64 {
    state.planets[a.0]
        .position
        .distance_to(state.planets[b.0].position)
}

/// Highest-degree enemy planet; the earliest one wins ties.
fn objective(state: &GameState, enemy: Owner) -> Option<PlanetId> {
    let mut best: Option<(PlanetId, usize)> = None;
    for planet in owned_by(state, enemy) {
        let links = degree(&state.connections, planet);
        if best.is_none_or(|(_, most)| links > most) {
            best = Some((planet, links));
        }
    }
    best.map(|(planet, _)| planet)
}

/// Best (source, neutral) expansion pair scored by
/// `2 * degree(neutral) + source garrison - distance(neutral, objective)`.
fn best_expansion(
    state: &GameState,
    sources: &[PlanetId],
    objective: PlanetId,
) -> Option<(PlanetId, PlanetId)> {
    let neutrals = owned_by(state, Owner::Neutral);
    let mut best: Option<(PlanetId, PlanetId, f64)> = None;
    for &from in sources {
        for &to in &neutrals {
            if !are_connected(&state.connections, from, to) {
                continue;
            }
            let value = 2.0 * degree(&state.connections, to) as f64
                + f64::from(state.planets[from.0].garrison)
                - distance(state, to, objective);
            if best.is_none_or(|(_, _, top)| value > top) {
                best = Some((from, to, value));
            }
        }
    }
    best.map(|(from, to, _)| (from, to))
}

/// The attacker nearest the objective; the earliest one wins ties.
fn accumulation_point(
    state: &GameState,
    attackers: &[PlanetId],
    objective: PlanetId,
) -> Option<PlanetId> {
    let mut best: Option<(PlanetId, f64)> = None;
    for &planet in attackers {
        let gap = distance(state, planet, objective);
        if best.is_none_or(|(_, nearest)| gap < nearest) {
            best = Some((planet, gap));
        }
    }
    best.map(|(planet, _)| planet)
}

/// Commands planned during one strategic pass, with a local view of the
/// garrisons they will leave behind.
struct Plan {
    garrisons: Vec<u32>,
    actions: usize,
    max_actions: usize,
    commands: Vec<Command>,
}

impl Plan {
    fn new(state: &GameState, rules: &Rules, actions_taken: usize) -> Self {
        Self {
            garrisons: state.planets.iter().map(|p| p.garrison).collect(),
            actions: actions_taken,
            max_actions: rules.ai_max_actions_per_tick,
            commands: Vec::new(),
        }
    }

    fn has_budget(&self) -> bool {
        self.actions < self.max_actions
    }

    fn garrison(&self, planet: PlanetId) -> u32 {
        self.garrisons[planet.0]
    }

    fn launch(&mut self, from: PlanetId, to: PlanetId) {
        if self.garrisons[from.0] == 0 {
            return;
        }
        self.garrisons[from.0] = 0;
        self.actions += 1;
        self.commands.push(Command::LaunchFleet { from, to });
    }

    /// Launches into a neutral planet only if the source outnumbers it.
    fn expand(&mut self, state: &GameState, side: Owner, from: PlanetId, to: PlanetId) {
        if self.garrison(from) > state.planets[to.0].garrison {
            tracing::debug!(%side, %from, %to, "expanding to neutral planet");
            self.launch(from, to);
        }
    }

    /// Replaces every standing link of `side` with links into `hub`.
    fn funnel(&mut self, state: &GameState, side: Owner, sources: &[PlanetId], hub: PlanetId) {
        self.commands.push(Command::ClearAutoTransfers { owner: side });
        for &from in sources {
            if from != hub && are_connected(&state.connections, from, hub) {
                self.commands.push(Command::SetAutoTransfer { from, to: hub });
            }
        }
    }

    fn assault(
        &mut self,
        state: &GameState,
        rules: &Rules,
        side: Owner,
        hub: PlanetId,
        target: PlanetId,
    ) {
        let needed = rules.ai_assault_ratio * f64::from(state.planets[target.0].garrison);
        let units = self.garrison(hub);
        if f64::from(units) >= needed {
            tracing::debug!(
                %side,
                from = %hub,
                to = %target,
                units,
                "assault from accumulation point"
            );
            self.launch(hub, target);
        }
    }
}

// ---------------------------------------------------------------------------
// Opponent impl
// ---------------------------------------------------------------------------

impl Opponent for OpponentController {
    fn opportunistic_commands(&mut self, state: &GameState, rules: &Rules) -> Vec<Command> {
        let Some(enemy) = self.side.opponent() else {
            return Vec::new();
        };
        let targets = owned_by(state, enemy);
        let mut commands = Vec::new();

        for from in armed(state, self.side) {
            if commands.len() >= rules.ai_max_actions_per_tick {
                break;
            }
            let garrison = state.planets[from.0].garrison;
            let strike = targets.iter().copied().find(|&to| {
                are_connected(&state.connections, from, to)
                    && garrison > state.planets[to.0].garrison
            });
            if let Some(to) = strike {
                tracing::debug!(side = %self.side, %from, %to, garrison, "opportunistic strike");
                commands.push(Command::LaunchFleet { from, to });
            }
        }
        commands
    }

    fn strategic_commands(
        &mut self,
        state: &GameState,
        rules: &Rules,
        actions_taken: usize,
    ) -> Vec<Command> {
        let Some(enemy) = self.side.opponent() else {
            return Vec::new();
        };
        let sources = armed(state, self.side);
        if sources.is_empty() {
            return Vec::new();
        }
        let Some(target) = objective(state, enemy) else {
            tracing::debug!(side = %self.side, "no enemy planets left to attack");
            return Vec::new();
        };
        let attackers: Vec<PlanetId> = sources
            .iter()
            .copied()
            .filter(|&p| are_connected(&state.connections, p, target))
            .collect();

        let mut plan = Plan::new(state, rules, actions_taken);
        if plan.has_budget() {
            if let Some((from, to)) = best_expansion(state, &sources, target) {
                plan.expand(state, self.side, from, to);
            }
        }
        if let Some(hub) = accumulation_point(state, &attackers, target) {
            if plan.has_budget() {
                plan.funnel(state, self.side, &sources, hub);
                plan.assault(state, rules, self.side, hub, target);
            }
        }
        plan.commands
    }
}

// ---------------------------------------------------------------------------
// Autoplay
// ---------------------------------------------------------------------------

/// Drives a second controller through a match's public intents, so both
/// sides can be computer-played.
#[derive(Debug, Clone)]
pub struct Autoplay {
    controller: OpponentController,
    last_strategic_ms: u64,
}

impl Autoplay {
    pub fn new(side: Owner, now_ms: u64) -> Self {
        Self {
            controller: OpponentController::new(side),
            last_strategic_ms: now_ms,
        }
    }

    /// Runs both passes for this side against `game`; call once per frame
    /// before `Match::tick`. Returns the number of accepted commands.
    pub fn drive<O: Opponent>(&mut self, game: &mut Match<O>, now_ms: u64) -> usize {
        if game.status().is_over() {
            return 0;
        }
        let mut accepted = 0;
        let mut launches = 0;
        let commands = self
            .controller
            .opportunistic_commands(game.state(), game.rules());
        for command in commands {
            if game.submit(command) {
                accepted += 1;
                if command.is_launch() {
                    launches += 1;
                }
            }
        }

        if now_ms.saturating_sub(self.last_strategic_ms) < game.rules().ai_cooldown_ms {
            return accepted;
        }
        let commands = self
            .controller
            .strategic_commands(game.state(), game.rules(), launches);
        for command in commands {
            if game.submit(command) {
                accepted += 1;
            }
        }
        self.last_strategic_ms = now_ms;
        accepted
    }
}
