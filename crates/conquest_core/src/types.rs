//! Type definitions for `conquest_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the simulation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! index_id {
    ($name:ident, $inner:ty, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{:04}"), self.0)
            }
        }
    };
}

// Planet handles are indices into `GameState::planets`.
index_id!(PlanetId, usize, "planet");
index_id!(FleetId, u64, "fleet");
index_id!(EventId, u64, "evt");

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Neutral,
    Player,
    Ai,
}

impl Owner {
    /// The opposing side, or `None` for neutral planets.
    pub fn opponent(self) -> Option<Owner> {
        match self {
            Owner::Player => Some(Owner::Ai),
            Owner::Ai => Some(Owner::Player),
            Owner::Neutral => None,
        }
    }

    pub fn is_side(self) -> bool {
        !matches!(self, Owner::Neutral)
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Owner::Neutral => "neutral",
            Owner::Player => "player",
            Owner::Ai => "ai",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Part of the minimum spanning tree.
    Tree,
    /// Added after the tree, never crossing an earlier edge.
    Supplemental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Won { winner: Owner },
}

impl MatchStatus {
    pub fn is_over(self) -> bool {
        matches!(self, MatchStatus::Won { .. })
    }

    pub fn winner(self) -> Option<Owner> {
        match self {
            MatchStatus::Won { winner } => Some(winner),
            MatchStatus::InProgress => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub status: MatchStatus,
    /// Arena indexed by `PlanetId`; planets are never removed during a match.
    pub planets: Vec<Planet>,
    /// Computed once at setup, immutable afterwards.
    pub connections: Vec<Connection>,
    /// Live fleets in launch order.
    pub fleets: Vec<Fleet>,
    pub timers: Timers,
    pub selected: Option<PlanetId>,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub tick: u64,
    pub seed: u64,
    pub match_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_fleet_id: u64,
}

/// Last-fired wall-clock timestamps (milliseconds) for each throttled cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timers {
    pub last_production_ms: u64,
    pub last_auto_transfer_ms: u64,
    pub last_strategic_ms: u64,
}

impl Timers {
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            last_production_ms: now_ms,
            last_auto_transfer_ms: now_ms,
            last_strategic_ms: now_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub position: Point,
    pub radius: f64,
    pub owner: Owner,
    pub garrison: u32,
    pub selected: bool,
    pub auto_transfer_target: Option<PlanetId>,
    /// Mirror of the most recent link targeting this planet.
    pub auto_transfer_source: Option<PlanetId>,
}

impl Planet {
    pub fn new(id: PlanetId, position: Point, radius: f64, owner: Owner, garrison: u32) -> Self {
        Self {
            id,
            position,
            radius,
            owner,
            garrison,
            selected: false,
            auto_transfer_target: None,
            auto_transfer_source: None,
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.position.distance_to(point) <= self.radius
    }
}

/// Unordered planet pair. Always stored with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub low: PlanetId,
    pub high: PlanetId,
}

impl Route {
    pub fn new(a: PlanetId, b: PlanetId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub a: PlanetId,
    pub b: PlanetId,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn route(&self) -> Route {
        Route::new(self.a, self.b)
    }

    pub fn touches(&self, planet: PlanetId) -> bool {
        self.a == planet || self.b == planet
    }

    pub fn joins(&self, p: PlanetId, q: PlanetId) -> bool {
        (self.a == p && self.b == q) || (self.a == q && self.b == p)
    }

    /// The endpoint opposite `planet`, if `planet` is an endpoint.
    pub fn other(&self, planet: PlanetId) -> Option<PlanetId> {
        if self.a == planet {
            Some(self.b)
        } else if self.b == planet {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn shares_endpoint(&self, other: &Connection) -> bool {
        self.touches(other.a) || self.touches(other.b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub owner: Owner,
    pub units: u32,
    pub from: PlanetId,
    pub to: PlanetId,
    pub route: Route,
    pub origin: Point,
    pub destination: Point,
    pub position: Point,
    /// Fraction of the hop covered, in `[0, 1)` while flying.
    pub progress: f64,
    /// Progress increment per tick.
    pub speed: f64,
    pub destroyed: bool,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Fixed game tuning. `Default` is the canonical rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    pub production_interval_ms: u64,
    pub auto_transfer_interval_ms: u64,
    pub ai_cooldown_ms: u64,
    pub ai_max_actions_per_tick: usize,
    /// Accumulation point must hold at least this multiple of the target garrison.
    pub ai_assault_ratio: f64,
    pub fleet_pixels_per_second: f64,
    /// External tick rate the fleet speed formula assumes.
    pub assumed_frames_per_second: f64,
    pub battle_range: f64,
    pub supplemental_connection_ratio: f64,
    pub connection_pick_threshold: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            production_interval_ms: 1000,
            auto_transfer_interval_ms: 5000,
            ai_cooldown_ms: 2000,
            ai_max_actions_per_tick: 3,
            ai_assault_ratio: 1.5,
            fleet_pixels_per_second: 25.0,
            assumed_frames_per_second: 60.0,
            battle_range: 20.0,
            supplemental_connection_ratio: 0.3,
            connection_pick_threshold: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Empty the source garrison into one fleet bound for `to`.
    LaunchFleet { from: PlanetId, to: PlanetId },
    /// Establish the link, or clear it if it already exists.
    ToggleAutoTransfer { from: PlanetId, to: PlanetId },
    /// Establish the link without disturbing other links into `to`.
    SetAutoTransfer { from: PlanetId, to: PlanetId },
    /// Clear every link on planets owned by `owner`.
    ClearAutoTransfers { owner: Owner },
}

impl Command {
    pub fn is_launch(&self) -> bool {
        matches!(self, Command::LaunchFleet { .. })
    }
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalOutcome {
    Reinforced,
    Captured { previous_owner: Owner },
    Repelled,
    /// Equal strength: garrison wiped out, owner unchanged.
    Stalemate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    FleetLaunched {
        fleet_id: FleetId,
        owner: Owner,
        from: PlanetId,
        to: PlanetId,
        units: u32,
    },
    BattleResolved {
        first: FleetId,
        second: FleetId,
        survivor: Option<FleetId>,
        remaining_units: u32,
    },
    FleetArrived {
        fleet_id: FleetId,
        planet: PlanetId,
        outcome: ArrivalOutcome,
    },
    PlanetCaptured {
        planet: PlanetId,
        previous_owner: Owner,
        new_owner: Owner,
        garrison: u32,
    },
    AutoTransferSet {
        from: PlanetId,
        to: PlanetId,
    },
    AutoTransferCleared {
        from: PlanetId,
        to: PlanetId,
    },
    ProductionApplied {
        planets: u32,
    },
    PlanetCountsChanged {
        player: u32,
        ai: u32,
    },
    MatchEnded {
        winner: Owner,
    },
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Read-only view handed to rendering collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub status: MatchStatus,
    pub planets: Vec<Planet>,
    pub connections: Vec<Connection>,
    pub fleets: Vec<FleetView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetView {
    pub id: FleetId,
    pub owner: Owner,
    pub units: u32,
    pub position: Point,
    pub origin: Point,
    pub destination: Point,
    pub destroyed: bool,
}

impl From<&Fleet> for FleetView {
    fn from(fleet: &Fleet) -> Self {
        Self {
            id: fleet.id,
            owner: fleet.owner,
            units: fleet.units,
            position: fleet.position,
            origin: fleet.origin,
            destination: fleet.destination,
            destroyed: fleet.destroyed,
        }
    }
}
