use std::cmp::Ordering;

use crate::{ArrivalOutcome, Fleet, Planet, PlanetId, Point};

/// Destinations are planet centres, so a close match is expected.
const DESTINATION_TOLERANCE: f64 = 1.0;

/// Finds the planet whose centre matches `destination`.
pub fn locate_destination(planets: &[Planet], destination: Point) -> Option<PlanetId> {
    planets
        .iter()
        .find(|p| {
            (p.position.x - destination.x).abs() < DESTINATION_TOLERANCE
                && (p.position.y - destination.y).abs() < DESTINATION_TOLERANCE
        })
        .map(|p| p.id)
}

/// Applies an arrived fleet to its destination planet.
pub fn resolve_arrival(planet: &mut Planet, fleet: &Fleet) -> ArrivalOutcome {
    debug_assert!(!fleet.destroyed, "destroyed fleet {} cannot arrive", fleet.id);
    if planet.owner == fleet.owner {
        planet.garrison += fleet.units;
        return ArrivalOutcome::Reinforced;
    }
    match fleet.units.cmp(&planet.garrison) {
        Ordering::Greater => {
            let previous_owner = planet.owner;
            planet.owner = fleet.owner;
            planet.garrison = fleet.units - planet.garrison;
            ArrivalOutcome::Captured { previous_owner }
        }
        Ordering::Less => {
            planet.garrison -= fleet.units;
            ArrivalOutcome::Repelled
        }
        Ordering::Equal => {
            planet.garrison = 0;
            ArrivalOutcome::Stalemate
        }
    }
}
