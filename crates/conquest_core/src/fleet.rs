//! Fleets in transit: launch, per-tick advancement, and mid-flight combat.

use crate::{Fleet, FleetId, Owner, Planet, Point, Route, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    InFlight,
    Arrived,
    /// Destroyed in battle; complete with no further effect.
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOutcome {
    pub survivor: Option<FleetId>,
    pub remaining_units: u32,
}

impl Fleet {
    /// Builds a fleet sitting at `from`, bound for `to`.
    ///
    /// Progress per tick is scaled by hop length, so at the assumed frame
    /// rate a fleet covers `fleet_pixels_per_second` whatever the hop.
    pub fn launch(
        id: FleetId,
        from: &Planet,
        to: &Planet,
        units: u32,
        owner: Owner,
        rules: &Rules,
    ) -> Self {
        debug_assert!(units > 0, "fleet launched with no units");
        let total_distance = from.position.distance_to(to.position);
        let speed = if total_distance > 0.0 {
            rules.fleet_pixels_per_second / (total_distance * rules.assumed_frames_per_second)
        } else {
            1.0
        };
        Self {
            id,
            owner,
            units,
            from: from.id,
            to: to.id,
            route: Route::new(from.id, to.id),
            origin: from.position,
            destination: to.position,
            position: from.position,
            progress: 0.0,
            speed,
            destroyed: false,
        }
    }

    pub fn advance(&mut self) -> Advance {
        if self.destroyed {
            return Advance::Lost;
        }
        self.progress += self.speed;
        if self.progress >= 1.0 {
            return Advance::Arrived;
        }
        self.position = Point::lerp(self.origin, self.destination, self.progress);
        Advance::InFlight
    }

    pub fn same_route(&self, other: &Fleet) -> bool {
        self.route == other.route
    }

    /// Fleets only meet when travelling the same connection.
    pub fn in_battle_range(&self, other: &Fleet, threshold: f64) -> bool {
        self.same_route(other) && self.position.distance_to(other.position) < threshold
    }
}

/// Attrition combat between two fleets. Returns `None` when both share an owner.
///
/// The larger fleet loses as many units as the smaller one had; the smaller
/// fleet is destroyed. Equal fleets annihilate each other.
pub fn resolve_battle(first: &mut Fleet, second: &mut Fleet) -> Option<BattleOutcome> {
    if first.owner == second.owner {
        return None;
    }
    let (stronger, weaker) = if first.units > second.units {
        (first, second)
    } else {
        (second, first)
    };
    let remaining = stronger.units.saturating_sub(weaker.units);
    stronger.units = remaining;
    weaker.destroyed = true;
    if remaining == 0 {
        stronger.destroyed = true;
    }
    Some(BattleOutcome {
        survivor: (!stronger.destroyed).then_some(stronger.id),
        remaining_units: remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlanetId;

    fn planet(id: usize, x: f64, owner: Owner) -> Planet {
        Planet::new(PlanetId(id), Point::new(x, 0.0), 20.0, owner, 0)
    }

    fn fleet(id: u64, units: u32, owner: Owner) -> Fleet {
        let rules = Rules::default();
        Fleet::launch(
            FleetId(id),
            &planet(0, 0.0, owner),
            &planet(1, 100.0, Owner::Neutral),
            units,
            owner,
            &rules,
        )
    }

    #[test]
    fn launch_starts_at_source_with_distance_scaled_speed() {
        let f = fleet(0, 5, Owner::Player);
        assert_eq!(f.position, Point::new(0.0, 0.0));
        assert!((f.speed - 25.0 / (100.0 * 60.0)).abs() < 1e-12);
        assert_eq!(f.route, Route::new(PlanetId(1), PlanetId(0)));
    }

    #[test]
    fn longer_hops_have_smaller_increments() {
        let rules = Rules::default();
        let near = Fleet::launch(
            FleetId(0),
            &planet(0, 0.0, Owner::Player),
            &planet(1, 100.0, Owner::Ai),
            1,
            Owner::Player,
            &rules,
        );
        let far = Fleet::launch(
            FleetId(1),
            &planet(0, 0.0, Owner::Player),
            &planet(2, 400.0, Owner::Ai),
            1,
            Owner::Player,
            &rules,
        );
        assert!(far.speed < near.speed);
    }

    #[test]
    fn advance_interpolates_then_arrives() {
        let mut f = fleet(0, 5, Owner::Player);
        f.speed = 0.25;
        assert_eq!(f.advance(), Advance::InFlight);
        assert!((f.position.x - 25.0).abs() < 1e-9);
        assert_eq!(f.advance(), Advance::InFlight);
        assert_eq!(f.advance(), Advance::InFlight);
        assert_eq!(f.advance(), Advance::Arrived);
    }

    #[test]
    fn destroyed_fleet_never_moves() {
        let mut f = fleet(0, 5, Owner::Player);
        f.destroyed = true;
        assert_eq!(f.advance(), Advance::Lost);
        assert!(f.progress.abs() < 1e-12);
    }

    #[test]
    fn larger_fleet_survives_with_margin() {
        let mut a = fleet(0, 7, Owner::Player);
        let mut b = fleet(1, 3, Owner::Ai);
        let outcome = resolve_battle(&mut a, &mut b).unwrap();
        assert_eq!(outcome.survivor, Some(FleetId(0)));
        assert_eq!(a.units, 4);
        assert!(!a.destroyed);
        assert!(b.destroyed);
    }

    #[test]
    fn battle_is_order_independent() {
        let mut a = fleet(0, 3, Owner::Player);
        let mut b = fleet(1, 7, Owner::Ai);
        let outcome = resolve_battle(&mut a, &mut b).unwrap();
        assert_eq!(outcome.survivor, Some(FleetId(1)));
        assert_eq!(b.units, 4);
        assert!(a.destroyed);
    }

    #[test]
    fn equal_fleets_annihilate() {
        let mut a = fleet(0, 4, Owner::Player);
        let mut b = fleet(1, 4, Owner::Ai);
        let outcome = resolve_battle(&mut a, &mut b).unwrap();
        assert_eq!(outcome.survivor, None);
        assert!(a.destroyed && b.destroyed);
    }

    #[test]
    fn same_owner_fleets_do_not_fight() {
        let mut a = fleet(0, 4, Owner::Ai);
        let mut b = fleet(1, 9, Owner::Ai);
        assert!(resolve_battle(&mut a, &mut b).is_none());
        assert_eq!((a.units, b.units), (4, 9));
        assert!(!a.destroyed && !b.destroyed);
    }

    #[test]
    fn battle_range_requires_shared_route() {
        let rules = Rules::default();
        let a = fleet(0, 1, Owner::Player);
        let other_route = Fleet::launch(
            FleetId(1),
            &planet(0, 0.0, Owner::Ai),
            &planet(2, 100.0, Owner::Neutral),
            1,
            Owner::Ai,
            &rules,
        );
        assert!(!a.in_battle_range(&other_route, rules.battle_range));
        let twin = fleet(2, 1, Owner::Ai);
        assert!(a.in_battle_range(&twin, rules.battle_range));
    }
}
