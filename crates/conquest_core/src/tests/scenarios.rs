use super::*;

#[test]
fn test_duel_attack_captures_with_margin() {
    let mut game = passive_match(duel_state(5, 3));

    assert!(game.issue_fleet(PlanetId(0), PlanetId(1)));
    assert_eq!(game.state().planets[0].garrison, 0);
    assert_eq!(game.state().fleets.len(), 1);

    fly_until_empty(&mut game, 1_000);

    let target = &game.state().planets[1];
    assert_eq!(target.owner, Owner::Player);
    assert_eq!(target.garrison, 2);
    assert_eq!(game.state().planets[0].garrison, 0);
}

#[test]
fn test_duel_capture_ends_match() {
    let mut game = passive_match(duel_state(5, 3));
    game.issue_fleet(PlanetId(0), PlanetId(1));

    let events = fly_until_empty(&mut game, 1_000);

    assert_eq!(
        game.status(),
        MatchStatus::Won {
            winner: Owner::Player
        }
    );
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::MatchEnded { winner: Owner::Player })));
    assert!(events.iter().any(|e| matches!(
        e.event,
        Event::PlanetCaptured {
            planet: PlanetId(1),
            previous_owner: Owner::Ai,
            new_owner: Owner::Player,
            garrison: 2,
        }
    )));
}

#[test]
fn test_arrival_refreshes_planet_counts() {
    let mut game = passive_match(corridor_state(4, 4));
    game.issue_fleet(PlanetId(0), PlanetId(1));

    let events = fly_until_empty(&mut game, 1_000);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::PlanetCountsChanged { player: 2, ai: 1 })));
    assert_eq!(game.status(), MatchStatus::InProgress);
}

#[test]
fn test_fleets_cover_constant_pixels_per_tick() {
    let near = state_from(
        vec![
            planet(0, 0.0, 0.0, Owner::Player, 1),
            planet(1, 100.0, 0.0, Owner::Neutral, 0),
            planet(2, 0.0, 400.0, Owner::Neutral, 0),
            planet(3, 900.0, 900.0, Owner::Ai, 1),
        ],
        vec![edge(0, 1), edge(0, 2), edge(2, 3)],
    );

    let mut short_hop = passive_match(near.clone());
    short_hop.issue_fleet(PlanetId(0), PlanetId(1));
    let mut short_ticks = 0u32;
    while !short_hop.state().fleets.is_empty() {
        short_hop.tick(START_MS);
        short_ticks += 1;
    }

    let mut long_hop = passive_match(near);
    long_hop.issue_fleet(PlanetId(0), PlanetId(2));
    let mut long_ticks = 0u32;
    while !long_hop.state().fleets.is_empty() {
        long_hop.tick(START_MS);
        long_ticks += 1;
    }

    // Progress per tick scales with 1/distance: a hop four times longer
    // takes four times as many ticks.
    let ratio = f64::from(long_ticks) / f64::from(short_ticks);
    assert!((ratio - 4.0).abs() < 0.05, "ratio was {ratio}");
}

#[test]
fn test_tick_counter_advances_once_per_tick() {
    let mut game = passive_match(duel_state(1, 1));
    for _ in 0..5 {
        game.tick(START_MS);
    }
    assert_eq!(game.state().meta.tick, 5);
}

#[test]
#[should_panic(expected = "arrived at no planet")]
fn test_fleet_with_unknown_destination_is_fatal() {
    let mut state = duel_state(5, 3);
    let rules = Rules::default();
    let launch = Command::LaunchFleet {
        from: PlanetId(0),
        to: PlanetId(1),
    };
    assert!(apply_command(&mut state, &rules, &launch, &mut Vec::new()));
    state.fleets[0].destination = Point::new(9999.0, 9999.0);
    state.fleets[0].speed = 2.0;

    tick(&mut state, &rules, START_MS, &mut PassiveOpponent);
}
