use super::*;

fn battle_events(events: &[EventEnvelope]) -> Vec<&Event> {
    events
        .iter()
        .map(|e| &e.event)
        .filter(|e| matches!(e, Event::BattleResolved { .. }))
        .collect()
}

#[test]
fn test_same_owner_fleets_pass_through_each_other() {
    let state = state_from(
        vec![
            planet(0, 100.0, 100.0, Owner::Player, 3),
            planet(1, 300.0, 100.0, Owner::Player, 4),
            planet(2, 500.0, 100.0, Owner::Ai, 1),
        ],
        vec![edge(0, 1), edge(1, 2)],
    );
    let mut game = passive_match(state);
    assert!(game.issue_fleet(PlanetId(0), PlanetId(1)));
    assert!(game.issue_fleet(PlanetId(1), PlanetId(0)));

    let events = fly_until_empty(&mut game, 1_000);

    assert!(battle_events(&events).is_empty());
    assert_eq!(game.state().planets[0].garrison, 4);
    assert_eq!(game.state().planets[1].garrison, 3);
}

#[test]
fn test_equal_opposing_fleets_annihilate_mid_route() {
    let mut game = passive_match(duel_state(4, 4));
    assert!(game.issue_fleet(PlanetId(0), PlanetId(1)));
    assert!(game.issue_fleet(PlanetId(1), PlanetId(0)));

    let events = fly_until_empty(&mut game, 1_000);

    let battles = battle_events(&events);
    assert_eq!(battles.len(), 1);
    assert!(matches!(
        battles[0],
        Event::BattleResolved {
            survivor: None,
            remaining_units: 0,
            ..
        }
    ));
    assert!(!events
        .iter()
        .any(|e| matches!(e.event, Event::FleetArrived { .. })));
    assert_eq!(game.state().planets[0].garrison, 0);
    assert_eq!(game.state().planets[1].garrison, 0);
    assert_eq!(game.status(), MatchStatus::InProgress);
}

#[test]
fn test_battle_survivor_carries_margin_to_destination() {
    let mut game = passive_match(duel_state(7, 3));
    let player_fleet = FleetId(0);
    assert!(game.issue_fleet(PlanetId(0), PlanetId(1)));
    assert!(game.issue_fleet(PlanetId(1), PlanetId(0)));

    let events = fly_until_empty(&mut game, 1_000);

    assert!(events.iter().any(|e| matches!(
        e.event,
        Event::BattleResolved {
            survivor: Some(id),
            remaining_units: 4,
            ..
        } if id == player_fleet
    )));
    let target = &game.state().planets[1];
    assert_eq!(target.owner, Owner::Player);
    assert_eq!(target.garrison, 4);
    assert_eq!(
        game.status(),
        MatchStatus::Won {
            winner: Owner::Player
        }
    );
}

#[test]
fn test_fleets_on_different_routes_never_fight() {
    // Player 0 -> 1 and Ai 2 -> 1 converge on the same planet by different
    // connections; they only interact through the arrival.
    let state = state_from(
        vec![
            planet(0, 100.0, 100.0, Owner::Player, 5),
            planet(1, 300.0, 100.0, Owner::Neutral, 0),
            planet(2, 500.0, 100.0, Owner::Ai, 2),
            planet(3, 900.0, 100.0, Owner::Ai, 0),
        ],
        vec![edge(0, 1), edge(1, 2), edge(2, 3)],
    );
    let mut game = passive_match(state);
    game.issue_fleet(PlanetId(0), PlanetId(1));
    game.issue_fleet(PlanetId(2), PlanetId(1));

    let events = fly_until_empty(&mut game, 1_000);

    assert!(battle_events(&events).is_empty());
    // Both arrive on the same tick; the newer Ai fleet lands first and takes
    // the neutral, then the player fleet captures it with 5 - 2 units.
    let hub = &game.state().planets[1];
    assert_eq!(hub.owner, Owner::Player);
    assert_eq!(hub.garrison, 3);
}
