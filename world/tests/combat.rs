use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rewind_core::{Action, Coordinate, EntityType, Event, InputSymbol, Rules};
use rewind_world::{apply_turn, query, reverse_turn, State};

const CORRIDOR: &str = "#####\n#@w.#\n#####";
const WOLF: Coordinate = Coordinate::new(1, 2);

#[test]
fn attacking_keeps_the_player_in_place_and_records_damage() {
    let mut state = State::from_map(CORRIDOR, &Rules::default()).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut events = Vec::new();

    apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);

    assert_eq!(query::player_position(&state), Coordinate::new(1, 1));
    let [Event::Hit { entity, target, damage }] = events.as_slice() else {
        panic!("expected a single hit event, got {events:?}");
    };
    assert_eq!(*target, EntityType::DireWolf);
    let wolf = query::entity_at(&state, WOLF).expect("wolf survives one blow");
    assert_eq!(wolf.id(), *entity);
    assert_eq!(wolf.health(), 30 - damage);

    let player = query::player(&state).expect("player");
    assert_eq!(
        player.actions(),
        &[Action::Damage {
            entity: *entity,
            damage: *damage,
            position: WOLF,
        }]
    );
    assert_eq!(player.time(), 99);
}

fn rolled_damages(rules: Rules, blows: usize) -> Vec<i32> {
    let rules = Rules {
        dire_wolf_health: 1_000_000,
        ..rules
    };
    let mut state = State::from_map(CORRIDOR, &rules).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(0xd1ce);
    let mut events = Vec::new();

    for _ in 0..blows {
        apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
    }

    events
        .iter()
        .filter_map(|event| match event {
            Event::Hit { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect()
}

#[test]
fn damage_stays_within_bounds() {
    let rules = Rules::default();
    let bounds = rules.min_damage()..=rules.max_damage();
    assert_eq!(bounds, 6..=10);

    let damages = rolled_damages(rules, 1_000);

    assert_eq!(damages.len(), 1_000);
    assert!(damages.iter().all(|damage| bounds.contains(damage)));
    for expected in bounds {
        assert!(damages.contains(&expected), "damage {expected} never rolled");
    }
}

#[test]
fn damage_bounds_follow_the_rules() {
    let rules = Rules {
        base_damage: 2,
        damage_roll_max: 3,
        ..Rules::default()
    };
    let bounds = rules.min_damage()..=rules.max_damage();

    let damages = rolled_damages(rules, 300);

    assert_eq!(bounds, 3..=5);
    assert!(damages.iter().all(|damage| bounds.contains(damage)));
    for expected in bounds {
        assert!(damages.contains(&expected), "damage {expected} never rolled");
    }
}

#[test]
fn killing_moves_the_wolf_to_the_corpse_set_and_harvests_time() {
    let mut state = State::from_map(CORRIDOR, &Rules::default()).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut events = Vec::new();

    let mut turns = 0;
    while query::entity_at(&state, WOLF).is_some() {
        apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
        turns += 1;
    }

    assert!((3..=5).contains(&turns), "30 health takes three to five blows");
    let corpses = query::corpses_at(&state, WOLF).expect("corpse recorded");
    assert_eq!(corpses.len(), 1);
    let wolf_id = *corpses.iter().next().expect("corpse id");
    let wolf = query::entity(&state, wolf_id).expect("wolf stays in roster");
    assert!(!wolf.alive());
    assert!(wolf.health() <= 0);
    assert!(wolf.time_has_been_harvested());

    let player = query::player(&state).expect("player");
    assert_eq!(player.time(), 100 - turns + 30);
    assert!(events.contains(&Event::Killed {
        entity: wolf_id,
        target: EntityType::DireWolf,
        position: WOLF,
    }));
    assert!(events.contains(&Event::TimeHarvested { amount: 30 }));
    let messages: Vec<String> = events.iter().filter_map(Event::message).collect();
    assert!(messages.contains(&"You killed the dire wolf.".to_owned()));
}

#[test]
fn reversing_the_killing_blow_resurrects_in_place() {
    let rules = Rules {
        dire_wolf_health: 1,
        ..Rules::default()
    };
    let mut state = State::from_map(CORRIDOR, &rules).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut events = Vec::new();

    apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
    assert!(query::entity_at(&state, WOLF).is_none());

    events.clear();
    reverse_turn(&mut state, &mut events);

    let wolf = query::entity_at(&state, WOLF).expect("wolf is back");
    assert!(wolf.alive());
    assert_eq!(wolf.health(), 1);
    assert!(query::corpses_at(&state, WOLF).is_none());
    assert!(matches!(events.last(), Some(Event::Resurrected { .. })));
    let player = query::player(&state).expect("player");
    assert!(player.actions().is_empty());
    assert_eq!(player.time(), 100 - 1 + 30 - 1);
}

#[test]
fn time_is_harvested_only_on_the_first_death() {
    let rules = Rules {
        dire_wolf_health: 1,
        ..Rules::default()
    };
    let mut state = State::from_map(CORRIDOR, &rules).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut events = Vec::new();

    for _ in 0..5 {
        apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
        reverse_turn(&mut state, &mut events);
    }
    apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);

    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::Killed { .. }))
        .count();
    let harvests = events
        .iter()
        .filter(|event| matches!(event, Event::TimeHarvested { .. }))
        .count();
    assert_eq!(kills, 6);
    assert_eq!(harvests, 1);
    let player = query::player(&state).expect("player");
    assert_eq!(player.time(), 100 - 11 + 30);
}

#[test]
fn reversal_undoes_partial_blows_without_resurrection_events() {
    let mut state = State::from_map(CORRIDOR, &Rules::default()).expect("map loads");
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut events = Vec::new();

    apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
    apply_turn(&mut state, InputSymbol::Right, &mut rng, &mut events);
    events.clear();
    reverse_turn(&mut state, &mut events);
    reverse_turn(&mut state, &mut events);

    assert_eq!(query::entity_at(&state, WOLF).map(|wolf| wolf.health()), Some(30));
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::Healed { .. })));
}
