//! End-to-end simulation scenarios driven through the public API

use tilearena::behaviors::{Behavior, Buster, WindRack};
use tilearena::input::{apply_player_intents, Intent};
use tilearena::net::session::new_arena;
use tilearena::state::entity::{Entity, EntityId};
use tilearena::state::hit::Damage;
use tilearena::state::{Direction, Side, State, TilePos};

fn neutral() -> Intent {
    Intent::default()
}

/// One full world tick followed by both players' intents, the way the
/// lockstep engine drives the state.
fn tick(s: &mut State, offerer: EntityId, answerer: EntityId, oi: Intent, ai: Intent) {
    s.step();
    apply_player_intents(s, offerer, oi, answerer, ai);
}

fn fighter(side: Side, pos: TilePos) -> Entity {
    Entity {
        hp: 1000,
        max_hp: 1000,
        display_hp: 1000,
        power_shot_charge_time: 50,
        side,
        is_flipped: side == Side::Answerer,
        tile_pos: pos,
        future_tile_pos: pos,
        ..Entity::default()
    }
}

#[test]
fn buster_shot_hits_distant_enemy() {
    let (mut s, offerer, answerer) = new_arena(1);

    tick(&mut s, offerer, answerer, neutral(), neutral());
    s.entity_mut(offerer).unwrap().next_behavior =
        Some(Behavior::Buster(Buster::new(1, false)));

    let mut cooldown_seen = None;
    for _ in 0..30 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
        if let Behavior::Buster(b) = &s.entity(offerer).unwrap().behavior_state.behavior {
            if b.cooldown_time > 0 {
                cooldown_seen = Some(b.cooldown_time);
            }
        }
    }

    // Lv1 cooldown at horizontal distance 3.
    assert_eq!(cooldown_seen, Some(13));
    assert_eq!(s.entity(answerer).unwrap().hp, 999);
    assert!(matches!(
        s.entity(offerer).unwrap().behavior_state.behavior,
        Behavior::Idle(_)
    ));
    assert_eq!(s.entity_count(), 2, "the shot despawned after striking");
}

#[test]
fn power_shot_multiplies_damage_tenfold() {
    let (mut s, offerer, answerer) = new_arena(1);

    let charge = Intent {
        charge_basic_weapon: true,
        ..Intent::default()
    };
    for _ in 0..60 {
        tick(&mut s, offerer, answerer, charge, neutral());
    }
    assert_eq!(s.entity(offerer).unwrap().charging_elapsed, 60);

    // Release: 60 held ticks crosses the 50-tick threshold.
    tick(&mut s, offerer, answerer, neutral(), neutral());
    match &s.entity(offerer).unwrap().behavior_state.behavior {
        Behavior::Buster(b) => assert!(b.is_power_shot),
        other => panic!("expected buster, got {other:?}"),
    }

    for _ in 0..30 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
    }
    assert_eq!(s.entity(answerer).unwrap().hp, 990);
    assert!(matches!(
        s.entity(offerer).unwrap().behavior_state.behavior,
        Behavior::Idle(_)
    ));
}

#[test]
fn teleport_reserves_then_lands() {
    let (mut s, offerer, answerer) = new_arena(1);

    s.step();
    apply_player_intents(
        &mut s,
        offerer,
        Intent {
            direction: Direction::RIGHT,
            ..Intent::default()
        },
        answerer,
        neutral(),
    );

    // Tick 1: the destination is reserved but not yet occupied.
    assert_eq!(
        s.field.tile(TilePos::new(3, 2)).unwrap().reserver,
        Some(offerer)
    );
    assert_eq!(s.entity(offerer).unwrap().tile_pos, TilePos::new(2, 2));

    // Tick 4 is teleport tick 3: the move lands and the old tile frees up.
    for _ in 0..3 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
    }
    assert_eq!(s.entity(offerer).unwrap().tile_pos, TilePos::new(3, 2));
    assert_eq!(s.field.tile(TilePos::new(2, 2)).unwrap().reserver, None);
}

#[test]
fn wind_rack_drags_enemy_to_the_back_column() {
    let mut s = State::new(4);
    let offerer = s.add_entity(fighter(Side::Offerer, TilePos::new(2, 2)));
    let answerer = s.add_entity(fighter(Side::Answerer, TilePos::new(3, 2)));

    tick(&mut s, offerer, answerer, neutral(), neutral());
    s.entity_mut(offerer).unwrap().next_behavior = Some(Behavior::WindRack(WindRack {
        damage: Damage::new(40),
    }));

    // The swing lands on behavior tick 9.
    for _ in 0..10 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
    }

    {
        let enemy = s.entity(answerer).unwrap();
        assert_eq!(enemy.hp, 960);
        assert_eq!(enemy.slide_state.direction, Direction::RIGHT);
    }

    // Three gusts sweep down the front column.
    let gusts: Vec<_> = s
        .entities()
        .filter(|e| matches!(e.behavior_state.behavior, Behavior::Gust(_)))
        .collect();
    assert_eq!(gusts.len(), 3);
    assert!(gusts.iter().all(|g| g.tile_pos.col == 3));

    // The drag carries the enemy all the way to the back column.
    for _ in 0..11 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
    }
    assert_eq!(s.entity(answerer).unwrap().tile_pos, TilePos::new(5, 2));
    assert!(s.entity(answerer).unwrap().slide_state.direction.is_empty());

    // Gusts ran off the field; both fighters remain.
    assert_eq!(s.entity_count(), 2);

    // After the settle period the enemy recovers.
    for _ in 0..30 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
    }
    assert!(matches!(
        s.entity(answerer).unwrap().behavior_state.behavior,
        Behavior::Idle(_)
    ));
}

#[test]
fn identical_streams_produce_identical_states() {
    let streams: Vec<(Intent, Intent)> = (0..200)
        .map(|i| {
            let oi = Intent {
                direction: match i % 5 {
                    0 => Direction::RIGHT,
                    1 => Direction::UP,
                    2 => Direction::LEFT,
                    _ => Direction::empty(),
                },
                charge_basic_weapon: i % 7 < 3,
                use_chip: false,
            };
            let ai = Intent {
                direction: match i % 4 {
                    0 => Direction::LEFT,
                    1 => Direction::DOWN,
                    _ => Direction::empty(),
                },
                charge_basic_weapon: i % 11 < 4,
                use_chip: false,
            };
            (oi, ai)
        })
        .collect();

    let (mut a, ao, aa) = new_arena(99);
    let (mut b, bo, ba) = new_arena(99);

    for &(oi, ai) in &streams {
        tick(&mut a, ao, aa, oi, ai);
        tick(&mut b, bo, ba, oi, ai);
    }

    assert_eq!(a, b, "bit-equal states, RNG included");
}

#[test]
fn tile_reservations_stay_consistent() {
    let (mut s, offerer, answerer) = new_arena(7);

    for i in 0..300 {
        let oi = Intent {
            direction: match i % 6 {
                0 => Direction::RIGHT,
                1 => Direction::UP,
                2 => Direction::DOWN,
                3 => Direction::LEFT,
                _ => Direction::empty(),
            },
            ..Intent::default()
        };
        let ai = Intent {
            direction: match i % 7 {
                0 => Direction::LEFT,
                1 => Direction::DOWN,
                2 => Direction::UP,
                _ => Direction::empty(),
            },
            ..Intent::default()
        };
        tick(&mut s, offerer, answerer, oi, ai);

        // Every in-flight move owns exactly one reservation, and no two
        // entities aim at the same tile.
        let mut futures = Vec::new();
        for e in s.entities() {
            if e.future_tile_pos != e.tile_pos {
                assert!(
                    !futures.contains(&e.future_tile_pos),
                    "duplicate move target at tick {i}"
                );
                futures.push(e.future_tile_pos);
                assert_eq!(
                    s.field.tile(e.future_tile_pos).unwrap().reserver,
                    Some(e.id()),
                    "future tile not reserved by mover at tick {i}"
                );
            }
        }

        // HP stays within bounds the whole run.
        for e in s.entities() {
            assert!(e.hp >= 0 && e.hp <= e.max_hp);
        }
    }
}

#[test]
fn display_hp_approaches_real_hp_monotonically() {
    let (mut s, offerer, answerer) = new_arena(1);

    tick(&mut s, offerer, answerer, neutral(), neutral());
    s.entity_mut(offerer).unwrap().next_behavior =
        Some(Behavior::Buster(Buster::new(200, false)));

    let mut prev = s.entity(answerer).unwrap().display_hp;
    for _ in 0..60 {
        tick(&mut s, offerer, answerer, neutral(), neutral());
        let e = s.entity(answerer).unwrap();
        assert!(e.display_hp >= e.hp, "display hp never undershoots");
        assert!(e.display_hp <= prev, "display hp approaches monotonically");
        prev = e.display_hp;
    }
    let e = s.entity(answerer).unwrap();
    assert_eq!(e.hp, 800);
    assert_eq!(e.display_hp, 800);
}
