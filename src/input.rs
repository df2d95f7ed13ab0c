//! Player intents and how they reach the simulation

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::behaviors::{Behavior, Buster};
use crate::state::entity::{Entity, EntityId};
use crate::state::geom::Direction;
use crate::state::State;

/// Damage of an uncharged basic shot
const BUSTER_BASE_DAMAGE: i32 = 1;

/// One player's inputs for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub direction: Direction,
    pub charge_basic_weapon: bool,
    pub use_chip: bool,
}

/// Apply both players' intents for a tick. The application order is
/// shuffled with the state's own random source so neither side gets
/// systematic priority while both peers still compute the same order.
pub fn apply_player_intents(
    s: &mut State,
    offerer_entity_id: EntityId,
    offerer_intent: Intent,
    answerer_entity_id: EntityId,
    answerer_intent: Intent,
) {
    let mut slots = [
        (offerer_entity_id, offerer_intent),
        (answerer_entity_id, answerer_intent),
    ];
    slots.shuffle(&mut s.rng);

    for (id, intent) in slots {
        let Some(mut entity) = s.take_entity(id) else {
            continue;
        };
        apply_player_intent(s, &mut entity, intent);
        s.put_entity(id, entity);
    }
}

/// Route one intent through the gates the current behavior leaves open
fn apply_player_intent(s: &mut State, e: &mut Entity, intent: Intent) {
    e.last_intent = e.intent;
    e.intent = intent;

    let interrupts = e.interrupts();

    // A charge already in progress keeps accumulating even through
    // behaviors whose charge gate is closed.
    if intent.charge_basic_weapon && (interrupts.on_charge || e.charging_elapsed > 0) {
        e.charging_elapsed += 1;
    }

    if interrupts.on_charge && !intent.charge_basic_weapon && e.charging_elapsed > 0 {
        // Release.
        let is_power_shot = e.charging_elapsed >= e.power_shot_charge_time;
        e.set_behavior_immediate(
            Behavior::Buster(Buster::new(BUSTER_BASE_DAMAGE, is_power_shot)),
            s,
        );
        e.charging_elapsed = 0;
    }

    // The release above may have swapped behaviors; re-read the gates.
    let interrupts = e.interrupts();

    if interrupts.on_move && !intent.direction.is_empty() {
        let mut dir = intent.direction;
        if e.confused_time_left > 0 {
            dir = dir.flip_h().flip_v();
        }

        let (dx, dy) = dir.dx_dy();
        let dst = e.tile_pos.offset(dx, dy);
        if e.start_move(dst, &mut s.field) {
            e.set_behavior_immediate(Behavior::teleport(), s);
        }
    }

    if interrupts.on_chip_use
        && (intent.use_chip || e.chip_use_queued)
        && e.chip_use_lockout_left == 0
    {
        let _ = e.use_chip();
    } else if intent.use_chip && !interrupts.on_chip_use {
        // Remember the press until the gate reopens.
        e.chip_use_queued = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::chip;
    use crate::state::geom::{Side, TilePos};

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

    fn arena() -> (State, EntityId, EntityId) {
        let mut s = State::new(1);
        let offerer = s.add_entity(fighter(Side::Offerer, TilePos::new(2, 2)));
        let answerer = s.add_entity(fighter(Side::Answerer, TilePos::new(5, 2)));
        (s, offerer, answerer)
    }

    #[test]
    fn move_intent_reserves_and_teleports() {
        let (mut s, offerer, answerer) = arena();

        s.step();
        apply_player_intents(
            &mut s,
            offerer,
            Intent {
                direction: Direction::RIGHT,
                ..Intent::default()
            },
            answerer,
            Intent::default(),
        );

        // Tick 1: destination reserved, move not yet landed.
        assert_eq!(
            s.field.tile(TilePos::new(3, 2)).unwrap().reserver,
            Some(offerer)
        );
        assert_eq!(s.entity(offerer).unwrap().tile_pos, TilePos::new(2, 2));
        assert!(matches!(
            s.entity(offerer).unwrap().behavior_state.behavior,
            Behavior::Teleport(_)
        ));

        // Tick 4 is teleport tick 3: the move lands.
        for _ in 0..3 {
            s.step();
            apply_player_intents(&mut s, offerer, Intent::default(), answerer, Intent::default());
        }
        let e = s.entity(offerer).unwrap();
        assert_eq!(e.tile_pos, TilePos::new(3, 2));
        assert_eq!(s.field.tile(TilePos::new(2, 2)).unwrap().reserver, None);
    }

    #[test]
    fn confusion_reverses_movement() {
        let (mut s, offerer, answerer) = arena();
        s.entity_mut(offerer).unwrap().confused_time_left = 60;

        s.step();
        apply_player_intents(
            &mut s,
            offerer,
            Intent {
                direction: Direction::RIGHT,
                ..Intent::default()
            },
            answerer,
            Intent::default(),
        );

        // Right flips to left under confusion.
        assert_eq!(
            s.field.tile(TilePos::new(1, 2)).unwrap().reserver,
            Some(offerer)
        );
    }

    #[test]
    fn charge_release_fires_buster() {
        let (mut s, offerer, answerer) = arena();

        let charge = Intent {
            charge_basic_weapon: true,
            ..Intent::default()
        };
        for _ in 0..10 {
            s.step();
            apply_player_intents(&mut s, offerer, charge, answerer, Intent::default());
        }
        assert_eq!(s.entity(offerer).unwrap().charging_elapsed, 10);

        s.step();
        apply_player_intents(&mut s, offerer, Intent::default(), answerer, Intent::default());

        let e = s.entity(offerer).unwrap();
        assert_eq!(e.charging_elapsed, 0);
        match &e.behavior_state.behavior {
            Behavior::Buster(b) => assert!(!b.is_power_shot, "10 ticks is under the threshold"),
            other => panic!("expected buster, got {other:?}"),
        }
    }

    #[test]
    fn held_charge_crosses_power_shot_threshold() {
        let (mut s, offerer, answerer) = arena();

        let charge = Intent {
            charge_basic_weapon: true,
            ..Intent::default()
        };
        for _ in 0..60 {
            s.step();
            apply_player_intents(&mut s, offerer, charge, answerer, Intent::default());
        }
        s.step();
        apply_player_intents(&mut s, offerer, Intent::default(), answerer, Intent::default());

        match &s.entity(offerer).unwrap().behavior_state.behavior {
            Behavior::Buster(b) => assert!(b.is_power_shot),
            other => panic!("expected buster, got {other:?}"),
        }
    }

    #[test]
    fn chip_use_pops_stack_and_consumes_emotion() {
        let (mut s, offerer, answerer) = arena();
        {
            let e = s.entity_mut(offerer).unwrap();
            e.chips = vec![chip::SWORD, chip::LONG_SWRD];
            e.emotion = crate::state::entity::Emotion::Angry;
        }

        s.step();
        apply_player_intents(
            &mut s,
            offerer,
            Intent {
                use_chip: true,
                ..Intent::default()
            },
            answerer,
            Intent::default(),
        );

        let e = s.entity(offerer).unwrap();
        assert_eq!(e.chips.len(), 1, "top chip popped");
        assert_eq!(e.chip_plaque.chip.map(|c| c.index), Some(72));
        assert!(e.chip_plaque.double_damage);
        assert_eq!(e.emotion, crate::state::entity::Emotion::Normal);
        assert!(e.next_behavior.is_some());
    }

    #[test]
    fn intent_order_shuffle_is_seed_deterministic() {
        let (mut a, ao, aa) = arena();
        let (mut b, bo, ba) = arena();

        for _ in 0..30 {
            a.step();
            apply_player_intents(&mut a, ao, Intent::default(), aa, Intent::default());
            b.step();
            apply_player_intents(&mut b, bo, Intent::default(), ba, Intent::default());
        }
        assert_eq!(a, b, "same seed, same inputs, same order draws");
    }
}
