//! The entity record and its per-tick resolution

use std::mem;

use crate::behaviors::Behavior;
use crate::input::Intent;

use super::chip::Chip;
use super::field::{Field, TerrainKind};
use super::geom::{Direction, Side, TilePos, Ticks};
use super::hit::{Damage, DragKind, Element, Hit};
use super::State;

/// Unique entity identifier, assigned by `State::add_entity`. Ids are
/// monotonically increasing and never reused within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(pub u32);

/// Static entity capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityTraits {
    pub can_step_on_hole_like_tiles: bool,
    pub ignores_tile_effects: bool,
    pub cannot_flinch: bool,
    pub fatal_hit_leaves_1hp: bool,
    pub ignores_tile_ownership: bool,
    pub cannot_slide: bool,
    pub intangible: bool,
}

/// Flags that live for exactly one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerTickState {
    pub was_hit: bool,
    pub double_damage_was_consumed: bool,
}

/// In-flight slide (drag) motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideState {
    pub direction: Direction,
    pub elapsed: Ticks,
}

/// Which player-intent gates the active behavior leaves open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorInterrupts {
    pub on_move: bool,
    pub on_charge: bool,
    pub on_chip_use: bool,
}

/// Static properties of the active behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorTraits {
    pub can_be_countered: bool,
    pub runs_in_timestop: bool,
}

/// The active behavior plus how long it has been running
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BehaviorState {
    pub behavior: Behavior,
    pub elapsed: Ticks,
}

/// On-screen record of the last chip used; simulation-visible as a field
/// that expires after 60 ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChipPlaque {
    pub chip: Option<Chip>,
    pub elapsed: Ticks,
    pub double_damage: bool,
}

const CHIP_PLAQUE_DURATION: Ticks = 60;
const CHIP_USE_LOCKOUT: Ticks = 8;
const ANGRY_DAMAGE_THRESHOLD: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emotion {
    #[default]
    Normal,
    FullSynchro,
    Angry,
}

/// The principal mutable record of the simulation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub id: EntityId,

    pub elapsed_time: Ticks,

    pub runs_in_timestop: bool,

    pub behavior_state: BehaviorState,
    pub next_behavior: Option<Behavior>,
    pub is_pending_destruction: bool,

    pub intent: Intent,
    pub last_intent: Intent,

    pub tile_pos: TilePos,
    pub future_tile_pos: TilePos,

    pub slide_state: SlideState,

    pub side: Side,
    pub is_flipped: bool,

    pub is_dead: bool,

    pub element: Element,

    pub hp: i32,
    pub max_hp: i32,
    pub display_hp: i32,

    pub traits: EntityTraits,

    pub power_shot_charge_time: Ticks,
    pub charging_elapsed: Ticks,

    pub confused_time_left: Ticks,
    pub blinded_time_left: Ticks,
    pub immobilized_time_left: Ticks,
    pub flashing_time_left: Ticks,
    pub invincible_time_left: Ticks,
    pub paralyzed_time_left: Ticks,
    pub frozen_time_left: Ticks,
    pub bubbled_time_left: Ticks,

    pub emotion: Emotion,

    pub hit: Hit,
    pub per_tick_state: PerTickState,

    pub chips: Vec<Chip>,
    pub chip_use_queued: bool,
    pub chip_use_lockout_left: Ticks,

    pub chip_plaque: ChipPlaque,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The direction this entity attacks toward
    pub fn facing(&self) -> Direction {
        if self.is_flipped {
            Direction::LEFT
        } else {
            Direction::RIGHT
        }
    }

    pub fn double_damage(&self) -> bool {
        matches!(self.emotion, Emotion::Angry | Emotion::FullSynchro)
    }

    /// Build a damage record from the current emotion, consuming it
    pub fn make_damage_and_consume(&mut self, base: i32) -> Damage {
        let damage = Damage {
            base,
            double_damage: self.double_damage(),
        };
        self.emotion = Emotion::Normal;
        if damage.double_damage {
            self.per_tick_state.double_damage_was_consumed = true;
        }
        damage
    }

    /// Pop the top chip, consume the emotion multiplier, queue the chip's
    /// behavior and raise the plaque. Returns false on an empty stack.
    pub fn use_chip(&mut self) -> bool {
        let Some(chip) = self.chips.pop() else {
            return false;
        };

        let damage = self.make_damage_and_consume(chip.base_damage);
        self.next_behavior = Some((chip.make_behavior)(damage));
        self.chip_plaque = ChipPlaque {
            chip: Some(chip),
            elapsed: 0,
            double_damage: damage.double_damage,
        };
        self.chip_use_lockout_left = CHIP_USE_LOCKOUT;
        self.chip_use_queued = false;
        true
    }

    /// Gates the current behavior leaves open for player intents
    pub fn interrupts(&self) -> BehaviorInterrupts {
        self.behavior_state.behavior.interrupts(self)
    }

    /// Traits of the current behavior
    pub fn behavior_traits(&self) -> BehaviorTraits {
        self.behavior_state.behavior.traits(self)
    }

    /// Move without a reservation. Used by projectiles and gusts that do
    /// not participate in the reservation protocol. Fails out of bounds.
    pub fn move_directly(&mut self, dst: TilePos) -> bool {
        if !dst.in_bounds() {
            return false;
        }
        self.tile_pos = dst;
        self.future_tile_pos = dst;
        true
    }

    /// Reserve `dst` and remember it as the future position. Fails on
    /// same-tile, out-of-bounds, foreign ownership (unless overridden),
    /// foreign reservation, or a tile that refuses entry.
    pub fn start_move(&mut self, dst: TilePos, field: &mut Field) -> bool {
        if dst == self.tile_pos {
            return false;
        }
        let id = self.id;
        let Some(tile) = field.tile_mut(dst) else {
            return false;
        };
        if tile.owner != self.side && !self.traits.ignores_tile_ownership {
            return false;
        }
        if tile.reserver.is_some() && tile.reserver != Some(id) {
            return false;
        }
        if !tile.can_enter(self) {
            return false;
        }

        tile.reserver = Some(id);
        self.future_tile_pos = dst;
        true
    }

    /// Finalize an in-flight move: release the old tile, occupy the new one
    pub fn finish_move(&mut self, field: &mut Field) {
        let old = self.tile_pos;
        if let Some(tile) = field.tile_mut(old) {
            tile.reserver = None;
            // Leaving a cracked tile breaks it.
            if old != self.future_tile_pos
                && tile.terrain == TerrainKind::Cracked
                && !self.traits.ignores_tile_effects
            {
                tile.terrain = TerrainKind::Broken;
            }
        }
        self.tile_pos = self.future_tile_pos;
        if let Some(tile) = field.tile_mut(self.tile_pos) {
            tile.reserver = Some(self.id);
        }
    }

    /// Accumulate an incoming hit. Damage doubles when the attack element
    /// is super-effective; timers max-merge; flags OR; the last non-empty
    /// drag/slide direction wins.
    pub fn add_hit(&mut self, mut incoming: Hit) {
        if self.invincible_time_left > 0 {
            return;
        }

        if incoming.element.is_super_effective_against(self.element) {
            incoming.total_damage *= 2;
        }

        self.hit.total_damage += incoming.total_damage;

        self.hit.paralyze_time = self.hit.paralyze_time.max(incoming.paralyze_time);
        self.hit.confuse_time = self.hit.confuse_time.max(incoming.confuse_time);
        self.hit.blind_time = self.hit.blind_time.max(incoming.blind_time);
        self.hit.immobilize_time = self.hit.immobilize_time.max(incoming.immobilize_time);
        self.hit.freeze_time = self.hit.freeze_time.max(incoming.freeze_time);
        self.hit.bubble_time = self.hit.bubble_time.max(incoming.bubble_time);
        self.hit.flash_time = self.hit.flash_time.max(incoming.flash_time);

        if incoming.flinch {
            self.hit.flinch = true;
        }
        if incoming.drag != DragKind::None {
            self.hit.drag = incoming.drag;
        }
        if !incoming.slide_direction.is_empty() {
            self.hit.slide_direction = incoming.slide_direction;
        }
        if incoming.element != Element::Null {
            self.hit.element = incoming.element;
        }
    }

    /// Replace the behavior right now: clean up the old one, install the
    /// new one at elapsed 0, and step it once. Intent application uses this
    /// so that a move or buster release takes effect on the intent's tick;
    /// behaviors' own transitions should go through `next_behavior`.
    pub fn set_behavior_immediate(&mut self, behavior: Behavior, state: &mut State) {
        let mut old = mem::replace(&mut self.behavior_state.behavior, behavior);
        old.cleanup(self, state);
        self.behavior_state.elapsed = 0;

        let mut current = mem::take(&mut self.behavior_state.behavior);
        current.step(self, state);
        self.behavior_state.behavior = current;
    }

    /// One tick of this entity. The entity is detached from the state's
    /// table while this runs so the behavior can see the rest of the world.
    pub(crate) fn step(&mut self, state: &mut State) {
        self.per_tick_state = PerTickState::default();

        if self.chip_use_lockout_left > 0 {
            self.chip_use_lockout_left -= 1;
        }

        if self.chip_plaque.chip.is_some() {
            self.chip_plaque.elapsed += 1;
            if self.chip_plaque.elapsed >= CHIP_PLAQUE_DURATION {
                self.chip_plaque = ChipPlaque::default();
            }
        }

        self.elapsed_time += 1;
        self.behavior_state.elapsed += 1;

        if let Some(next) = self.next_behavior.take() {
            let mut old = mem::replace(&mut self.behavior_state.behavior, next);
            old.cleanup(self, state);
            self.behavior_state.elapsed = 0;
        }

        let mut behavior = mem::take(&mut self.behavior_state.behavior);
        behavior.step(self, state);
        self.behavior_state.behavior = behavior;

        self.apply_pending_hit();
        self.tick_status_timers();
        self.animate_display_hp();
    }

    /// Resolve the accumulated hit: damage, then statuses per the
    /// exclusivity rules, then the anger threshold.
    fn apply_pending_hit(&mut self) {
        let hit = mem::take(&mut self.hit);

        if hit.total_damage > 0 {
            self.per_tick_state.was_hit = true;

            let mut hp = self.hp - hit.total_damage;
            if self.traits.fatal_hit_leaves_1hp && self.hp > 1 && hp < 1 {
                hp = 1;
            }
            self.hp = hp.max(0);
            if self.hp == 0 && self.max_hp > 0 {
                self.is_dead = true;
            }
        }

        if hit.drag != DragKind::None && !self.traits.cannot_slide {
            // Drag replaces the usual status application: the paralyze time
            // rides along as the post-drag stun.
            self.slide_state = SlideState {
                direction: hit.slide_direction,
                elapsed: 0,
            };
            self.next_behavior = Some(Behavior::dragged(
                hit.paralyze_time,
                hit.drag == DragKind::Big,
            ));
        } else {
            if hit.paralyze_time > 0 {
                self.paralyzed_time_left = self.paralyzed_time_left.max(hit.paralyze_time);
                self.confused_time_left = 0;
                self.frozen_time_left = 0;
                self.bubbled_time_left = 0;
                if !self.traits.cannot_flinch {
                    self.next_behavior = Some(Behavior::paralyzed(hit.paralyze_time));
                }
            }
            if hit.freeze_time > 0 {
                self.frozen_time_left = self.frozen_time_left.max(hit.freeze_time);
                self.paralyzed_time_left = 0;
                self.confused_time_left = 0;
                self.bubbled_time_left = 0;
            }
            if hit.bubble_time > 0 {
                self.bubbled_time_left = self.bubbled_time_left.max(hit.bubble_time);
                self.paralyzed_time_left = 0;
                self.confused_time_left = 0;
                self.frozen_time_left = 0;
            }
            if hit.confuse_time > 0 {
                self.confused_time_left = self.confused_time_left.max(hit.confuse_time);
                self.paralyzed_time_left = 0;
                self.frozen_time_left = 0;
                self.bubbled_time_left = 0;
            }
        }

        self.flashing_time_left = self.flashing_time_left.max(hit.flash_time);
        self.immobilized_time_left = self.immobilized_time_left.max(hit.immobilize_time);
        self.blinded_time_left = self.blinded_time_left.max(hit.blind_time);

        if hit.total_damage >= ANGRY_DAMAGE_THRESHOLD {
            self.emotion = Emotion::Angry;
        }
    }

    fn tick_status_timers(&mut self) {
        for timer in [
            &mut self.flashing_time_left,
            &mut self.invincible_time_left,
            &mut self.blinded_time_left,
            &mut self.immobilized_time_left,
        ] {
            if *timer > 0 {
                *timer -= 1;
            }
        }

        // The mutually exclusive group does not tick while a drag is in
        // progress.
        if self.slide_state.direction.is_empty() {
            for timer in [
                &mut self.confused_time_left,
                &mut self.paralyzed_time_left,
                &mut self.frozen_time_left,
                &mut self.bubbled_time_left,
            ] {
                if *timer > 0 {
                    *timer -= 1;
                }
            }
        } else {
            self.slide_state.elapsed += 1;
        }
    }

    /// Display HP converges toward real HP a little faster for big gaps
    fn animate_display_hp(&mut self) {
        if self.display_hp == self.hp {
            return;
        }
        let delta = self.hp - self.display_hp;
        let step = (delta.abs() >> 3) + 4;
        if delta > 0 {
            self.display_hp = (self.display_hp + step).min(self.hp);
        } else {
            self.display_hp = (self.display_hp - step).max(self.hp);
        }
    }

    /// Mirror this entity across the field: side, facing, positions, slide
    /// direction and any directions stored in the behavior.
    pub fn flip(&mut self) {
        self.side = self.side.opponent();
        self.is_flipped = !self.is_flipped;
        self.tile_pos = self.tile_pos.flipped();
        self.future_tile_pos = self.future_tile_pos.flipped();
        self.slide_state.direction = self.slide_state.direction.flip_h();
        self.behavior_state.behavior.flip();
    }
}
