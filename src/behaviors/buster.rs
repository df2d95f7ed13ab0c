//! Basic weapon: a straight shot with a distance-scaled cooldown

use super::shot::make_shot;
use super::Behavior;
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::Entity;
use crate::state::geom::{Ticks, TILE_COLS};
use crate::state::hit::Damage;
use crate::state::{query, State};

/// Pre-roll ticks before a charged shot's animation lines up with the
/// uncharged timeline.
const POWER_SHOT_PREROLL: Ticks = 5;

const POWER_SHOT_MULTIPLIER: i32 = 10;

/// Recovery by buster level (rows) and horizontal distance 1..6 (columns)
const COOLDOWN: [[Ticks; 6]; 5] = [
    [5, 9, 13, 17, 21, 25],
    [4, 8, 11, 15, 18, 21],
    [4, 7, 10, 13, 16, 18],
    [3, 5, 7, 9, 11, 13],
    [3, 4, 5, 6, 7, 8],
];

/// Cooldown lookup, distance clamped to the table range
pub fn cooldown_for(level: usize, distance: i32) -> Ticks {
    let level = level.min(COOLDOWN.len() - 1);
    let distance = distance.clamp(1, TILE_COLS) as usize;
    COOLDOWN[level][distance - 1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buster {
    pub base_damage: i32,
    pub is_power_shot: bool,
    pub is_jammed: bool,
    pub cooldown_time: Ticks,
}

impl Buster {
    pub fn new(base_damage: i32, is_power_shot: bool) -> Self {
        Self {
            base_damage,
            is_power_shot,
            is_jammed: false,
            cooldown_time: 0,
        }
    }

    /// Power shots spend the first ticks on a pre-roll animation; the
    /// firing timeline runs on this adjusted clock.
    fn effective_elapsed(&self, e: &Entity) -> Ticks {
        let mut t = e.behavior_state.elapsed;
        if self.is_power_shot {
            t -= POWER_SHOT_PREROLL;
        }
        t
    }

    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        let t = self.effective_elapsed(e);

        if t == 5 + self.cooldown_time - 1 {
            e.next_behavior = Some(Behavior::idle());
            return;
        }

        if t == 1 {
            let distance = query::nearest_enemy_row_distance(s, e.tile_pos, e.side)
                .unwrap_or(TILE_COLS);
            self.cooldown_time = cooldown_for(0, distance);

            let (dx, _) = e.facing().dx_dy();
            let mut damage = self.base_damage;
            if self.is_power_shot {
                damage *= POWER_SHOT_MULTIPLIER;
            }
            let shot = make_shot(e, e.tile_pos.offset(dx, 0), Damage::new(damage));
            s.add_entity(shot);
        }

        // The recovery tail can be cancelled into a move.
        if !e.intent.direction.is_empty() && t >= 5 {
            let mut dir = e.intent.direction;
            if e.confused_time_left > 0 {
                dir = dir.flip_h().flip_v();
            }

            let (dx, dy) = dir.dx_dy();
            if e.start_move(e.tile_pos.offset(dx, dy), &mut s.field) {
                e.next_behavior = Some(Behavior::teleport());
            }
        }
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let t = self.effective_elapsed(e);
        if t < 0 {
            return RenderNode::sprite(SpriteKey::MegamanIdle, 0);
        }
        let t = t as usize;

        let mut children = vec![
            RenderNode::sprite(
                SpriteKey::MegamanBuster,
                t.min(assets.frame_count(SpriteKey::MegamanBuster).saturating_sub(1)),
            ),
            RenderNode::sprite(
                SpriteKey::BusterArm,
                t.min(assets.frame_count(SpriteKey::BusterArm).saturating_sub(1)),
            ),
        ];

        if !self.is_jammed && t >= 1 {
            let flash_frame = t - 1;
            if flash_frame < assets.frame_count(SpriteKey::MuzzleFlash) {
                children.push(RenderNode::group(
                    (crate::render::TILE_RENDERED_W, -26),
                    7,
                    vec![RenderNode::sprite(SpriteKey::MuzzleFlash, flash_frame)],
                ));
            }
        }

        RenderNode::group((0, 0), 0, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_table_lookup() {
        assert_eq!(cooldown_for(0, 1), 5);
        assert_eq!(cooldown_for(0, 3), 13);
        assert_eq!(cooldown_for(0, 6), 25);
        assert_eq!(cooldown_for(4, 6), 8);
    }

    #[test]
    fn cooldown_distance_clamped() {
        assert_eq!(cooldown_for(0, 0), 5);
        assert_eq!(cooldown_for(0, 99), 25);
    }
}
