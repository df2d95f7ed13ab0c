//! A fired projectile: one tile forward per tick until it strikes

use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{BehaviorState, BehaviorTraits, Entity, EntityTraits};
use crate::state::geom::TilePos;
use crate::state::hit::{Damage, Element, Hit};
use crate::state::{query, State};

use super::Behavior;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub damage: Damage,
    pub element: Element,
}

/// Build the field entity carrying a projectile fired by `owner`
pub fn make_shot(owner: &Entity, pos: TilePos, damage: Damage) -> Entity {
    Entity {
        tile_pos: pos,
        future_tile_pos: pos,
        side: owner.side,
        is_flipped: owner.is_flipped,
        runs_in_timestop: true,
        traits: EntityTraits {
            can_step_on_hole_like_tiles: true,
            ignores_tile_effects: true,
            cannot_flinch: true,
            ignores_tile_ownership: true,
            cannot_slide: true,
            intangible: true,
            ..EntityTraits::default()
        },
        behavior_state: BehaviorState {
            behavior: Behavior::Shot(Shot {
                damage,
                element: Element::Null,
            }),
            elapsed: 0,
        },
        ..Entity::default()
    }
}

impl Shot {
    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        // Strike whatever stands on the current tile first.
        let damage = self.damage;
        let element = self.element;
        for id in query::entities_at(s, e.tile_pos) {
            let Some(target) = s.entity_mut(id) else {
                continue;
            };
            if target.side == e.side || target.traits.intangible || target.flashing_time_left > 0
            {
                continue;
            }
            let mut hit = Hit {
                element,
                ..Hit::default()
            };
            hit.add_damage(damage);
            target.add_hit(hit);
            e.is_pending_destruction = true;
            return;
        }

        let (dx, _) = e.facing().dx_dy();
        if !e.move_directly(e.tile_pos.offset(dx, 0)) {
            e.is_pending_destruction = true;
        }
    }

    pub fn traits(&self, _e: &Entity) -> BehaviorTraits {
        BehaviorTraits {
            runs_in_timestop: true,
            ..BehaviorTraits::default()
        }
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let frames = assets.frame_count(SpriteKey::Shot);
        RenderNode::sprite(
            SpriteKey::Shot,
            e.behavior_state.elapsed as usize % frames.max(1),
        )
    }
}
