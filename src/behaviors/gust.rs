//! Gust: a transient pusher that sweeps down a lane

use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{BehaviorState, Entity, EntityTraits};
use crate::state::geom::{Direction, TilePos};
use crate::state::hit::{DragKind, Element, Hit};
use crate::state::{query, State};

use super::Behavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gust {
    pub direction: Direction,
}

/// Build the field entity carrying a gust. It walks over every tile kind,
/// ignores ownership and cannot be interacted with.
pub fn make_gust(owner: &Entity, pos: TilePos) -> Entity {
    Entity {
        tile_pos: pos,
        future_tile_pos: pos,
        side: owner.side,
        is_flipped: owner.is_flipped,
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
            behavior: Behavior::Gust(Gust {
                direction: owner.facing(),
            }),
            elapsed: 0,
        },
        ..Entity::default()
    }
}

impl Gust {
    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        // Shove anything standing on this tile along, then keep moving.
        let direction = self.direction;
        for id in query::entities_at(s, e.tile_pos) {
            let Some(target) = s.entity_mut(id) else {
                continue;
            };
            if target.side == e.side || target.traits.intangible || target.flashing_time_left > 0
            {
                continue;
            }
            target.add_hit(Hit {
                drag: DragKind::Big,
                slide_direction: direction,
                element: Element::Wind,
                ..Hit::default()
            });
        }

        let (dx, dy) = self.direction.dx_dy();
        if !e.move_directly(e.tile_pos.offset(dx, dy)) {
            e.is_pending_destruction = true;
        }
    }

    pub fn flip(&mut self) {
        self.direction = self.direction.flip_h();
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let frames = assets.frame_count(SpriteKey::Gust);
        RenderNode::sprite(
            SpriteKey::Gust,
            e.behavior_state.elapsed as usize % frames.max(1),
        )
    }
}
