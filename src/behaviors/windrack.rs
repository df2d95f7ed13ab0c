//! Wind rack: a wide slash that shoves the whole front column away

use super::gust::make_gust;
use super::Behavior;
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{BehaviorTraits, Entity};
use crate::state::geom::{Ticks, TilePos, TILE_ROWS};
use crate::state::hit::{Damage, DragKind, Element, Hit};
use crate::state::{query, Decoration, DecorationKind, State};

const SWING_TICK: Ticks = 9;
const RECOVERY_END_TICK: Ticks = 26;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindRack {
    pub damage: Damage,
}

impl WindRack {
    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        if e.behavior_state.elapsed == 0 {
            s.add_decoration(Decoration {
                kind: DecorationKind::WindSlash,
                tile_pos: e.tile_pos,
                offset: (0, -16),
                elapsed: 0,
            });
        } else if e.behavior_state.elapsed == SWING_TICK {
            let (dx, _) = e.facing().dx_dy();
            let front = e.tile_pos.offset(dx, 0);
            let facing = e.facing();
            let damage = self.damage;

            let mut targets = Vec::new();
            for dy in [0, 1, -1] {
                targets.extend(query::entities_at(s, front.offset(0, dy)));
            }

            for id in targets {
                let Some(target) = s.entity_mut(id) else {
                    continue;
                };
                if target.side == e.side
                    || target.traits.intangible
                    || target.flashing_time_left > 0
                {
                    continue;
                }
                let mut hit = Hit {
                    drag: DragKind::Big,
                    slide_direction: facing,
                    element: Element::Wind,
                    ..Hit::default()
                };
                hit.add_damage(damage);
                target.add_hit(hit);
            }

            // The rack also releases a gust down every row of the front
            // column, pushing anything that walks into the lane later.
            for row in 0..TILE_ROWS {
                let gust = make_gust(e, TilePos::new(front.col, row));
                s.add_entity(gust);
            }
        } else if e.behavior_state.elapsed == RECOVERY_END_TICK {
            e.next_behavior = Some(Behavior::idle());
        }
    }

    pub fn traits(&self, _e: &Entity) -> BehaviorTraits {
        BehaviorTraits {
            can_be_countered: true,
            ..BehaviorTraits::default()
        }
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let t = e.behavior_state.elapsed as usize;
        RenderNode::group(
            (0, 0),
            0,
            vec![
                RenderNode::sprite(
                    SpriteKey::MegamanSlash,
                    t.min(assets.frame_count(SpriteKey::MegamanSlash).saturating_sub(1)),
                ),
                RenderNode::group(
                    (0, 0),
                    6,
                    vec![RenderNode::sprite(
                        SpriteKey::WindRack,
                        t.min(assets.frame_count(SpriteKey::WindRack).saturating_sub(1)),
                    )],
                ),
            ],
        )
    }
}
