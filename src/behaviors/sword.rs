//! Sword family: windup, a range-patterned slash, recovery

use super::Behavior;
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{BehaviorTraits, Entity};
use crate::state::geom::{Ticks, TilePos};
use crate::state::hit::{Damage, Element, Hit};
use crate::state::{query, State};

const SLASH_TICK: Ticks = 9;
const RECOVERY_END_TICK: Ticks = 19;
const SLASH_FLASH_TIME: Ticks = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwordStyle {
    Sword,
    Blade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwordRange {
    Short,
    Wide,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sword {
    pub damage: Damage,
    pub style: SwordStyle,
    pub range: SwordRange,
}

impl Sword {
    fn target_tiles(&self, e: &Entity) -> Vec<TilePos> {
        let (dx, _) = e.facing().dx_dy();
        let front = e.tile_pos.offset(dx, 0);
        match self.range {
            SwordRange::Short => vec![front],
            SwordRange::Wide => vec![front, front.offset(0, -1), front.offset(0, 1)],
            SwordRange::Long => vec![front, front.offset(dx, 0)],
        }
    }

    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        if e.behavior_state.elapsed == SLASH_TICK {
            let damage = self.damage;
            for pos in self.target_tiles(e) {
                for id in query::entities_at(s, pos) {
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
                        flash_time: SLASH_FLASH_TIME,
                        flinch: true,
                        element: Element::Sword,
                        ..Hit::default()
                    };
                    hit.add_damage(damage);
                    target.add_hit(hit);
                }
            }
        }

        if e.behavior_state.elapsed == RECOVERY_END_TICK {
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
        let arc_key = match self.style {
            SwordStyle::Sword => SpriteKey::SwordArc,
            SwordStyle::Blade => SpriteKey::BladeArc,
        };
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
                        arc_key,
                        t.min(assets.frame_count(arc_key).saturating_sub(1)),
                    )],
                ),
            ],
        )
    }
}
