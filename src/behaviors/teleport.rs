//! Teleport move animation: a short vanish, the move lands, then endlag

use super::release_pending_move;
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::Entity;
use crate::state::geom::Ticks;
use crate::state::State;

const MOVE_TICK: Ticks = 3;
const ANIMATION_TICKS: Ticks = 6;
const ENDLAG_TICKS: Ticks = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Teleport;

impl Teleport {
    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        if e.behavior_state.elapsed == MOVE_TICK {
            e.finish_move(&mut s.field);
        }

        if e.behavior_state.elapsed == ANIMATION_TICKS + ENDLAG_TICKS {
            e.next_behavior = Some(super::Behavior::idle());
        }
    }

    pub fn cleanup(&mut self, e: &mut Entity, s: &mut State) {
        release_pending_move(e, s);
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let t = e.behavior_state.elapsed as usize;
        if t < MOVE_TICK as usize {
            RenderNode::sprite(SpriteKey::MegamanTeleportStart, t)
        } else {
            let frames = assets.frame_count(SpriteKey::MegamanTeleportEnd);
            let frame = (t - MOVE_TICK as usize).min(frames.saturating_sub(1));
            RenderNode::sprite(SpriteKey::MegamanTeleportEnd, frame)
        }
    }
}
