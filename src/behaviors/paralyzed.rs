//! Stunned in place for a fixed duration; no interrupts

use super::Behavior;
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::Entity;
use crate::state::geom::Ticks;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paralyzed {
    pub duration: Ticks,
}

impl Paralyzed {
    pub fn step(&mut self, e: &mut Entity, _s: &mut State) {
        if e.behavior_state.elapsed >= self.duration {
            e.next_behavior = Some(Behavior::idle());
        }
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let frames = assets.frame_count(SpriteKey::MegamanParalyzed);
        RenderNode::sprite(
            SpriteKey::MegamanParalyzed,
            (e.behavior_state.elapsed as usize / 2) % frames.max(1),
        )
    }
}
