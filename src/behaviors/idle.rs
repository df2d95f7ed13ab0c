//! Default behavior: stand still, accept every player interrupt

use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{BehaviorInterrupts, Entity};
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Idle;

impl Idle {
    pub fn step(&mut self, _e: &mut Entity, _s: &mut State) {}

    pub fn interrupts(&self, _e: &Entity) -> BehaviorInterrupts {
        BehaviorInterrupts {
            on_move: true,
            on_charge: true,
            on_chip_use: true,
        }
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        let frames = assets.frame_count(SpriteKey::MegamanIdle);
        RenderNode::sprite(
            SpriteKey::MegamanIdle,
            e.elapsed_time as usize % frames.max(1),
        )
    }
}
