//! Being shoved across the field by a drag hit
//
// Drag rides on the entity's slide state: every four ticks the slide tries
// to claim the next tile, finalizing two ticks later, until the slide is
// blocked or runs off the owned area. Afterwards the entity settles for a
// short while and then either recovers or stays stunned.

use super::{release_pending_move, Behavior};
use crate::render::{Assets, RenderNode, SpriteKey};
use crate::state::entity::{Entity, SlideState};
use crate::state::geom::Ticks;
use crate::state::State;

const SETTLE_TICKS: Ticks = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dragged {
    pub post_drag_paralyze: Ticks,
    pub is_big: bool,

    settle_elapsed: Ticks,
}

impl Dragged {
    pub fn new(post_drag_paralyze: Ticks, is_big: bool) -> Self {
        Self {
            post_drag_paralyze,
            is_big,
            settle_elapsed: 0,
        }
    }

    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        if e.slide_state.direction.is_empty() {
            self.settle_elapsed += 1;
            if self.settle_elapsed == SETTLE_TICKS - 1 {
                e.next_behavior = Some(if self.post_drag_paralyze > 0 {
                    Behavior::paralyzed(self.post_drag_paralyze)
                } else {
                    Behavior::idle()
                });
            }
            return;
        }

        if e.behavior_state.elapsed % 4 == 0 {
            let (dx, dy) = e.slide_state.direction.dx_dy();
            let dst = e.tile_pos.offset(dx, dy);
            if !e.start_move(dst, &mut s.field) {
                e.slide_state = SlideState::default();
            }
        } else if e.behavior_state.elapsed % 4 == 2 {
            e.finish_move(&mut s.field);
            // A small drag only carries one tile.
            if !self.is_big {
                e.slide_state = SlideState::default();
            }
        }
    }

    // Slide state stays untouched here: a fresh drag hit sets it before
    // the behavior swap and the replacement Dragged picks it up.
    pub fn cleanup(&mut self, e: &mut Entity, s: &mut State) {
        release_pending_move(e, s);
    }

    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        if self.post_drag_paralyze > 0 {
            return RenderNode::sprite(SpriteKey::MegamanParalyzed, 0);
        }
        let frames = assets.frame_count(SpriteKey::MegamanFlinch);
        RenderNode::sprite(
            SpriteKey::MegamanFlinch,
            (self.settle_elapsed as usize).min(frames.saturating_sub(1)),
        )
    }
}
