//! Entity behaviors
//!
//! Every entity is driven by exactly one behavior at a time, drawn from the
//! closed set below. A behavior advances one tick in `step`, releases any
//! pending effects in `cleanup` when it is forcibly replaced, and reports
//! which player-intent gates it leaves open. Per-variant counters (buster
//! cooldown, drag settle timer, ...) are payload fields so cloning the state
//! clones them too.

mod buster;
mod dragged;
mod gust;
mod idle;
mod paralyzed;
mod shot;
mod sword;
mod teleport;
mod windrack;

pub use buster::Buster;
pub use dragged::Dragged;
pub use gust::{make_gust, Gust};
pub use idle::Idle;
pub use paralyzed::Paralyzed;
pub use shot::{make_shot, Shot};
pub use sword::{Sword, SwordRange, SwordStyle};
pub use teleport::Teleport;
pub use windrack::WindRack;

use crate::render::{Assets, RenderNode};
use crate::state::entity::{BehaviorInterrupts, BehaviorTraits, Entity};
use crate::state::geom::Ticks;
use crate::state::State;

/// The closed set of behavior variants
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Idle(Idle),
    Teleport(Teleport),
    Buster(Buster),
    Sword(Sword),
    WindRack(WindRack),
    Gust(Gust),
    Dragged(Dragged),
    Paralyzed(Paralyzed),
    Shot(Shot),
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Idle(Idle)
    }
}

impl Behavior {
    pub fn idle() -> Behavior {
        Behavior::Idle(Idle)
    }

    pub fn teleport() -> Behavior {
        Behavior::Teleport(Teleport::default())
    }

    pub fn dragged(post_drag_paralyze: Ticks, is_big: bool) -> Behavior {
        Behavior::Dragged(Dragged::new(post_drag_paralyze, is_big))
    }

    pub fn paralyzed(duration: Ticks) -> Behavior {
        Behavior::Paralyzed(Paralyzed { duration })
    }

    /// Advance one tick. The entity is detached from the state table while
    /// this runs, so the behavior may query and mutate the rest of the
    /// world freely.
    pub fn step(&mut self, e: &mut Entity, s: &mut State) {
        match self {
            Behavior::Idle(b) => b.step(e, s),
            Behavior::Teleport(b) => b.step(e, s),
            Behavior::Buster(b) => b.step(e, s),
            Behavior::Sword(b) => b.step(e, s),
            Behavior::WindRack(b) => b.step(e, s),
            Behavior::Gust(b) => b.step(e, s),
            Behavior::Dragged(b) => b.step(e, s),
            Behavior::Paralyzed(b) => b.step(e, s),
            Behavior::Shot(b) => b.step(e, s),
        }
    }

    /// Release reservations and pending effects on a forced transition
    pub fn cleanup(&mut self, e: &mut Entity, s: &mut State) {
        match self {
            Behavior::Teleport(b) => b.cleanup(e, s),
            Behavior::Dragged(b) => b.cleanup(e, s),
            _ => {}
        }
    }

    /// Mirror any directions the variant stores
    pub fn flip(&mut self) {
        if let Behavior::Gust(b) = self {
            b.flip();
        }
    }

    pub fn traits(&self, e: &Entity) -> BehaviorTraits {
        match self {
            Behavior::Sword(b) => b.traits(e),
            Behavior::WindRack(b) => b.traits(e),
            Behavior::Shot(b) => b.traits(e),
            _ => BehaviorTraits::default(),
        }
    }

    pub fn interrupts(&self, e: &Entity) -> BehaviorInterrupts {
        match self {
            Behavior::Idle(b) => b.interrupts(e),
            // Everything else keeps all gates closed.
            _ => BehaviorInterrupts::default(),
        }
    }

    /// Render hook; sprite decoding and drawing are external collaborators
    pub fn appearance(&self, e: &Entity, assets: &Assets) -> RenderNode {
        match self {
            Behavior::Idle(b) => b.appearance(e, assets),
            Behavior::Teleport(b) => b.appearance(e, assets),
            Behavior::Buster(b) => b.appearance(e, assets),
            Behavior::Sword(b) => b.appearance(e, assets),
            Behavior::WindRack(b) => b.appearance(e, assets),
            Behavior::Gust(b) => b.appearance(e, assets),
            Behavior::Dragged(b) => b.appearance(e, assets),
            Behavior::Paralyzed(b) => b.appearance(e, assets),
            Behavior::Shot(b) => b.appearance(e, assets),
        }
    }
}

/// Abort an in-flight move, releasing the destination reservation. Shared
/// by the cleanup of every behavior that can be interrupted mid-move.
pub(crate) fn release_pending_move(e: &mut Entity, s: &mut State) {
    if e.future_tile_pos == e.tile_pos {
        return;
    }
    if let Some(tile) = s.field.tile_mut(e.future_tile_pos) {
        if tile.reserver == Some(e.id()) {
            tile.reserver = None;
        }
    }
    e.future_tile_pos = e.tile_pos;
}
