//! Render delegation
//!
//! The simulation never draws. It produces a `RenderNode` tree describing
//! what should appear where; sprite decoding and rasterization live in the
//! UI layer. `Assets` carries just the animation metadata the simulation
//! needs to clamp frame indices.

use std::collections::HashMap;

use crate::state::entity::{Emotion, Entity};
use crate::state::field::TerrainKind;
use crate::state::geom::Side;
use crate::state::{DecorationKind, State};

/// Rendered tile size in scene pixels
pub const TILE_RENDERED_W: i32 = 40;
pub const TILE_RENDERED_H: i32 = 24;

/// Identifies a sprite sheet / animation in the UI layer's asset bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    MegamanIdle,
    MegamanTeleportStart,
    MegamanTeleportEnd,
    MegamanBuster,
    MegamanSlash,
    MegamanFlinch,
    MegamanParalyzed,
    BusterArm,
    MuzzleFlash,
    SwordArc,
    BladeArc,
    WindRack,
    WindSlash,
    Gust,
    Shot,
    FullSynchroAura,
    ChipIcon(usize),
    Tile(TerrainKind),
}

/// Animation metadata for frame clamping. The UI layer fills this from its
/// decoded sheets; the defaults here match the stock animation lengths.
#[derive(Debug, Clone)]
pub struct Assets {
    frames: HashMap<SpriteKey, usize>,
}

impl Default for Assets {
    fn default() -> Self {
        let mut frames = HashMap::new();
        for (key, count) in [
            (SpriteKey::MegamanIdle, 1),
            (SpriteKey::MegamanTeleportStart, 3),
            (SpriteKey::MegamanTeleportEnd, 3),
            (SpriteKey::MegamanBuster, 8),
            (SpriteKey::MegamanSlash, 12),
            (SpriteKey::MegamanFlinch, 8),
            (SpriteKey::MegamanParalyzed, 4),
            (SpriteKey::BusterArm, 8),
            (SpriteKey::MuzzleFlash, 6),
            (SpriteKey::SwordArc, 8),
            (SpriteKey::BladeArc, 8),
            (SpriteKey::WindRack, 12),
            (SpriteKey::WindSlash, 16),
            (SpriteKey::Gust, 4),
            (SpriteKey::Shot, 2),
            (SpriteKey::FullSynchroAura, 8),
        ] {
            frames.insert(key, count);
        }
        Self { frames }
    }
}

impl Assets {
    pub fn frame_count(&self, key: SpriteKey) -> usize {
        self.frames.get(&key).copied().unwrap_or(1)
    }

    pub fn set_frame_count(&mut self, key: SpriteKey, count: usize) {
        self.frames.insert(key, count);
    }
}

/// One node of the scene description tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderNode {
    pub offset: (i32, i32),
    pub layer: i8,
    pub flip_h: bool,
    /// Hidden this frame (flash blink)
    pub hidden: bool,
    /// Drawn fully white this frame (hit feedback)
    pub whiteout: bool,
    pub sprite: Option<(SpriteKey, usize)>,
    pub text: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn sprite(key: SpriteKey, frame: usize) -> RenderNode {
        RenderNode {
            sprite: Some((key, frame)),
            ..RenderNode::default()
        }
    }

    pub fn group(offset: (i32, i32), layer: i8, children: Vec<RenderNode>) -> RenderNode {
        RenderNode {
            offset,
            layer,
            children,
            ..RenderNode::default()
        }
    }

    pub fn text(value: String) -> RenderNode {
        RenderNode {
            text: Some(value),
            ..RenderNode::default()
        }
    }
}

impl Entity {
    /// Scene node for this entity, including slide offset, facing flip,
    /// flash blink and hit whiteout
    pub fn appearance(&self, assets: &Assets) -> RenderNode {
        let (dx, dy) = self.slide_state.direction.dx_dy();
        let slide = (self.slide_state.elapsed + 2 + 4) % 4 - 2;
        let px = self.tile_pos.col * TILE_RENDERED_W
            + TILE_RENDERED_W / 2
            + dx * slide * TILE_RENDERED_W / 4;
        let py = self.tile_pos.row * TILE_RENDERED_H
            + TILE_RENDERED_H / 2
            + dy * slide * TILE_RENDERED_H / 4;

        let character = RenderNode {
            flip_h: self.is_flipped,
            hidden: self.flashing_time_left > 0 && (self.elapsed_time / 2) % 2 == 0,
            whiteout: self.per_tick_state.was_hit,
            children: vec![self.behavior_state.behavior.appearance(self, assets)],
            ..RenderNode::default()
        };

        let mut root = RenderNode::group((px, py), 0, vec![character]);

        if self.emotion == Emotion::FullSynchro {
            let frames = assets.frame_count(SpriteKey::FullSynchroAura);
            root.children.push(RenderNode {
                layer: 8,
                sprite: Some((
                    SpriteKey::FullSynchroAura,
                    self.elapsed_time as usize % frames.max(1),
                )),
                ..RenderNode::default()
            });
        }

        if self.side == Side::Answerer {
            if self.display_hp != 0 {
                let mut hp = RenderNode::text(self.display_hp.to_string());
                hp.offset = (0, 4);
                root.children.push(hp);
            }
        } else {
            // Offerer's remaining chips fan out above the character.
            let count = self.chips.len();
            for (i, chip) in self.chips.iter().enumerate() {
                let j = (count - i - 1) as i32;
                root.children.push(RenderNode {
                    offset: (-j * 2, -56 - j * 2),
                    layer: 8,
                    sprite: Some((SpriteKey::ChipIcon(chip.index), 0)),
                    ..RenderNode::default()
                });
            }
        }

        root
    }
}

impl State {
    /// Scene description for the whole world: tiles, decorations, entities
    pub fn appearance(&self, assets: &Assets) -> RenderNode {
        let mut children = Vec::new();

        for (pos, tile) in self.field.tiles() {
            children.push(RenderNode {
                offset: (pos.col * TILE_RENDERED_W, pos.row * TILE_RENDERED_H),
                layer: -1,
                sprite: Some((SpriteKey::Tile(tile.terrain), 0)),
                ..RenderNode::default()
            });
        }

        for d in &self.decorations {
            let key = match d.kind {
                DecorationKind::WindSlash => SpriteKey::WindSlash,
            };
            let frames = assets.frame_count(key);
            children.push(RenderNode {
                offset: (
                    d.tile_pos.col * TILE_RENDERED_W + d.offset.0,
                    d.tile_pos.row * TILE_RENDERED_H + d.offset.1,
                ),
                layer: 5,
                sprite: Some((key, (d.elapsed as usize).min(frames.saturating_sub(1)))),
                ..RenderNode::default()
            });
        }

        for e in self.entities() {
            children.push(e.appearance(assets));
        }

        RenderNode::group((0, 0), 0, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::geom::TilePos;

    #[test]
    fn entity_node_positions_by_tile() {
        let e = Entity {
            tile_pos: TilePos::new(2, 1),
            future_tile_pos: TilePos::new(2, 1),
            ..Entity::default()
        };
        let node = e.appearance(&Assets::default());
        assert_eq!(
            node.offset,
            (
                2 * TILE_RENDERED_W + TILE_RENDERED_W / 2,
                TILE_RENDERED_H + TILE_RENDERED_H / 2
            )
        );
    }

    #[test]
    fn world_appearance_includes_all_tiles() {
        let s = State::new(0);
        let node = s.appearance(&Assets::default());
        let tiles = node
            .children
            .iter()
            .filter(|n| matches!(n.sprite, Some((SpriteKey::Tile(_), _))))
            .count();
        assert_eq!(tiles, 18);
    }
}
