//! Read-only queries over the entity table

use super::entity::EntityId;
use super::geom::{Side, TilePos};
use super::State;

/// Ids of every entity standing on `pos`, in id order
pub fn entities_at(s: &State, pos: TilePos) -> Vec<EntityId> {
    s.entities()
        .filter(|e| e.tile_pos == pos)
        .map(|e| e.id())
        .collect()
}

/// Horizontal distance to the nearest targetable enemy of `side` on the
/// same row, if any
pub fn nearest_enemy_row_distance(s: &State, from: TilePos, side: Side) -> Option<i32> {
    s.entities()
        .filter(|e| e.side != side && !e.traits.intangible && e.tile_pos.row == from.row)
        .map(|e| (e.tile_pos.col - from.col).abs())
        .min()
}
