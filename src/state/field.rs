//! The 6x3 tile grid: ownership, terrain, reservations

use super::entity::{Entity, EntityId};
use super::geom::{Side, TilePos, TILE_COLS, TILE_ROWS};

/// Terrain of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerrainKind {
    #[default]
    Normal,
    Cracked,
    Hole,
    Broken,
}

impl TerrainKind {
    /// Hole-like tiles cannot be entered by ordinary entities
    pub fn is_hole_like(self) -> bool {
        matches!(self, TerrainKind::Hole | TerrainKind::Broken)
    }
}

/// One tile of the field. At most one entity may hold the reservation at a
/// time; the reservation marks either an in-flight move onto this tile or
/// the tile an entity currently stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub owner: Side,
    pub terrain: TerrainKind,
    pub reserver: Option<EntityId>,
}

impl Tile {
    /// Entry predicate: terrain and ownership, independent of reservations
    pub fn can_enter(&self, entity: &Entity) -> bool {
        if self.terrain.is_hole_like() && !entity.traits.can_step_on_hole_like_tiles {
            return false;
        }
        if self.owner != entity.side && !entity.traits.ignores_tile_ownership {
            return false;
        }
        true
    }
}

/// The battle field: 6 columns by 3 rows, split down the middle at start
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    tiles: [Tile; (TILE_COLS * TILE_ROWS) as usize],
}

impl Field {
    pub fn new() -> Self {
        let mut tiles = [Tile {
            owner: Side::Offerer,
            terrain: TerrainKind::Normal,
            reserver: None,
        }; (TILE_COLS * TILE_ROWS) as usize];

        for row in 0..TILE_ROWS {
            for col in TILE_COLS / 2..TILE_COLS {
                tiles[TilePos::new(col, row).index()].owner = Side::Answerer;
            }
        }

        Self { tiles }
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        if !pos.in_bounds() {
            return None;
        }
        Some(&self.tiles[pos.index()])
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        if !pos.in_bounds() {
            return None;
        }
        Some(&mut self.tiles[pos.index()])
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TilePos, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| {
            (
                TilePos::new(i as i32 % TILE_COLS, i as i32 / TILE_COLS),
                t,
            )
        })
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Drop every reservation held by `id`. Used when an entity is removed.
    pub fn release_reservations(&mut self, id: EntityId) {
        for tile in self.tiles.iter_mut() {
            if tile.reserver == Some(id) {
                tile.reserver = None;
            }
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entity::EntityTraits;

    fn entity_on(side: Side) -> Entity {
        Entity {
            side,
            ..Entity::default()
        }
    }

    #[test]
    fn ownership_split() {
        let field = Field::new();
        assert_eq!(field.tile(TilePos::new(2, 0)).unwrap().owner, Side::Offerer);
        assert_eq!(
            field.tile(TilePos::new(3, 0)).unwrap().owner,
            Side::Answerer
        );
    }

    #[test]
    fn can_enter_refuses_foreign_tiles() {
        let field = Field::new();
        let e = entity_on(Side::Offerer);
        assert!(field.tile(TilePos::new(1, 1)).unwrap().can_enter(&e));
        assert!(!field.tile(TilePos::new(4, 1)).unwrap().can_enter(&e));

        let ghost = Entity {
            side: Side::Offerer,
            traits: EntityTraits {
                ignores_tile_ownership: true,
                ..EntityTraits::default()
            },
            ..Entity::default()
        };
        assert!(field.tile(TilePos::new(4, 1)).unwrap().can_enter(&ghost));
    }

    #[test]
    fn can_enter_refuses_holes() {
        let mut field = Field::new();
        field.tile_mut(TilePos::new(1, 1)).unwrap().terrain = TerrainKind::Broken;

        let e = entity_on(Side::Offerer);
        assert!(!field.tile(TilePos::new(1, 1)).unwrap().can_enter(&e));

        let floaty = Entity {
            side: Side::Offerer,
            traits: EntityTraits {
                can_step_on_hole_like_tiles: true,
                ..EntityTraits::default()
            },
            ..Entity::default()
        };
        assert!(field.tile(TilePos::new(1, 1)).unwrap().can_enter(&floaty));
    }
}
