//! World state and the per-tick simulation kernel

pub mod chip;
pub mod entity;
pub mod field;
pub mod geom;
pub mod hit;
pub mod query;

pub use chip::Chip;
pub use entity::{Entity, EntityId};
pub use field::{Field, TerrainKind, Tile};
pub use geom::{Direction, Side, TilePos, Ticks};
pub use hit::{Damage, DragKind, Element, Hit};

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Transient visual spawned by an attack; simulation-visible only as an
/// aging record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    WindSlash,
}

impl DecorationKind {
    pub fn duration(self) -> Ticks {
        match self {
            DecorationKind::WindSlash => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub tile_pos: TilePos,
    pub offset: (i32, i32),
    pub elapsed: Ticks,
}

/// The whole simulated world. Deterministic: stepping two equal states
/// produces equal states, including the random source.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub field: Field,
    entities: BTreeMap<EntityId, Entity>,
    pub decorations: Vec<Decoration>,
    pub(crate) rng: ChaCha8Rng,
    elapsed_time: Ticks,
    next_entity_id: u32,
}

impl State {
    /// Fresh world with an empty entity table
    pub fn new(seed: u64) -> Self {
        Self {
            field: Field::new(),
            entities: BTreeMap::new(),
            decorations: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            elapsed_time: 0,
            // Id 0 stays unused so it can mean "nobody" in debug output.
            next_entity_id: 1,
        }
    }

    /// Install an entity, assigning it the next id. Entities added while a
    /// tick is in progress take their first step on the following tick.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entities in ascending id order, which is insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Detach an entity so a caller can mutate it and the world together.
    /// Must be paired with `put_entity`.
    pub(crate) fn take_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub(crate) fn put_entity(&mut self, id: EntityId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn add_decoration(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    pub fn elapsed_time(&self) -> Ticks {
        self.elapsed_time
    }

    /// One world tick: decorations age, each entity runs its per-tick
    /// routine in id order, destroyed entities leave the table, and the
    /// clock advances. Entities spawned mid-tick are observed next tick.
    pub fn step(&mut self) {
        self.decorations.retain_mut(|d| {
            d.elapsed += 1;
            d.elapsed < d.kind.duration()
        });

        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            let Some(mut entity) = self.entities.remove(&id) else {
                continue;
            };
            entity.step(self);
            self.entities.insert(id, entity);
        }

        let destroyed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.is_pending_destruction)
            .map(|(&id, _)| id)
            .collect();
        for id in destroyed {
            self.entities.remove(&id);
            self.field.release_reservations(id);
        }

        self.elapsed_time += 1;
    }
}
