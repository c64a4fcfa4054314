//! Reference entity store.
//!
//! `World` holds entities and the per-cell stacks. It uses `im` persistent
//! maps, so `clone()` is O(1) and doubles as the undo snapshot hook.
//!
//! ## Usage
//!
//! ```
//! use hex_rules::core::{GridQuery, HexPos, ObjectType, TextType, World};
//!
//! let mut world = World::new(6, 4);
//! let wall = world.place_object(ObjectType::Wall, HexPos::new(0, 0)).unwrap();
//! world.place_word(TextType::Wall, HexPos::new(1, 1)).unwrap();
//!
//! assert_eq!(world.entities_at(HexPos::new(0, 0)), &[wall]);
//! assert!(world.place_object(ObjectType::Rock, HexPos::new(6, 0)).is_err());
//! ```

use im::{HashMap as ImHashMap, OrdMap};
use smallvec::SmallVec;

use super::entity::{Entity, EntityId, EntitySpawn};
use super::error::WorldError;
use super::grid::{EntityStore, GridQuery};
use super::hex::HexPos;
use super::words::{ObjectType, TextType};

/// Rhombus-shaped hex level with stacked cells.
#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    height: i32,

    /// Entities by id.
    entities: OrdMap<EntityId, Entity>,

    /// Cell stacks in insertion (layer) order.
    cells: ImHashMap<HexPos, SmallVec<[EntityId; 4]>>,

    /// Next entity ID to allocate.
    next_entity_id: u32,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Grid must be at least 1x1");

        Self {
            width,
            height,
            entities: OrdMap::new(),
            cells: ImHashMap::new(),
            next_entity_id: 0,
        }
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the world has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Create an entity, checking its position.
    pub fn place(&mut self, spawn: EntitySpawn) -> Result<EntityId, WorldError> {
        self.check_bounds(spawn.position)?;
        Ok(self.insert(spawn))
    }

    /// Place a word entity.
    pub fn place_word(&mut self, word: TextType, pos: HexPos) -> Result<EntityId, WorldError> {
        self.place(EntitySpawn::word(word, pos))
    }

    /// Place a plain object.
    pub fn place_object(&mut self, category: ObjectType, pos: HexPos) -> Result<EntityId, WorldError> {
        self.place(EntitySpawn::object(category, pos))
    }

    /// Move an entity to the top of another cell's stack.
    pub fn move_entity(&mut self, id: EntityId, to: HexPos) -> Result<(), WorldError> {
        self.check_bounds(to)?;
        let from = self
            .entities
            .get(&id)
            .map(|e| e.position)
            .ok_or(WorldError::EntityNotFound(id))?;

        self.unlink(id, from);
        self.cells.entry(to).or_insert_with(SmallVec::new).push(id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = to;
        }
        Ok(())
    }

    /// Remove an entity.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, WorldError> {
        self.despawn(id).ok_or(WorldError::EntityNotFound(id))
    }

    /// Ids of live entities of `category`, ascending.
    #[must_use]
    pub fn entities_of(&self, category: ObjectType) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.category == category)
            .map(|e| e.id)
            .collect()
    }

    fn check_bounds(&self, pos: HexPos) -> Result<(), WorldError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds { pos, width: self.width, height: self.height })
        }
    }

    fn insert(&mut self, spawn: EntitySpawn) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;

        self.cells.entry(spawn.position).or_insert_with(SmallVec::new).push(id);
        self.entities.insert(id, Entity::from_spawn(id, spawn));
        id
    }

    fn unlink(&mut self, id: EntityId, pos: HexPos) {
        let emptied = match self.cells.get_mut(&pos) {
            Some(stack) => {
                stack.retain(|&mut e| e != id);
                stack.is_empty()
            }
            None => false,
        };
        if emptied {
            self.cells.remove(&pos);
        }
    }
}

impl GridQuery for World {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn entities_at(&self, pos: HexPos) -> &[EntityId] {
        self.cells.get(&pos).map_or(&[], |stack| stack.as_slice())
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }
}

impl EntityStore for World {
    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn spawn(&mut self, spawn: EntitySpawn) -> EntityId {
        debug_assert!(self.in_bounds(spawn.position), "spawn outside grid at {}", spawn.position);
        self.insert(spawn)
    }

    fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.unlink(id, entity.position);
        Some(entity)
    }
}
