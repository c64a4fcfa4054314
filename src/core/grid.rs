//! Grid and entity store interfaces the engine runs against.
//!
//! The entity-lifecycle manager owns all entities. The engine only sees it
//! through these two traits:
//!
//! - [`GridQuery`]: read-only cell queries used by the phrase search
//! - [`EntityStore`]: entity enumeration and the mutation hooks used by the
//!   rule applier and the settle loop
//!
//! [`crate::core::World`] is the reference implementation.

use smallvec::SmallVec;

use super::entity::{Entity, EntityId, EntitySpawn};
use super::hex::HexPos;
use super::words::TextType;

/// Read-only view of the hex grid.
pub trait GridQuery {
    /// Grid width (q extent).
    fn width(&self) -> i32;

    /// Grid height (r extent).
    fn height(&self) -> i32;

    /// Entities occupying `pos`, bottom layer first.
    fn entities_at(&self, pos: HexPos) -> &[EntityId];

    /// Look up an entity.
    fn entity(&self, id: EntityId) -> Option<&Entity>;

    /// Check if `pos` lies on the grid.
    fn in_bounds(&self, pos: HexPos) -> bool {
        pos.q >= 0 && pos.q < self.width() && pos.r >= 0 && pos.r < self.height()
    }

    /// Word entities at `pos`, bottom layer first.
    fn words_at(&self, pos: HexPos) -> SmallVec<[(EntityId, TextType); 4]> {
        self.entities_at(pos)
            .iter()
            .filter_map(|&id| self.entity(id).and_then(|e| e.word.map(|w| (id, w))))
            .collect()
    }
}

/// Entity-lifecycle hooks.
pub trait EntityStore: GridQuery {
    /// All live entity ids in ascending order.
    fn entity_ids(&self) -> Vec<EntityId>;

    /// Mutable access for grant reconciliation.
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity>;

    /// Create an entity at an in-bounds position, returning its new id.
    fn spawn(&mut self, spawn: EntitySpawn) -> EntityId;

    /// Remove an entity, returning it if it was live.
    fn despawn(&mut self, id: EntityId) -> Option<Entity>;
}
