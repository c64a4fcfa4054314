//! Entity identification and the per-entity data the engine reads.
//!
//! Entities are owned by the entity store (see [`crate::core::EntityStore`]).
//! The engine reads word tags, categories and positions, writes the
//! property/ability sets, and requests everything else (spawns, removals)
//! through the events it returns.
//!
//! ## Usage
//!
//! ```
//! use hex_rules::core::{EntitySpawn, HexPos, ObjectType, TextType};
//!
//! let wall = EntitySpawn::object(ObjectType::Wall, HexPos::new(1, 2));
//! assert_eq!(wall.category, ObjectType::Wall);
//! assert!(wall.word.is_none());
//!
//! let word = EntitySpawn::word(TextType::Stop, HexPos::new(3, 2));
//! assert_eq!(word.category, ObjectType::Text);
//! assert_eq!(word.word, Some(TextType::Stop));
//! ```

use serde::{Deserialize, Serialize};

use super::grants::{AbilitySet, PropertySet};
use super::hex::HexPos;
use super::words::{ObjectType, TextType};

/// Unique, stable identifier for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Overlay showing that one category is about to become another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformIndicator {
    pub subject: ObjectType,
    pub target: ObjectType,
}

/// A live entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: HexPos,

    /// Category the rule table is keyed by.
    pub category: ObjectType,

    /// Word tag. Set only on word entities.
    pub word: Option<TextType>,

    /// Set only on rule indicator overlays.
    pub indicator: Option<TransformIndicator>,

    /// Granted properties, reconciled by the rule applier.
    pub properties: PropertySet,

    /// Granted abilities, reconciled by the rule applier.
    pub abilities: AbilitySet,
}

impl Entity {
    /// Build an entity from a spawn request and its allocated id.
    #[must_use]
    pub fn from_spawn(id: EntityId, spawn: EntitySpawn) -> Self {
        Self {
            id,
            position: spawn.position,
            category: spawn.category,
            word: spawn.word,
            indicator: spawn.indicator,
            properties: spawn.properties,
            abilities: AbilitySet::empty(),
        }
    }

    /// Check if grants apply to this entity. Indicators are decoration only.
    #[must_use]
    pub fn is_grantable(&self) -> bool {
        self.indicator.is_none()
    }

    /// Check if this is a word entity.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.word.is_some()
    }
}

/// A request to create an entity. The store allocates its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpawn {
    pub position: HexPos,
    pub category: ObjectType,
    pub word: Option<TextType>,
    pub indicator: Option<TransformIndicator>,

    /// Carried over state. Replacement entities keep the tint of the
    /// entity they replace until the next reconcile.
    pub properties: PropertySet,
}

impl EntitySpawn {
    /// Spawn a plain object.
    #[must_use]
    pub fn object(category: ObjectType, position: HexPos) -> Self {
        Self {
            position,
            category,
            word: None,
            indicator: None,
            properties: PropertySet::empty(),
        }
    }

    /// Spawn a word entity.
    #[must_use]
    pub fn word(word: TextType, position: HexPos) -> Self {
        Self {
            position,
            category: ObjectType::Text,
            word: Some(word),
            indicator: None,
            properties: PropertySet::empty(),
        }
    }

    /// Spawn a rule indicator overlay.
    #[must_use]
    pub fn indicator(subject: ObjectType, target: ObjectType, position: HexPos) -> Self {
        Self {
            position,
            category: ObjectType::Indicator,
            word: None,
            indicator: Some(TransformIndicator { subject, target }),
            properties: PropertySet::empty(),
        }
    }

    /// Set carried-over properties (builder pattern).
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }
}
