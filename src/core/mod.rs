//! Core engine types: coordinates, words, grants, entities, configuration.
//!
//! These are the building blocks shared by the phrase search and the rule
//! table. Nothing here knows about sentences.

pub mod hex;
pub mod words;
pub mod grants;
pub mod entity;
pub mod grid;
pub mod world;
pub mod config;
pub mod error;

pub use hex::{HexDirection, HexPos};
pub use words::{ObjectType, Predicate, Relation, TextType};
pub use grants::{AbilitySet, PropertySet};
pub use entity::{Entity, EntityId, EntitySpawn, TransformIndicator};
pub use grid::{EntityStore, GridQuery};
pub use world::World;
pub use config::{CollateralRule, EngineConfig};
pub use error::{ConfigError, WorldError};
