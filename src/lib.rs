//! # hex-rules
//!
//! Rule grammar engine for a hex-grid word puzzle. Word tiles on the grid
//! spell sentences like `WALL IS STOP`; the engine finds them, turns them
//! into grants on object categories, and applies those grants to entities.
//!
//! ## Design Principles
//!
//! 1. **Closed Vocabulary**: Words, categories, properties and abilities are
//!    enums and bitsets, not a runtime registry.
//!
//! 2. **Events Out, Not Callbacks In**: Every update returns a result struct
//!    (`RuleEvents`, `ExecuteOutcome`, `TickReport`). The engine never calls
//!    back into the host.
//!
//! 3. **Configuration Over Globals**: `EngineConfig` is passed explicitly to
//!    every search and update.
//!
//! ## Architecture
//!
//! - **Pure Search**: `phrases::search` reads the grid and nothing else.
//!   Calling it twice on the same grid gives the same answer.
//!
//! - **Wholesale Tables**: The grant table is rebuilt on every recompute and
//!   diffed against the previous one, never patched in place.
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` for the grant
//!   table and the reference `World`, which doubles as an undo snapshot.
//!
//! - **Bounded Settling**: Transforms and collateral removals can change the
//!   words on the grid. The engine re-derives rules in a loop with a hard
//!   iteration cap.
//!
//! ## Modules
//!
//! - `core`: Hex coordinates, vocabulary, entities, grid traits, `World`, configuration
//! - `phrases`: Phrase search and direction metadata
//! - `rules`: Grant table, builder, applier and settle loop

pub mod core;
pub mod phrases;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    HexDirection, HexPos,
    ObjectType, Relation, TextType, Predicate,
    PropertySet, AbilitySet,
    Entity, EntityId, EntitySpawn, TransformIndicator,
    GridQuery, EntityStore, World,
    CollateralRule, EngineConfig,
    ConfigError, WorldError,
};

pub use crate::phrases::{
    search, SearchResult,
    Phrase, PhraseId, PhraseWord, WordRole,
    DirectionGrid, DirectionMark, PhraseRole,
};

pub use crate::rules::{
    RuleTable, Grants, GrantChange,
    RuleSearch, RuleEvents,
    RuleExecute, ExecuteOutcome, ExecuteStats, Removal, RemovalReason, Replacement,
    RuleEngine, TickReport,
};
