//! Rule applier.
//!
//! `RuleExecute` pushes the grant table onto the entities:
//!
//! 1. Reconcile: every grantable entity ends up with exactly the properties
//!    and abilities its category is granted. Terminal transform targets show
//!    up as the `GOAL` marker.
//! 2. Collateral: each cell is checked against the configured
//!    [`CollateralRule`]s in order.
//! 3. Transforms: entities of a category with non-terminal transform
//!    targets are replaced by one entity per target. `A IS A` pins the
//!    category and suppresses every replacement.
//!
//! Only step 1 writes to the store. Removals and replacements are returned
//! in [`ExecuteOutcome`] and applied by the caller, usually
//! [`crate::rules::RuleEngine`].

use std::collections::BTreeSet;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::table::RuleTable;
use crate::core::{
    AbilitySet, CollateralRule, EngineConfig, Entity, EntityId, EntitySpawn, EntityStore, HexPos, ObjectType,
    PropertySet, TextType,
};

/// Why an entity is being removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Melted by a hot entity.
    HeatDestroyed,

    /// Drowned by a sinking entity.
    SubmersionDestroyed,

    /// Used up while destroying something else.
    Collateral,
}

/// A removal request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub id: EntityId,
    pub reason: RemovalReason,
}

/// Replace `old` with one new entity per transform target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub old: EntityId,
    pub spawns: Vec<EntitySpawn>,
}

/// Counters for one applier update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteStats {
    /// Entities whose properties or abilities were rewritten.
    pub reconciled: usize,

    /// Occupied cells checked for collateral destruction.
    pub cells_scanned: usize,

    pub removals: usize,
    pub replacements: usize,
}

/// Everything one applier update reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteOutcome {
    pub removals: Vec<Removal>,
    pub replacements: Vec<Replacement>,

    /// Set when entities are to be removed or replaced.
    pub state_changed: bool,

    pub stats: ExecuteStats,

    /// Applier clock when the update ran.
    pub at: Duration,
}

impl ExecuteOutcome {
    /// Perform the removals and replacements on `store`.
    ///
    /// Returns the ids of spawned replacement entities. Entities that are
    /// already gone are skipped.
    pub fn apply_to<S: EntityStore + ?Sized>(&self, store: &mut S) -> Vec<EntityId> {
        for removal in &self.removals {
            store.despawn(removal.id);
        }

        let mut spawned = Vec::new();
        for replacement in &self.replacements {
            if store.despawn(replacement.old).is_none() {
                continue;
            }
            for spawn in &replacement.spawns {
                spawned.push(store.spawn(spawn.clone()));
            }
        }
        spawned
    }
}

/// Rule applier.
#[derive(Clone, Debug, Default)]
pub struct RuleExecute {
    clock: Duration,
    update_count: u64,
}

impl RuleExecute {
    /// Create an applier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of updates run so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Apply `table` to every entity in `store`.
    pub fn update<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        table: &RuleTable,
        config: &EngineConfig,
        elapsed: Duration,
    ) -> ExecuteOutcome {
        self.clock += elapsed;
        self.update_count += 1;

        let ids = store.entity_ids();
        let mut stats = ExecuteStats { reconciled: reconcile(store, table, &ids), ..ExecuteStats::default() };

        let cells: BTreeSet<HexPos> = ids.iter().filter_map(|&id| store.entity(id)).map(|e| e.position).collect();
        stats.cells_scanned = cells.len();

        let mut removed: FxHashSet<EntityId> = FxHashSet::default();
        let mut removals = Vec::new();
        for pos in cells {
            collateral_at(store, pos, &config.collateral, &mut removed, &mut removals);
        }

        let mut replacements = Vec::new();
        for &id in &ids {
            if removed.contains(&id) {
                continue;
            }
            let Some(entity) = store.entity(id).filter(|e| e.is_grantable()) else { continue };
            let targets = table.transforms_of(entity.category);
            if targets.contains(&entity.category) {
                continue;
            }

            let spawns: Vec<EntitySpawn> = targets
                .into_iter()
                .filter(|t| !t.is_terminal())
                .filter_map(|t| replacement(entity, t))
                .collect();
            if !spawns.is_empty() {
                trace!(entity = %id, from = ?entity.category, into = spawns.len(), "transform");
                replacements.push(Replacement { old: id, spawns });
            }
        }

        stats.removals = removals.len();
        stats.replacements = replacements.len();
        debug!(
            reconciled = stats.reconciled,
            removals = stats.removals,
            replacements = stats.replacements,
            "rules applied"
        );

        ExecuteOutcome {
            state_changed: !removals.is_empty() || !replacements.is_empty(),
            removals,
            replacements,
            stats,
            at: self.clock,
        }
    }
}

/// Set each grantable entity's grants to exactly its category's.
fn reconcile<S: EntityStore + ?Sized>(store: &mut S, table: &RuleTable, ids: &[EntityId]) -> usize {
    let mut rewritten = 0;
    for &id in ids {
        let Some(entity) = store.entity_mut(id) else { continue };
        if !entity.is_grantable() {
            continue;
        }

        let (properties, abilities) = table
            .grants(entity.category)
            .map_or((PropertySet::empty(), AbilitySet::empty()), |g| (g.effective_properties(), g.abilities));
        if entity.properties != properties || entity.abilities != abilities {
            entity.properties = properties;
            entity.abilities = abilities;
            rewritten += 1;
        }
    }
    rewritten
}

fn collateral_at<S: EntityStore + ?Sized>(
    store: &S,
    pos: HexPos,
    rules: &[CollateralRule],
    removed: &mut FxHashSet<EntityId>,
    removals: &mut Vec<Removal>,
) {
    let here: SmallVec<[&Entity; 4]> = store
        .entities_at(pos)
        .iter()
        .filter_map(|&id| store.entity(id))
        .filter(|e| e.is_grantable())
        .collect();
    if here.len() < 2 {
        return;
    }

    for rule in rules {
        let destroyers: SmallVec<[EntityId; 4]> = here
            .iter()
            .filter(|e| !removed.contains(&e.id) && e.properties.intersects(rule.destroyer))
            .map(|e| e.id)
            .collect();
        if destroyers.is_empty() {
            continue;
        }

        // A destroyer never destroys itself
        let victims: SmallVec<[EntityId; 4]> = here
            .iter()
            .filter(|e| !removed.contains(&e.id) && is_victim(rule, e))
            .filter(|e| destroyers.iter().any(|&d| d != e.id))
            .map(|e| e.id)
            .collect();
        if victims.is_empty() {
            continue;
        }

        for id in victims {
            trace!(entity = %id, cell = %pos, reason = ?rule.reason, "collateral removal");
            removed.insert(id);
            removals.push(Removal { id, reason: rule.reason });
        }
        if rule.consumes_destroyer {
            for id in destroyers {
                if removed.insert(id) {
                    removals.push(Removal { id, reason: RemovalReason::Collateral });
                }
            }
        }
    }
}

fn is_victim(rule: &CollateralRule, entity: &Entity) -> bool {
    let vulnerable = if rule.victim.is_empty() {
        !entity.is_word()
    } else {
        entity.properties.intersects(rule.victim)
    };
    vulnerable && !entity.abilities.intersects(rule.immune)
}

/// What `entity` turns into for `target`. Tint carries over.
fn replacement(entity: &Entity, target: ObjectType) -> Option<EntitySpawn> {
    let tint = entity.properties & PropertySet::COLORS;
    if target == ObjectType::Text {
        TextType::noun(entity.category).map(|word| EntitySpawn::word(word, entity.position).with_properties(tint))
    } else {
        Some(EntitySpawn::object(target, entity.position).with_properties(tint))
    }
}
