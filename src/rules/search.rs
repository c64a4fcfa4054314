//! Rule table builder.
//!
//! `RuleSearch` turns the words on the grid into a [`RuleTable`] and reports
//! what changed since the previous recompute. It only recomputes after
//! [`RuleSearch::signal_state_change`]; a clean builder returns empty events.
//!
//! The builder never mutates the store. Indicator spawns and despawns are
//! returned in [`RuleEvents`] for the caller to apply. An indicator sits on
//! the predicate word of its transform and is moved there again on every
//! recompute while the transform holds.

use std::collections::BTreeSet;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::table::{GrantChange, RuleTable};
use crate::core::{EngineConfig, EntityId, EntitySpawn, EntityStore, HexPos, ObjectType, Predicate, TransformIndicator};
use crate::phrases::{search, PhraseText, SearchResult};

/// Everything one builder update reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvents {
    /// Did this update run a recompute?
    pub recomputed: bool,

    /// Rule indicators to spawn.
    pub added_entities: Vec<EntitySpawn>,

    /// Rule indicators to despawn.
    pub removed_entities: Vec<EntityId>,

    /// Entities whose category grants changed, ascending.
    pub updated: Vec<EntityId>,

    /// Set once when goal-relevant grants changed, with the affected entities.
    pub goal_changed: Option<Vec<EntityId>>,

    /// Set once when I-relevant grants changed, with the affected entities.
    pub i_changed: Option<Vec<EntityId>>,

    /// Anchor of the first phrase that did not exist at the previous recompute.
    pub new_phrase_at: Option<HexPos>,

    /// Per-category grant diff.
    pub changes: Vec<GrantChange>,

    /// Builder clock when the update ran.
    pub at: Duration,
}

impl RuleEvents {
    /// Check if the update reported nothing.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.changes.is_empty()
            && self.added_entities.is_empty()
            && self.removed_entities.is_empty()
            && self.new_phrase_at.is_none()
    }
}

/// Rule table builder.
#[derive(Clone, Debug)]
pub struct RuleSearch {
    dirty: bool,
    table: RuleTable,
    last: SearchResult,

    /// Word sequences found by the previous recompute.
    known: FxHashSet<PhraseText>,

    recompute_count: u64,
    clock: Duration,
}

impl Default for RuleSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSearch {
    /// Create a builder. It starts dirty so the first update reads the grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirty: true,
            table: RuleTable::new(),
            last: SearchResult::default(),
            known: FxHashSet::default(),
            recompute_count: 0,
            clock: Duration::ZERO,
        }
    }

    /// Mark the grid as changed. The next update recomputes.
    pub fn signal_state_change(&mut self) {
        self.dirty = true;
    }

    /// Check if a recompute is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The current grant table.
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Phrases and directions from the latest recompute.
    #[must_use]
    pub fn last_search(&self) -> &SearchResult {
        &self.last
    }

    /// Number of recomputes run so far.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Recompute if dirty and report the differences.
    ///
    /// # Panics
    ///
    /// Panics if the phrase search breaks its own invariants.
    pub fn update<S: EntityStore + ?Sized>(&mut self, store: &S, config: &EngineConfig, elapsed: Duration) -> RuleEvents {
        self.clock += elapsed;
        if !self.dirty {
            return RuleEvents { at: self.clock, ..RuleEvents::default() };
        }

        let result = search(store, config);
        result.assert_consistent();

        let table = RuleTable::from_phrases(&result.phrases);
        let changes = self.table.diff(&table);

        let mut events = RuleEvents { recomputed: true, at: self.clock, ..RuleEvents::default() };
        events.new_phrase_at = result
            .phrases
            .iter()
            .find(|p| !self.known.contains(&p.text()))
            .map(|p| p.anchor());

        self.collect_indicators(store, &result, &changes, &mut events);
        if !changes.is_empty() {
            self.collect_affected(store, config, &changes, &mut events);
        }

        debug!(
            recompute = self.recompute_count,
            phrases = result.len(),
            categories = table.len(),
            changed = changes.len(),
            "rules recomputed"
        );
        for change in &changes {
            trace!(category = ?change.category, added = ?change.added, removed = ?change.removed, "grant change");
        }

        events.changes = changes;
        self.known = result.phrases.iter().map(|p| p.text()).collect();
        self.table = table;
        self.last = result;
        self.dirty = false;
        self.recompute_count += 1;
        events
    }

    fn collect_indicators<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        result: &SearchResult,
        changes: &[GrantChange],
        events: &mut RuleEvents,
    ) {
        let sites = transform_sites(result);

        let mut gone: FxHashSet<TransformIndicator> = FxHashSet::default();
        for change in changes.iter().filter(|c| c.transforms_changed()) {
            for &target in &change.removed.transforms {
                gone.insert(TransformIndicator { subject: change.category, target });
            }
            for &target in &change.added.transforms {
                if let Some(&pos) = sites.get(&(change.category, target)) {
                    events.added_entities.push(EntitySpawn::indicator(change.category, target, pos));
                }
            }
        }

        // Indicators of transforms that still hold follow their predicate word
        let mut moved: FxHashSet<TransformIndicator> = FxHashSet::default();
        for id in store.entity_ids() {
            let Some(entity) = store.entity(id) else { continue };
            let Some(indicator) = entity.indicator else { continue };
            if gone.contains(&indicator) {
                events.removed_entities.push(id);
                continue;
            }
            match sites.get(&(indicator.subject, indicator.target)) {
                Some(&pos) if pos != entity.position => {
                    events.removed_entities.push(id);
                    if moved.insert(indicator) {
                        events.added_entities.push(EntitySpawn::indicator(indicator.subject, indicator.target, pos));
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_affected<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        config: &EngineConfig,
        changes: &[GrantChange],
        events: &mut RuleEvents,
    ) {
        let changed: FxHashSet<ObjectType> = changes.iter().map(|c| c.category).collect();

        let goal: FxHashSet<ObjectType> = changes
            .iter()
            .filter(|c| c.category == config.goal_category || c.touches_terminal())
            .map(|c| c.category)
            .chain(std::iter::once(config.goal_category))
            .collect();

        let player_relevant = |c: &GrantChange| {
            c.category == config.player_category
                || c.added.transforms.contains(&config.player_category)
                || c.removed.transforms.contains(&config.player_category)
        };
        let player: FxHashSet<ObjectType> = changes
            .iter()
            .filter(|c| player_relevant(c))
            .map(|c| c.category)
            .chain(std::iter::once(config.player_category))
            .collect();

        let goal_fired = changes.iter().any(|c| c.category == config.goal_category || c.touches_terminal());
        let player_fired = changes.iter().any(player_relevant);

        let mut updated = BTreeSet::new();
        let mut goal_ids = Vec::new();
        let mut player_ids = Vec::new();
        for id in store.entity_ids() {
            let Some(entity) = store.entity(id) else { continue };
            if !entity.is_grantable() {
                continue;
            }
            if changed.contains(&entity.category) {
                updated.insert(id);
            }
            if goal_fired && goal.contains(&entity.category) {
                goal_ids.push(id);
            }
            if player_fired && player.contains(&entity.category) {
                player_ids.push(id);
            }
        }

        events.updated = updated.into_iter().collect();
        if goal_fired {
            goal_ids.sort_unstable();
            events.goal_changed = Some(goal_ids);
        }
        if player_fired {
            player_ids.sort_unstable();
            events.i_changed = Some(player_ids);
        }
    }
}

/// Cell of the predicate word stating each `(subject, target)` transform.
fn transform_sites(result: &SearchResult) -> FxHashMap<(ObjectType, ObjectType), HexPos> {
    let mut sites = FxHashMap::default();
    for phrase in &result.phrases {
        let Some(relation) = phrase.relation() else { continue };
        for predicate in phrase.predicates() {
            let Some(Predicate::Transform(target)) = predicate.word.predicate(relation) else { continue };
            for subject in phrase.subjects() {
                sites.entry((subject, target)).or_insert(predicate.position);
            }
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GridQuery, PropertySet, TextType, World};

    fn sentence(world: &mut World, words: [TextType; 3], row: i32) {
        for (q, word) in words.into_iter().enumerate() {
            world.place_word(word, HexPos::new(q as i32, row)).unwrap();
        }
    }

    fn apply(world: &mut World, events: &RuleEvents) {
        for &id in &events.removed_entities {
            world.remove(id).unwrap();
        }
        for spawn in &events.added_entities {
            world.place(spawn.clone()).unwrap();
        }
    }

    #[test]
    fn test_clean_builder_is_quiet() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::Wall, TextType::Is, TextType::Stop], 0);
        let config = EngineConfig::default();

        let mut builder = RuleSearch::new();
        assert!(builder.is_dirty());
        let first = builder.update(&world, &config, Duration::from_millis(16));
        assert!(first.recomputed);
        assert!(!builder.is_dirty());

        let second = builder.update(&world, &config, Duration::from_millis(16));
        assert!(!second.recomputed);
        assert!(second.is_quiet());
        assert_eq!(second.at, Duration::from_millis(32));
        assert_eq!(builder.recompute_count(), 1);
    }

    #[test]
    fn test_wall_is_stop() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::Wall, TextType::Is, TextType::Stop], 0);
        let wall = world.place_object(ObjectType::Wall, HexPos::new(0, 1)).unwrap();
        let rock = world.place_object(ObjectType::Rock, HexPos::new(1, 1)).unwrap();

        let mut builder = RuleSearch::new();
        let events = builder.update(&world, &EngineConfig::default(), Duration::ZERO);

        assert!(builder.table().has_property(ObjectType::Wall, PropertySet::STOP));
        assert_eq!(events.updated, vec![wall]);
        assert!(!events.updated.contains(&rock));
        assert_eq!(events.new_phrase_at, Some(HexPos::new(0, 0)));
        assert_eq!(events.goal_changed, None);
        assert_eq!(events.i_changed, None);
    }

    #[test]
    fn test_new_phrase_reported_once() {
        let mut world = World::new(4, 3);
        sentence(&mut world, [TextType::Wall, TextType::Is, TextType::Stop], 0);
        let config = EngineConfig::default();
        let mut builder = RuleSearch::new();
        builder.update(&world, &config, Duration::ZERO);

        builder.signal_state_change();
        let again = builder.update(&world, &config, Duration::ZERO);
        assert!(again.recomputed);
        assert_eq!(again.new_phrase_at, None);
        assert!(again.changes.is_empty());

        sentence(&mut world, [TextType::Rock, TextType::Is, TextType::Push], 2);
        builder.signal_state_change();
        let added = builder.update(&world, &config, Duration::ZERO);
        assert_eq!(added.new_phrase_at, Some(HexPos::new(0, 2)));
    }

    #[test]
    fn test_transform_spawns_and_despawns_indicator() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::Rock, TextType::Is, TextType::Lava], 0);
        let config = EngineConfig::default();
        let mut builder = RuleSearch::new();

        let events = builder.update(&world, &config, Duration::ZERO);
        assert_eq!(events.added_entities, vec![EntitySpawn::indicator(ObjectType::Rock, ObjectType::Lava, HexPos::new(2, 0))]);
        apply(&mut world, &events);
        let indicator = world.entities_of(ObjectType::Indicator);
        assert_eq!(indicator.len(), 1);

        // Break the sentence
        let is = world.words_at(HexPos::new(1, 0))[0].0;
        world.remove(is).unwrap();
        builder.signal_state_change();

        let events = builder.update(&world, &config, Duration::ZERO);
        assert_eq!(events.removed_entities, indicator);
        assert!(events.added_entities.is_empty());
        assert_eq!(events.changes.len(), 1);
        assert_eq!(events.changes[0].category, ObjectType::Rock);
        assert_eq!(events.changes[0].removed.transforms.len(), 1);
    }

    #[test]
    fn test_indicator_follows_moved_sentence() {
        let mut world = World::new(4, 3);
        sentence(&mut world, [TextType::Rock, TextType::Is, TextType::Lava], 0);
        let config = EngineConfig::default();
        let mut builder = RuleSearch::new();

        let events = builder.update(&world, &config, Duration::ZERO);
        apply(&mut world, &events);
        let old = world.entities_of(ObjectType::Indicator);

        // Slide the whole sentence two rows down
        for q in 0..3 {
            let (id, _) = world.words_at(HexPos::new(q, 0))[0];
            world.move_entity(id, HexPos::new(q, 2)).unwrap();
        }
        builder.signal_state_change();

        let events = builder.update(&world, &config, Duration::ZERO);
        assert!(events.changes.is_empty());
        assert_eq!(events.removed_entities, old);
        assert_eq!(events.added_entities, vec![EntitySpawn::indicator(ObjectType::Rock, ObjectType::Lava, HexPos::new(2, 2))]);

        apply(&mut world, &events);
        builder.signal_state_change();
        let settled = builder.update(&world, &config, Duration::ZERO);
        assert!(settled.is_quiet());
    }

    #[test]
    fn test_goal_association_reports_goal_changed() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::Blue, TextType::Is, TextType::Goal], 0);
        let blue = world.place_object(ObjectType::Blue, HexPos::new(0, 1)).unwrap();
        let goal = world.place_object(ObjectType::Goal, HexPos::new(1, 1)).unwrap();

        let mut builder = RuleSearch::new();
        let events = builder.update(&world, &EngineConfig::default(), Duration::ZERO);

        assert_eq!(builder.table().transforms_of(ObjectType::Blue), vec![ObjectType::Goal]);
        assert_eq!(events.goal_changed, Some(vec![blue, goal]));
        assert_eq!(events.updated, vec![blue]);
    }

    #[test]
    fn test_player_change_reports_i_changed() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::I, TextType::Am, TextType::Red], 0);
        let me = world.place_object(ObjectType::I, HexPos::new(3, 1)).unwrap();

        let mut builder = RuleSearch::new();
        let events = builder.update(&world, &EngineConfig::default(), Duration::ZERO);

        assert_eq!(events.i_changed, Some(vec![me]));
        assert_eq!(builder.table().properties_of(ObjectType::I), PropertySet::RED);
    }

    #[test]
    fn test_phrase_text_survives_in_last_search() {
        let mut world = World::new(4, 2);
        sentence(&mut world, [TextType::Wall, TextType::Is, TextType::Stop], 1);
        let mut builder = RuleSearch::new();
        builder.update(&world, &EngineConfig::default(), Duration::ZERO);

        assert!(builder.last_search().contains_text(&[TextType::Wall, TextType::Is, TextType::Stop]));
        assert_eq!(builder.last_search().directions.len(), 3);
    }
}
