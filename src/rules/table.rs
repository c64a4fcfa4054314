//! The grant table and its diff.
//!
//! A [`RuleTable`] maps each object category to what it is currently
//! granted: properties (`IS STOP`), abilities (`CAN CLIMB`) and transform
//! targets (`IS ROCK`). Tables are rebuilt wholesale from the phrase set and
//! never edited in place; the previous table only lives long enough to be
//! diffed against the new one.
//!
//! The map is an `im::OrdMap`, so keeping the previous table around is an
//! O(1) clone and iteration order is stable.

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};

use crate::core::{AbilitySet, ObjectType, Predicate, PropertySet};
use crate::phrases::Phrase;

/// Everything granted to one category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    pub properties: PropertySet,
    pub abilities: AbilitySet,
    pub transforms: OrdSet<ObjectType>,
}

impl Grants {
    /// Check if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.abilities.is_empty() && self.transforms.is_empty()
    }

    /// Properties an entity of this category should carry, including the
    /// goal marker for terminal transform targets.
    #[must_use]
    pub fn effective_properties(&self) -> PropertySet {
        if self.transforms.iter().any(|t| t.is_terminal()) {
            self.properties | PropertySet::GOAL
        } else {
            self.properties
        }
    }

    /// Grants in `self` that are missing from `other`.
    #[must_use]
    pub fn minus(&self, other: &Grants) -> Grants {
        Grants {
            properties: self.properties - other.properties,
            abilities: self.abilities - other.abilities,
            transforms: self
                .transforms
                .iter()
                .filter(|&t| !other.transforms.contains(t))
                .copied()
                .collect(),
        }
    }

    fn insert(&mut self, predicate: Predicate) {
        match predicate {
            Predicate::Property(p) => self.properties |= p,
            Predicate::Ability(a) => self.abilities |= a,
            Predicate::Transform(t) => {
                self.transforms.insert(t);
            }
        }
    }
}

/// Grant changes for one category between two tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantChange {
    pub category: ObjectType,

    /// `new \ old`
    pub added: Grants,

    /// `old \ new`
    pub removed: Grants,
}

impl GrantChange {
    /// Check if the transform targets changed.
    #[must_use]
    pub fn transforms_changed(&self) -> bool {
        !self.added.transforms.is_empty() || !self.removed.transforms.is_empty()
    }

    /// Check if a goal association was gained or lost.
    #[must_use]
    pub fn touches_terminal(&self) -> bool {
        self.added
            .transforms
            .iter()
            .chain(self.removed.transforms.iter())
            .any(|t| t.is_terminal())
    }
}

impl FromIterator<(ObjectType, Predicate)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (ObjectType, Predicate)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (subject, predicate) in iter {
            table.grants.entry(subject).or_insert_with(Grants::default).insert(predicate);
        }
        table
    }
}

/// Category -> grants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    grants: OrdMap<ObjectType, Grants>,
}

impl RuleTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table stated by a phrase set.
    #[must_use]
    pub fn from_phrases(phrases: &[Phrase]) -> Self {
        phrases.iter().flat_map(Phrase::grants).collect()
    }

    /// Number of categories with at least one grant.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Check if nothing is granted to anyone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grants for a category, if any.
    #[must_use]
    pub fn grants(&self, category: ObjectType) -> Option<&Grants> {
        self.grants.get(&category)
    }

    /// Iterate over `(category, grants)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectType, &Grants)> {
        self.grants.iter()
    }

    /// Properties granted to a category.
    #[must_use]
    pub fn properties_of(&self, category: ObjectType) -> PropertySet {
        self.grants(category).map_or(PropertySet::empty(), |g| g.properties)
    }

    /// Abilities granted to a category.
    #[must_use]
    pub fn abilities_of(&self, category: ObjectType) -> AbilitySet {
        self.grants(category).map_or(AbilitySet::empty(), |g| g.abilities)
    }

    /// Transform targets granted to a category, in category order.
    #[must_use]
    pub fn transforms_of(&self, category: ObjectType) -> Vec<ObjectType> {
        self.grants(category)
            .map(|g| g.transforms.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Check if a category has every property in `property`.
    #[must_use]
    pub fn has_property(&self, category: ObjectType, property: PropertySet) -> bool {
        self.properties_of(category).contains(property)
    }

    /// Categories granted any property in `property`.
    #[must_use]
    pub fn categories_with(&self, property: PropertySet) -> Vec<ObjectType> {
        self.grants
            .iter()
            .filter(|(_, g)| g.properties.intersects(property))
            .map(|(&c, _)| c)
            .collect()
    }

    /// Per-category changes from `self` (old) to `new`.
    ///
    /// Categories without any change are omitted.
    #[must_use]
    pub fn diff(&self, new: &RuleTable) -> Vec<GrantChange> {
        let empty = Grants::default();
        let categories: OrdSet<ObjectType> = self.grants.keys().chain(new.grants.keys()).copied().collect();

        categories
            .into_iter()
            .filter_map(|category| {
                let old = self.grants(category).unwrap_or(&empty);
                let current = new.grants(category).unwrap_or(&empty);
                let change = GrantChange {
                    category,
                    added: current.minus(old),
                    removed: old.minus(current),
                };
                (!change.added.is_empty() || !change.removed.is_empty()).then_some(change)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(ObjectType, Predicate)]) -> RuleTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_queries() {
        let t = table(&[
            (ObjectType::Wall, Predicate::Property(PropertySet::STOP)),
            (ObjectType::Lava, Predicate::Property(PropertySet::HOT)),
            (ObjectType::I, Predicate::Ability(AbilitySet::CLIMB)),
            (ObjectType::Rock, Predicate::Transform(ObjectType::Wall)),
        ]);

        assert_eq!(t.len(), 4);
        assert!(t.has_property(ObjectType::Wall, PropertySet::STOP));
        assert!(!t.has_property(ObjectType::Rock, PropertySet::STOP));
        assert_eq!(t.abilities_of(ObjectType::I), AbilitySet::CLIMB);
        assert_eq!(t.transforms_of(ObjectType::Rock), vec![ObjectType::Wall]);
        assert!(t.transforms_of(ObjectType::Wall).is_empty());
        assert_eq!(t.categories_with(PropertySet::HOT | PropertySet::STOP), vec![ObjectType::Wall, ObjectType::Lava]);
    }

    #[test]
    fn test_effective_properties_goal_marker() {
        let t = table(&[
            (ObjectType::Blue, Predicate::Transform(ObjectType::Goal)),
            (ObjectType::Blue, Predicate::Property(PropertySet::PUSH)),
        ]);
        let blue = t.grants(ObjectType::Blue).unwrap();
        assert_eq!(blue.effective_properties(), PropertySet::PUSH | PropertySet::GOAL);
        assert_eq!(t.properties_of(ObjectType::Blue), PropertySet::PUSH);
    }

    #[test]
    fn test_diff_added_and_removed() {
        let old = table(&[
            (ObjectType::Wall, Predicate::Property(PropertySet::STOP)),
            (ObjectType::Rock, Predicate::Property(PropertySet::PUSH)),
        ]);
        let new = table(&[
            (ObjectType::Wall, Predicate::Property(PropertySet::STOP)),
            (ObjectType::Wall, Predicate::Property(PropertySet::HOT)),
            (ObjectType::Water, Predicate::Transform(ObjectType::Rock)),
        ]);

        let changes = old.diff(&new);
        assert_eq!(changes.len(), 3);

        let wall = &changes[0];
        assert_eq!(wall.category, ObjectType::Wall);
        assert_eq!(wall.added.properties, PropertySet::HOT);
        assert!(wall.removed.is_empty());

        let water = &changes[1];
        assert_eq!(water.category, ObjectType::Water);
        assert!(water.transforms_changed());
        assert!(!water.touches_terminal());

        let rock = &changes[2];
        assert_eq!(rock.category, ObjectType::Rock);
        assert_eq!(rock.removed.properties, PropertySet::PUSH);
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let t = table(&[(ObjectType::Wall, Predicate::Property(PropertySet::STOP))]);
        assert!(t.diff(&t.clone()).is_empty());
    }

    #[test]
    fn test_touches_terminal() {
        let old = RuleTable::new();
        let new = table(&[(ObjectType::Blue, Predicate::Transform(ObjectType::Goal))]);
        let changes = old.diff(&new);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].touches_terminal());
    }

    #[test]
    fn test_serialization() {
        let t = table(&[(ObjectType::Rock, Predicate::Transform(ObjectType::Lava))]);
        let json = serde_json::to_string(&t).unwrap();
        let deserialized: RuleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(t, deserialized);
    }
}
