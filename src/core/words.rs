//! Word tags and object categories.
//!
//! Every word entity carries one [`TextType`]. A word can play several
//! grammatical roles: color words are nouns when they start a sentence
//! (`BLUE IS GOAL`) and properties when they finish one (`I AM BLUE`).
//!
//! ## Word Classes
//!
//! - Nouns: `I`, `WALL`, `WATER`, `ROCK`, `LAVA`, `GOAL`, `TEXT`, colors
//! - Relations: `IS`, `AM`, `CAN`
//! - Conjunction: `AND`
//! - Properties: `STOP`, `PUSH`, `PULL`, `HOT`, `MELT`, `SINK`, colors
//! - Abilities: `CLIMB`, `JUMP`, `SWIM`, `FLOAT`

use serde::{Deserialize, Serialize};

use super::grants::{AbilitySet, PropertySet};

/// Object category of an entity.
///
/// Grants in the rule table are keyed by category. Word entities are all
/// of category [`ObjectType::Text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    I,
    Wall,
    Water,
    Rock,
    Lava,
    Goal,
    Text,
    Blue,
    Green,
    Grey,
    Yellow,
    Red,
    Purple,
    /// Rule indicator overlay. Has no word, so it never receives grants.
    Indicator,
}

impl ObjectType {
    /// Terminal categories are associations, not replacement targets.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, ObjectType::Goal)
    }
}

/// Sentence relation words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    Is,
    Am,
    Can,
}

impl Relation {
    /// Check whether this relation accepts the given subject.
    ///
    /// `AM` only follows `I`; the other relations accept any noun.
    #[must_use]
    pub fn accepts_subject(self, subject: ObjectType) -> bool {
        match self {
            Relation::Am => subject == ObjectType::I,
            Relation::Is | Relation::Can => true,
        }
    }

    /// Check whether this relation accepts the given predicate word.
    #[must_use]
    pub fn accepts_predicate(self, word: TextType) -> bool {
        match self {
            Relation::Is | Relation::Am => word.as_property().is_some() || word.as_object().is_some(),
            Relation::Can => word.as_ability().is_some(),
        }
    }
}

/// What a predicate word grants once bound to a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    Property(PropertySet),
    Ability(AbilitySet),
    Transform(ObjectType),
}

/// Word tag on a word entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextType {
    // === Nouns ===
    I,
    Wall,
    Water,
    Rock,
    Lava,
    Goal,
    Text,

    // === Grammar ===
    Is,
    Am,
    Can,
    And,

    // === Properties ===
    Stop,
    Push,
    Pull,
    Hot,
    Melt,
    Sink,

    // === Colors (noun and property) ===
    Blue,
    Green,
    Grey,
    Yellow,
    Red,
    Purple,

    // === Abilities ===
    Climb,
    Jump,
    Swim,
    Float,
}

impl TextType {
    /// Noun reading of this word, if it has one.
    #[must_use]
    pub const fn as_object(self) -> Option<ObjectType> {
        Some(match self {
            TextType::I => ObjectType::I,
            TextType::Wall => ObjectType::Wall,
            TextType::Water => ObjectType::Water,
            TextType::Rock => ObjectType::Rock,
            TextType::Lava => ObjectType::Lava,
            TextType::Goal => ObjectType::Goal,
            TextType::Text => ObjectType::Text,
            TextType::Blue => ObjectType::Blue,
            TextType::Green => ObjectType::Green,
            TextType::Grey => ObjectType::Grey,
            TextType::Yellow => ObjectType::Yellow,
            TextType::Red => ObjectType::Red,
            TextType::Purple => ObjectType::Purple,
            _ => return None,
        })
    }

    /// The noun word naming `category`. Indicators have no word.
    #[must_use]
    pub const fn noun(category: ObjectType) -> Option<TextType> {
        Some(match category {
            ObjectType::I => TextType::I,
            ObjectType::Wall => TextType::Wall,
            ObjectType::Water => TextType::Water,
            ObjectType::Rock => TextType::Rock,
            ObjectType::Lava => TextType::Lava,
            ObjectType::Goal => TextType::Goal,
            ObjectType::Text => TextType::Text,
            ObjectType::Blue => TextType::Blue,
            ObjectType::Green => TextType::Green,
            ObjectType::Grey => TextType::Grey,
            ObjectType::Yellow => TextType::Yellow,
            ObjectType::Red => TextType::Red,
            ObjectType::Purple => TextType::Purple,
            ObjectType::Indicator => return None,
        })
    }

    /// Property reading of this word, if it has one.
    #[must_use]
    pub const fn as_property(self) -> Option<PropertySet> {
        Some(match self {
            TextType::Stop => PropertySet::STOP,
            TextType::Push => PropertySet::PUSH,
            TextType::Pull => PropertySet::PULL,
            TextType::Hot => PropertySet::HOT,
            TextType::Melt => PropertySet::MELT,
            TextType::Sink => PropertySet::SINK,
            TextType::Blue => PropertySet::BLUE,
            TextType::Green => PropertySet::GREEN,
            TextType::Grey => PropertySet::GREY,
            TextType::Yellow => PropertySet::YELLOW,
            TextType::Red => PropertySet::RED,
            TextType::Purple => PropertySet::PURPLE,
            _ => return None,
        })
    }

    /// Ability reading of this word, if it has one.
    #[must_use]
    pub const fn as_ability(self) -> Option<AbilitySet> {
        Some(match self {
            TextType::Climb => AbilitySet::CLIMB,
            TextType::Jump => AbilitySet::JUMP,
            TextType::Swim => AbilitySet::SWIM,
            TextType::Float => AbilitySet::FLOAT,
            _ => return None,
        })
    }

    /// Relation reading of this word, if it has one.
    #[must_use]
    pub const fn as_relation(self) -> Option<Relation> {
        match self {
            TextType::Is => Some(Relation::Is),
            TextType::Am => Some(Relation::Am),
            TextType::Can => Some(Relation::Can),
            _ => None,
        }
    }

    /// Check if this is the conjunction `AND`.
    #[must_use]
    pub const fn is_and(self) -> bool {
        matches!(self, TextType::And)
    }

    /// Check if a sentence can start with this word.
    #[must_use]
    pub const fn is_subject(self) -> bool {
        self.as_object().is_some()
    }

    /// What this word grants as the predicate of `relation`.
    ///
    /// A word with a property reading is always a property grant, so
    /// `I AM BLUE` tints rather than transforms.
    #[must_use]
    pub fn predicate(self, relation: Relation) -> Option<Predicate> {
        match relation {
            Relation::Is | Relation::Am => self
                .as_property()
                .map(Predicate::Property)
                .or_else(|| self.as_object().map(Predicate::Transform)),
            Relation::Can => self.as_ability().map(Predicate::Ability),
        }
    }
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = format!("{:?}", self);
        write!(f, "{}", name.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_classes() {
        assert!(TextType::Wall.is_subject());
        assert!(TextType::Blue.is_subject());
        assert!(!TextType::Stop.is_subject());
        assert!(!TextType::Is.is_subject());
        assert!(TextType::Goal.is_subject());

        assert_eq!(TextType::Is.as_relation(), Some(Relation::Is));
        assert_eq!(TextType::And.as_relation(), None);
        assert!(TextType::And.is_and());
    }

    #[test]
    fn test_colors_are_nouns_and_properties() {
        assert_eq!(TextType::Green.as_object(), Some(ObjectType::Green));
        assert_eq!(TextType::Green.as_property(), Some(PropertySet::GREEN));
        assert_eq!(TextType::Wall.as_property(), None);
    }

    #[test]
    fn test_predicate_readings() {
        assert_eq!(
            TextType::Stop.predicate(Relation::Is),
            Some(Predicate::Property(PropertySet::STOP))
        );
        assert_eq!(
            TextType::Goal.predicate(Relation::Is),
            Some(Predicate::Transform(ObjectType::Goal))
        );
        // Colors prefer the property reading
        assert_eq!(
            TextType::Red.predicate(Relation::Am),
            Some(Predicate::Property(PropertySet::RED))
        );
        assert_eq!(
            TextType::Climb.predicate(Relation::Can),
            Some(Predicate::Ability(AbilitySet::CLIMB))
        );
        assert_eq!(TextType::Climb.predicate(Relation::Is), None);
        assert_eq!(TextType::Stop.predicate(Relation::Can), None);
    }

    #[test]
    fn test_am_requires_i() {
        assert!(Relation::Am.accepts_subject(ObjectType::I));
        assert!(!Relation::Am.accepts_subject(ObjectType::Purple));
        assert!(Relation::Is.accepts_subject(ObjectType::Wall));
        assert!(Relation::Can.accepts_subject(ObjectType::I));
    }

    #[test]
    fn test_accepts_predicate() {
        assert!(Relation::Is.accepts_predicate(TextType::Rock));
        assert!(Relation::Is.accepts_predicate(TextType::Hot));
        assert!(!Relation::Is.accepts_predicate(TextType::And));
        assert!(Relation::Can.accepts_predicate(TextType::Swim));
        assert!(!Relation::Can.accepts_predicate(TextType::Wall));
    }

    #[test]
    fn test_noun_inverts_as_object() {
        assert_eq!(TextType::noun(ObjectType::Rock), Some(TextType::Rock));
        assert_eq!(TextType::noun(ObjectType::Purple).and_then(TextType::as_object), Some(ObjectType::Purple));
        assert_eq!(TextType::noun(ObjectType::Indicator), None);
    }

    #[test]
    fn test_terminal() {
        assert!(ObjectType::Goal.is_terminal());
        assert!(!ObjectType::Rock.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TextType::Purple), "PURPLE");
        assert_eq!(format!("{}", TextType::I), "I");
    }
}
