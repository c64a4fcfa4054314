//! Discovered sentences.
//!
//! A [`Phrase`] is the ordered word path of one maximal sentence:
//! a subject block, one relation word, then a predicate block. Blocks may be
//! `AND`-joined. Each word remembers the entity and cell it was read from.
//!
//! ## Equality
//!
//! Two phrases are equal when they spell the same words in the same order,
//! wherever they sit on the grid. This is what suppresses duplicate
//! sentences: two paths with equal words grant exactly the same things.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, HexDirection, HexPos, ObjectType, Predicate, Relation, TextType};

/// Index of a phrase in a [`crate::phrases::SearchResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhraseId(pub u32);

impl PhraseId {
    /// Create a new phrase ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PhraseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phrase({})", self.0)
    }
}

/// Grammatical role of a word inside a phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordRole {
    Subject,
    Conjunction,
    Relation,
    Predicate,
}

/// One word of a phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseWord {
    pub word: TextType,
    pub position: HexPos,
    pub entity: EntityId,
    pub role: WordRole,
}

/// Word sequence of a phrase, used as the dedup key.
pub type PhraseText = SmallVec<[TextType; 8]>;

/// A discovered sentence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Phrase {
    words: SmallVec<[PhraseWord; 8]>,
}

impl Phrase {
    /// Shortest valid sentence: subject, relation, predicate.
    pub const MIN_WORDS: usize = 3;

    /// Wrap a word path.
    #[must_use]
    pub fn new(words: SmallVec<[PhraseWord; 8]>) -> Self {
        Self { words }
    }

    /// The words in reading order.
    #[must_use]
    pub fn words(&self) -> &[PhraseWord] {
        &self.words
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the phrase has no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of grid steps the path takes.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    /// The word sequence.
    #[must_use]
    pub fn text(&self) -> PhraseText {
        self.words.iter().map(|w| w.word).collect()
    }

    /// Cell of the first word.
    ///
    /// # Panics
    ///
    /// Panics on an empty phrase, which the search never produces.
    #[must_use]
    pub fn anchor(&self) -> HexPos {
        self.words[0].position
    }

    /// Direction of the first step.
    #[must_use]
    pub fn reading_direction(&self) -> Option<HexDirection> {
        match self.words.as_slice() {
            [first, second, ..] => first.position.direction_to(second.position),
            _ => None,
        }
    }

    /// The relation word of this phrase.
    #[must_use]
    pub fn relation(&self) -> Option<Relation> {
        self.words
            .iter()
            .find(|w| w.role == WordRole::Relation)
            .and_then(|w| w.word.as_relation())
    }

    /// Subject categories, in reading order.
    pub fn subjects(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.words
            .iter()
            .filter(|w| w.role == WordRole::Subject)
            .filter_map(|w| w.word.as_object())
    }

    /// Predicate words, in reading order.
    pub fn predicates(&self) -> impl Iterator<Item = &PhraseWord> + '_ {
        self.words.iter().filter(|w| w.role == WordRole::Predicate)
    }

    /// Every `(subject, predicate)` grant this phrase states.
    #[must_use]
    pub fn grants(&self) -> Vec<(ObjectType, Predicate)> {
        let Some(relation) = self.relation() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for subject in self.subjects() {
            for predicate in self.predicates() {
                if let Some(granted) = predicate.word.predicate(relation) {
                    out.push((subject, granted));
                }
            }
        }
        out
    }

    /// Check that consecutive words sit in adjacent cells.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.words
            .windows(2)
            .all(|pair| pair[0].position.is_adjacent(pair[1].position))
    }

    /// Entity ids in reading order.
    pub(crate) fn entity_path(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.words.iter().map(|w| w.entity)
    }
}

impl PartialEq for Phrase {
    fn eq(&self, other: &Self) -> bool {
        self.words.len() == other.words.len()
            && self.words.iter().zip(&other.words).all(|(a, b)| a.word == b.word)
    }
}

impl Eq for Phrase {}

impl Hash for Phrase {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.words.len().hash(hasher);
        for w in &self.words {
            w.word.hash(hasher);
        }
    }
}

impl PartialOrd for Phrase {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Phrase {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words
            .iter()
            .map(|w| w.word)
            .cmp(other.words.iter().map(|w| w.word))
    }
}

impl std::fmt::Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", w.word)?;
        }
        Ok(())
    }
}
