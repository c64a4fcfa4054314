//! Phrase search: grid in, sentences out.
//!
//! ## Algorithm
//!
//! Every noun word is a candidate sentence start. From each start the
//! search walks each of the six directions independently, driven by an
//! explicit stack of [`Walk`] states instead of recursion:
//!
//! 1. `Subject`: after a subject, the next cell must hold a relation that
//!    accepts every subject so far, or an `AND` (subject chaining).
//! 2. `SubjectAfterAnd`: the next cell must hold another noun.
//! 3. `Predicate`: the next cell must hold a word the relation accepts.
//! 4. `Extend`: after a predicate, an `AND` followed by another accepted
//!    predicate extends the phrase. The `AND` may turn the walk into a new
//!    direction when `bend_at_and` is set. A walk that cannot extend is
//!    complete and its path is emitted.
//!
//! Stacked words in one cell are alternatives: each one forks the walk.
//! A walk never reuses a `(cell, role)` pair, which bounds bent paths.
//!
//! ## Post-processing
//!
//! - Paths whose entity sequence is a proper suffix of another path are
//!   dropped: `ROCK IS STOP` inside `WALL AND ROCK IS STOP` is not a
//!   sentence of its own.
//! - Paths that read another path's words backwards are dropped. A path
//!   whose reversed entity sequence sits inside a longer path loses to it;
//!   of two exact reverses, the one whose first step is a forward
//!   direction (E, SE, SW) is kept. `ROCK IS WALL` never also states
//!   `WALL IS ROCK`.
//! - Paths spelling the same words collapse into one phrase. Every path
//!   still lands in the direction grid under that phrase's id.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::direction::DirectionGrid;
use super::phrase::{Phrase, PhraseId, PhraseText, PhraseWord, WordRole};
use crate::core::{EngineConfig, EntityId, GridQuery, HexDirection, HexPos, Relation, TextType};

/// Output of one phrase search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Distinct phrases in discovery order. `PhraseId(i)` is `phrases[i]`.
    pub phrases: Vec<Phrase>,

    /// Per-cell directions for every emitted path.
    pub directions: DirectionGrid,
}

impl SearchResult {
    /// Number of distinct phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Check if no phrase was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Look up a phrase by id.
    #[must_use]
    pub fn get(&self, id: PhraseId) -> Option<&Phrase> {
        self.phrases.get(id.raw() as usize)
    }

    /// Check if some phrase spells exactly `words`.
    #[must_use]
    pub fn contains_text(&self, words: &[TextType]) -> bool {
        self.phrases.iter().any(|p| p.text().as_slice() == words)
    }

    /// Assert the grammar invariants the rule table relies on.
    ///
    /// # Panics
    ///
    /// Panics if a phrase is shorter than [`Phrase::MIN_WORDS`], takes fewer
    /// than two grid steps, has a non-adjacent step, or if a direction mark
    /// names a phrase that does not exist.
    pub fn assert_consistent(&self) {
        for phrase in &self.phrases {
            assert!(
                phrase.len() >= Phrase::MIN_WORDS,
                "phrase '{}' has {} words, minimum is {}",
                phrase,
                phrase.len(),
                Phrase::MIN_WORDS
            );
            assert!(phrase.steps() >= 2, "phrase '{}' takes fewer than 2 grid steps", phrase);
            assert!(phrase.is_contiguous(), "phrase '{}' is not contiguous", phrase);
        }
        self.directions.assert_consistent(self.phrases.len());
    }
}

/// What a walk expects in the next cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Subject,
    SubjectAfterAnd,
    Predicate,
    Extend,
}

/// One in-flight traversal.
#[derive(Clone, Debug)]
struct Walk {
    words: SmallVec<[PhraseWord; 8]>,
    direction: HexDirection,
    relation: Option<Relation>,
    stage: Stage,
}

impl Walk {
    fn start(word: TextType, position: HexPos, entity: EntityId, direction: HexDirection) -> Self {
        let mut words = SmallVec::new();
        words.push(PhraseWord { word, position, entity, role: WordRole::Subject });
        Self { words, direction, relation: None, stage: Stage::Subject }
    }

    fn head(&self) -> HexPos {
        self.words[self.words.len() - 1].position
    }

    fn visited(&self, position: HexPos, role: WordRole) -> bool {
        self.words.iter().any(|w| w.position == position && w.role == role)
    }

    fn subjects_accepted_by(&self, relation: Relation) -> bool {
        self.words
            .iter()
            .filter(|w| w.role == WordRole::Subject)
            .filter_map(|w| w.word.as_object())
            .all(|subject| relation.accepts_subject(subject))
    }

    fn push(&self, word: PhraseWord, stage: Stage) -> Self {
        let mut next = self.clone();
        next.words.push(word);
        next.stage = stage;
        next
    }
}

/// Find every sentence on the grid.
///
/// Pure: reads the grid, touches no engine state. Two calls on an
/// unchanged grid return equal results.
#[must_use]
pub fn search<G: GridQuery + ?Sized>(grid: &G, config: &EngineConfig) -> SearchResult {
    let mut paths = Vec::new();
    let mut stack = Vec::new();

    for r in 0..grid.height() {
        for q in 0..grid.width() {
            let pos = HexPos::new(q, r);
            for (entity, word) in grid.words_at(pos) {
                if !word.is_subject() {
                    continue;
                }
                for direction in HexDirection::ALL {
                    stack.push(Walk::start(word, pos, entity, direction));
                    walk(grid, config, &mut stack, &mut paths);
                }
            }
        }
    }

    let paths = drop_reverse_readings(drop_suffix_paths(paths));

    let mut result = SearchResult::default();
    let mut ids: FxHashMap<PhraseText, PhraseId> = FxHashMap::default();

    for path in paths {
        let id = *ids.entry(path.text()).or_insert_with(|| {
            let id = PhraseId::new(result.phrases.len() as u32);
            result.phrases.push(path.clone());
            id
        });
        result.directions.record_path(id, &path);
    }

    tracing::trace!(phrases = result.phrases.len(), cells = result.directions.len(), "phrase search complete");
    result
}

/// Drain the stack, emitting every completed path.
fn walk<G: GridQuery + ?Sized>(
    grid: &G,
    config: &EngineConfig,
    stack: &mut Vec<Walk>,
    out: &mut Vec<Phrase>,
) {
    while let Some(current) = stack.pop() {
        let mut forks: SmallVec<[Walk; 4]> = SmallVec::new();
        let next = current.head().neighbor(current.direction);

        match current.stage {
            Stage::Subject => {
                if !grid.in_bounds(next) {
                    continue;
                }
                for (entity, word) in grid.words_at(next) {
                    if let Some(relation) = word.as_relation() {
                        if current.visited(next, WordRole::Relation) || !current.subjects_accepted_by(relation) {
                            continue;
                        }
                        let mut fork = current.push(
                            PhraseWord { word, position: next, entity, role: WordRole::Relation },
                            Stage::Predicate,
                        );
                        fork.relation = Some(relation);
                        forks.push(fork);
                    } else if word.is_and() && config.subject_chaining && !current.visited(next, WordRole::Conjunction) {
                        forks.push(current.push(
                            PhraseWord { word, position: next, entity, role: WordRole::Conjunction },
                            Stage::SubjectAfterAnd,
                        ));
                    }
                }
            }

            Stage::SubjectAfterAnd => {
                if !grid.in_bounds(next) || current.visited(next, WordRole::Subject) {
                    continue;
                }
                for (entity, word) in grid.words_at(next) {
                    if word.is_subject() {
                        forks.push(current.push(
                            PhraseWord { word, position: next, entity, role: WordRole::Subject },
                            Stage::Subject,
                        ));
                    }
                }
            }

            Stage::Predicate => {
                let Some(relation) = current.relation else {
                    continue;
                };
                if !grid.in_bounds(next) || current.visited(next, WordRole::Predicate) {
                    continue;
                }
                for (entity, word) in grid.words_at(next) {
                    if relation.accepts_predicate(word) {
                        forks.push(current.push(
                            PhraseWord { word, position: next, entity, role: WordRole::Predicate },
                            Stage::Extend,
                        ));
                    }
                }
            }

            Stage::Extend => {
                forks = extensions(grid, config, &current);
                if forks.is_empty() {
                    out.push(Phrase::new(current.words));
                    continue;
                }
            }
        }

        // Reverse so forks pop in grid order
        stack.extend(forks.into_iter().rev());
    }
}

/// Every `AND <predicate>` continuation of a complete walk.
fn extensions<G: GridQuery + ?Sized>(grid: &G, config: &EngineConfig, current: &Walk) -> SmallVec<[Walk; 4]> {
    let mut forks = SmallVec::new();
    let Some(relation) = current.relation else {
        return forks;
    };

    let and_pos = current.head().neighbor(current.direction);
    if !grid.in_bounds(and_pos) || current.visited(and_pos, WordRole::Conjunction) {
        return forks;
    }

    let mut turns: SmallVec<[HexDirection; 6]> = SmallVec::new();
    turns.push(current.direction);
    if config.bend_at_and {
        let back = current.direction.opposite();
        turns.extend(HexDirection::ALL.into_iter().filter(|&d| d != current.direction && d != back));
    }

    for (and_entity, and_word) in grid.words_at(and_pos) {
        if !and_word.is_and() {
            continue;
        }
        for &direction in &turns {
            let pred_pos = and_pos.neighbor(direction);
            if !grid.in_bounds(pred_pos) || current.visited(pred_pos, WordRole::Predicate) {
                continue;
            }
            for (entity, word) in grid.words_at(pred_pos) {
                if !relation.accepts_predicate(word) {
                    continue;
                }
                let mut fork = current.push(
                    PhraseWord { word: and_word, position: and_pos, entity: and_entity, role: WordRole::Conjunction },
                    Stage::Extend,
                );
                fork.words.push(PhraseWord { word, position: pred_pos, entity, role: WordRole::Predicate });
                fork.direction = direction;
                forks.push(fork);
            }
        }
    }

    forks
}

/// Drop paths that are the tail end of a longer path.
fn drop_suffix_paths(paths: Vec<Phrase>) -> Vec<Phrase> {
    // Paths sharing a suffix share their last entity
    let mut by_last: FxHashMap<EntityId, Vec<usize>> = FxHashMap::default();
    for (i, path) in paths.iter().enumerate() {
        if let Some(last) = path.words().last() {
            by_last.entry(last.entity).or_default().push(i);
        }
    }

    let is_suffix_of = |short: &Phrase, long: &Phrase| {
        long.len() > short.len() && long.entity_path().rev().zip(short.entity_path().rev()).all(|(a, b)| a == b)
    };

    paths
        .iter()
        .enumerate()
        .filter(|(i, path)| {
            let Some(last) = path.words().last() else {
                return false;
            };
            !by_last[&last.entity]
                .iter()
                .any(|&j| j != *i && is_suffix_of(*path, &paths[j]))
        })
        .map(|(_, path)| path.clone())
        .collect()
}

/// Drop paths that read the words of another path backwards.
fn drop_reverse_readings(paths: Vec<Phrase>) -> Vec<Phrase> {
    let entities: Vec<SmallVec<[EntityId; 8]>> = paths.iter().map(|p| p.entity_path().collect()).collect();

    let mut containing: FxHashMap<EntityId, Vec<usize>> = FxHashMap::default();
    for (i, path) in entities.iter().enumerate() {
        for &entity in path {
            let holders = containing.entry(entity).or_default();
            if holders.last() != Some(&i) {
                holders.push(i);
            }
        }
    }

    let forward = |i: usize| paths[i].reading_direction().is_some_and(HexDirection::is_forward);

    // Whether path `i` loses to path `j`
    let loses_to = |i: usize, j: usize| {
        let (short, long) = (&entities[i], &entities[j]);
        if long.len() < short.len() {
            return false;
        }
        let reads_backwards = long.windows(short.len()).any(|w| w.iter().eq(short.iter().rev()));
        if !reads_backwards {
            return false;
        }
        long.len() > short.len() || (forward(j) && !forward(i)) || (forward(j) == forward(i) && j < i)
    };

    (0..paths.len())
        .filter(|&i| {
            let Some(last) = entities[i].last() else {
                return false;
            };
            !containing[last].iter().any(|&j| j != i && loses_to(i, j))
        })
        .map(|i| paths[i].clone())
        .collect()
}
