//! Per-cell traversal metadata for directional rendering cues.
//!
//! Each cell touched by a discovered phrase records which phrase passes
//! through it, the direction the phrase is read in at that cell, and
//! whether the cell starts, continues or ends the phrase. Duplicate paths
//! (same words elsewhere on the grid) are recorded under the id of the
//! phrase they duplicate.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::phrase::{Phrase, PhraseId};
use crate::core::{HexDirection, HexPos};

/// Position of a cell within a phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseRole {
    Start,
    Middle,
    End,
}

/// One phrase passing through a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionMark {
    pub phrase: PhraseId,

    /// Outgoing direction, or incoming direction for the last word.
    pub direction: HexDirection,

    pub role: PhraseRole,
}

/// Per-cell phrase directions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionGrid {
    cells: FxHashMap<HexPos, SmallVec<[DirectionMark; 2]>>,
}

impl DirectionGrid {
    /// Create an empty direction grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks recorded at `pos`.
    #[must_use]
    pub fn at(&self, pos: HexPos) -> &[DirectionMark] {
        self.cells.get(&pos).map_or(&[], |marks| marks.as_slice())
    }

    /// Number of cells with at least one mark.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all marked cells.
    pub fn iter(&self) -> impl Iterator<Item = (HexPos, &[DirectionMark])> {
        self.cells.iter().map(|(&pos, marks)| (pos, marks.as_slice()))
    }

    /// Record every cell of a phrase path under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the path has fewer than two words or if two consecutive
    /// words are not adjacent.
    pub fn record_path(&mut self, id: PhraseId, path: &Phrase) {
        let words = path.words();
        assert!(words.len() >= 2, "phrase {} has {} words, a path needs at least 2", id, words.len());
        let last = words.len() - 1;

        for (i, w) in words.iter().enumerate() {
            let (from, to) = if i < last {
                (w.position, words[i + 1].position)
            } else {
                (words[i - 1].position, w.position)
            };
            let direction = from
                .direction_to(to)
                .unwrap_or_else(|| panic!("phrase {} steps from {} to non-adjacent {}", id, from, to));

            let role = match i {
                0 => PhraseRole::Start,
                i if i == last => PhraseRole::End,
                _ => PhraseRole::Middle,
            };

            self.record(w.position, DirectionMark { phrase: id, direction, role });
        }
    }

    fn record(&mut self, pos: HexPos, mark: DirectionMark) {
        let marks = self.cells.entry(pos).or_default();
        if !marks.contains(&mark) {
            marks.push(mark);
        }
    }

    /// Assert every mark names one of `phrase_count` phrases.
    ///
    /// # Panics
    ///
    /// Panics on a mark with no corresponding phrase.
    pub fn assert_consistent(&self, phrase_count: usize) {
        for (pos, marks) in &self.cells {
            for mark in marks {
                assert!(
                    (mark.phrase.raw() as usize) < phrase_count,
                    "direction mark at {} names {} but only {} phrases exist",
                    pos,
                    mark.phrase,
                    phrase_count
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, TextType};
    use crate::phrases::phrase::{PhraseWord, WordRole};
    use smallvec::smallvec;

    fn bent_path() -> Phrase {
        // WALL IS STOP AND PUSH, turning north-east at AND
        let at = |word: TextType, q: i32, r: i32, role: WordRole| PhraseWord {
            word,
            position: HexPos::new(q, r),
            entity: EntityId((q * 10 + r) as u32),
            role,
        };
        Phrase::new(smallvec![
            at(TextType::Wall, 0, 2, WordRole::Subject),
            at(TextType::Is, 1, 2, WordRole::Relation),
            at(TextType::Stop, 2, 2, WordRole::Predicate),
            at(TextType::And, 3, 2, WordRole::Conjunction),
            at(TextType::Push, 4, 1, WordRole::Predicate),
        ])
    }

    #[test]
    fn test_record_path_roles_and_directions() {
        let mut grid = DirectionGrid::new();
        grid.record_path(PhraseId::new(0), &bent_path());

        assert_eq!(grid.len(), 5);
        assert_eq!(
            grid.at(HexPos::new(0, 2)),
            &[DirectionMark { phrase: PhraseId::new(0), direction: HexDirection::East, role: PhraseRole::Start }]
        );
        assert_eq!(grid.at(HexPos::new(2, 2))[0].role, PhraseRole::Middle);
        assert_eq!(grid.at(HexPos::new(3, 2))[0].direction, HexDirection::NorthEast);
        assert_eq!(
            grid.at(HexPos::new(4, 1)),
            &[DirectionMark { phrase: PhraseId::new(0), direction: HexDirection::NorthEast, role: PhraseRole::End }]
        );
        assert!(grid.at(HexPos::new(5, 5)).is_empty());
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut grid = DirectionGrid::new();
        grid.record_path(PhraseId::new(0), &bent_path());
        let once = grid.clone();
        grid.record_path(PhraseId::new(0), &bent_path());

        assert_eq!(grid, once);
    }

    #[test]
    fn test_assert_consistent_accepts_known_ids() {
        let mut grid = DirectionGrid::new();
        grid.record_path(PhraseId::new(1), &bent_path());
        grid.assert_consistent(2);
    }

    #[test]
    #[should_panic(expected = "a path needs at least 2")]
    fn test_record_path_rejects_single_word() {
        let lone = Phrase::new(bent_path().words()[..1].iter().copied().collect());
        DirectionGrid::new().record_path(PhraseId::new(0), &lone);
    }

    #[test]
    #[should_panic(expected = "only 1 phrases exist")]
    fn test_assert_consistent_rejects_dangling_mark() {
        let mut grid = DirectionGrid::new();
        grid.record_path(PhraseId::new(3), &bent_path());
        grid.assert_consistent(1);
    }
}
