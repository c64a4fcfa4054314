//! Axial hex coordinates and the six traversal directions.
//!
//! ## Layout
//!
//! Cells use axial `(q, r)` coordinates. The level is stored as a rhombus:
//! a cell is in bounds when `0 <= q < width` and `0 <= r < height`.
//!
//! ```
//! use hex_rules::core::{HexDirection, HexPos};
//!
//! let origin = HexPos::new(2, 2);
//! let east = origin.neighbor(HexDirection::East);
//!
//! assert_eq!(east, HexPos::new(3, 2));
//! assert_eq!(origin.distance(east), 1);
//! assert_eq!(east.neighbor(HexDirection::West), origin);
//! ```

use serde::{Deserialize, Serialize};

/// Axial hex coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexPos {
    pub q: i32,
    pub r: i32,
}

impl HexPos {
    /// Create a new position.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The adjacent cell in `direction`.
    #[must_use]
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        let (dq, dr) = direction.offset();
        Self::new(self.q + dq, self.r + dr)
    }

    /// Hex distance (number of steps) between two cells.
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.unsigned_abs() + dr.unsigned_abs() + (dq + dr).unsigned_abs()) / 2
    }

    /// Check whether `other` shares an edge with this cell.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// Direction of the single step from `self` to `other`, if they are adjacent.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|&dir| self.neighbor(dir) == other)
    }
}

impl std::fmt::Display for HexPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// One of the six hex directions.
///
/// Declaration order is the order the phrase search tries directions in,
/// which keeps discovery order deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// All directions, in search order.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Axial `(dq, dr)` step for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    /// Check if this is one of the three directions a sentence reads in
    /// when its words also spell a sentence backwards.
    ///
    /// Exactly one of each opposite pair is forward.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, HexDirection::East | HexDirection::SouthWest | HexDirection::SouthEast)
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }
}
