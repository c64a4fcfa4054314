//! Fixed-width capability sets carried by every entity.
//!
//! Grants are closed: each property or ability is one bit. "Has property X"
//! checks are a mask test, and reconciling an entity against the rule
//! table is a single assignment.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Properties an object category can be granted with `IS`.
    ///
    /// `GOAL` is never spelled as a property word. It marks entities whose
    /// category is associated with the goal through `X IS GOAL`.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PropertySet: u32 {
        const STOP   = 1 << 0;
        const PUSH   = 1 << 1;
        const PULL   = 1 << 2;
        const HOT    = 1 << 3;
        const MELT   = 1 << 4;
        const SINK   = 1 << 5;
        const BLUE   = 1 << 6;
        const GREEN  = 1 << 7;
        const GREY   = 1 << 8;
        const YELLOW = 1 << 9;
        const RED    = 1 << 10;
        const PURPLE = 1 << 11;
        const GOAL   = 1 << 12;
    }
}

bitflags::bitflags! {
    /// Abilities an object category can be granted with `CAN`.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AbilitySet: u8 {
        const CLIMB = 1 << 0;
        const JUMP  = 1 << 1;
        const SWIM  = 1 << 2;
        const FLOAT = 1 << 3;
    }
}

impl PropertySet {
    /// Tint properties; at most one is normally visible, but all are tracked.
    pub const COLORS: PropertySet = PropertySet::BLUE
        .union(PropertySet::GREEN)
        .union(PropertySet::GREY)
        .union(PropertySet::YELLOW)
        .union(PropertySet::RED)
        .union(PropertySet::PURPLE);

    /// Check if an entity with these properties blocks movement.
    ///
    /// Read by the movement collaborator; the engine never enforces it.
    #[must_use]
    pub fn blocks_movement(self) -> bool {
        self.intersects(PropertySet::STOP | PropertySet::PUSH | PropertySet::PULL)
    }
}
