//! Engine configuration.
//!
//! The engine never reads ambient settings. Callers build an
//! `EngineConfig` once and pass it to every search and update.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::grants::{AbilitySet, PropertySet};
use super::words::ObjectType;
use crate::rules::RemovalReason;

/// One same-cell destruction rule.
///
/// When a cell holds an entity with any `destroyer` property and another
/// entity matching `victim`, the victim is removed with `reason`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralRule {
    /// Properties that make an entity destructive.
    pub destroyer: PropertySet,

    /// Properties that make an entity vulnerable.
    /// Empty means every non-word entity other than the destroyer.
    pub victim: PropertySet,

    /// Abilities that protect a would-be victim.
    pub immune: AbilitySet,

    /// Reason attached to the victim's removal.
    pub reason: RemovalReason,

    /// Is the destroyer used up? Consumed destroyers are removed with
    /// [`RemovalReason::Collateral`].
    pub consumes_destroyer: bool,
}

impl CollateralRule {
    /// Hot entities melt meltable ones and survive.
    #[must_use]
    pub fn heat() -> Self {
        Self {
            destroyer: PropertySet::HOT,
            victim: PropertySet::MELT,
            immune: AbilitySet::empty(),
            reason: RemovalReason::HeatDestroyed,
            consumes_destroyer: false,
        }
    }

    /// Sinking entities drown whatever shares their cell and go down with it.
    #[must_use]
    pub fn submersion() -> Self {
        Self {
            destroyer: PropertySet::SINK,
            victim: PropertySet::empty(),
            immune: AbilitySet::SWIM | AbilitySet::FLOAT,
            reason: RemovalReason::SubmersionDestroyed,
            consumes_destroyer: true,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard cap on apply/re-derive rounds per tick.
    /// Reaching it ends the tick with whatever rule state was reached.
    pub max_settle_iterations: u32,

    /// May a predicate chain turn a corner at an `AND`?
    pub bend_at_and: bool,

    /// Allow `A AND B IS ...` subject blocks.
    pub subject_chaining: bool,

    /// Same-cell destruction rules, evaluated in order.
    pub collateral: Vec<CollateralRule>,

    /// Category whose grant changes are reported as goal-relevant.
    pub goal_category: ObjectType,

    /// Category whose grant changes are reported as I-relevant.
    pub player_category: ObjectType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_settle_iterations: 8,
            bend_at_and: true,
            subject_chaining: true,
            collateral: vec![CollateralRule::heat(), CollateralRule::submersion()],
            goal_category: ObjectType::Goal,
            player_category: ObjectType::I,
        }
    }
}

impl EngineConfig {
    /// Set the settle iteration cap (builder pattern).
    #[must_use]
    pub fn with_max_settle_iterations(mut self, cap: u32) -> Self {
        self.max_settle_iterations = cap;
        self
    }

    /// Allow or forbid bends at `AND` (builder pattern).
    #[must_use]
    pub fn with_bend_at_and(mut self, bend: bool) -> Self {
        self.bend_at_and = bend;
        self
    }

    /// Allow or forbid subject chains (builder pattern).
    #[must_use]
    pub fn with_subject_chaining(mut self, enabled: bool) -> Self {
        self.subject_chaining = enabled;
        self
    }

    /// Replace the collateral rules (builder pattern).
    #[must_use]
    pub fn with_collateral(mut self, rules: Vec<CollateralRule>) -> Self {
        self.collateral = rules;
        self
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_settle_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if let Some(index) = self.collateral.iter().position(|rule| rule.destroyer.is_empty()) {
            return Err(ConfigError::EmptyDestroyer { index });
        }
        Ok(())
    }
}
