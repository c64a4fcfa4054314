//! Settle loop driver.
//!
//! `RuleEngine` owns a builder, an applier and the configuration. A tick
//! alternates the two until the grid stops changing:
//!
//! 1. builder update, indicator events applied to the store
//! 2. applier update, removals and replacements applied to the store
//! 3. repeat while step 2 removed or replaced anything
//!
//! The loop is capped by `EngineConfig::max_settle_iterations`. Hitting the
//! cap is not an error: the tick ends with the rule state reached so far,
//! logs a warning, and flags [`TickReport::cap_hit`]. The builder stays dirty
//! so the next tick picks up where this one stopped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::execute::{ExecuteOutcome, Removal, RuleExecute};
use super::search::{RuleEvents, RuleSearch};
use super::table::RuleTable;
use crate::core::{ConfigError, EngineConfig, EntityId, EntityStore, HexPos};

/// Record of one settle loop.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Builder/applier rounds run.
    pub iterations: u32,

    /// Did the loop stop at the iteration cap?
    pub cap_hit: bool,

    /// Builder events, one per round.
    pub events: Vec<RuleEvents>,

    /// Applier outcomes, one per round.
    pub outcomes: Vec<ExecuteOutcome>,

    /// Entities spawned during the tick (indicators and replacements).
    pub spawned: Vec<EntityId>,
}

impl TickReport {
    /// Every removal performed during the tick, in order.
    pub fn removals(&self) -> impl Iterator<Item = &Removal> {
        self.outcomes.iter().flat_map(|o| o.removals.iter())
    }

    /// Anchor of the first new phrase formed during the tick.
    #[must_use]
    pub fn new_phrase_at(&self) -> Option<HexPos> {
        self.events.iter().find_map(|e| e.new_phrase_at)
    }

    /// Check if any round reported goal-relevant changes.
    #[must_use]
    pub fn goal_changed(&self) -> bool {
        self.events.iter().any(|e| e.goal_changed.is_some())
    }

    /// Check if any round reported I-relevant changes.
    #[must_use]
    pub fn i_changed(&self) -> bool {
        self.events.iter().any(|e| e.i_changed.is_some())
    }
}

/// Builder plus applier plus configuration.
#[derive(Clone, Debug)]
pub struct RuleEngine {
    config: EngineConfig,
    search: RuleSearch,
    execute: RuleExecute,
}

impl RuleEngine {
    /// Create an engine.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, search: RuleSearch::new(), execute: RuleExecute::new() })
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current grant table.
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        self.search.table()
    }

    /// The rule table builder.
    #[must_use]
    pub fn search(&self) -> &RuleSearch {
        &self.search
    }

    /// Mark the grid as changed. The next tick re-derives the rules.
    pub fn signal_state_change(&mut self) {
        self.search.signal_state_change();
    }

    /// Run the settle loop.
    pub fn tick<S: EntityStore + ?Sized>(&mut self, store: &mut S, elapsed: Duration) -> TickReport {
        let cap = self.config.max_settle_iterations;
        let mut report = TickReport::default();
        let mut step = elapsed;

        loop {
            report.iterations += 1;

            let events = self.search.update(store, &self.config, step);
            for &id in &events.removed_entities {
                store.despawn(id);
            }
            for spawn in &events.added_entities {
                report.spawned.push(store.spawn(spawn.clone()));
            }

            let outcome = self.execute.update(store, self.search.table(), &self.config, step);
            step = Duration::ZERO;

            let changed = outcome.state_changed;
            if changed {
                report.spawned.extend(outcome.apply_to(store));
                self.search.signal_state_change();
            }
            report.events.push(events);
            report.outcomes.push(outcome);

            if !changed {
                break;
            }
            if report.iterations >= cap {
                warn!(iterations = report.iterations, "rule settle loop hit its iteration cap");
                report.cap_hit = true;
                break;
            }
        }

        debug!(iterations = report.iterations, cap_hit = report.cap_hit, "tick settled");
        report
    }
}
