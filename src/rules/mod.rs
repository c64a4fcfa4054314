//! Rule derivation and application.
//!
//! - [`RuleSearch`] reads the phrases on the grid into a [`RuleTable`] and
//!   diffs it against the previous one.
//! - [`RuleExecute`] reconciles entity grants with the table and works out
//!   collateral removals and transform replacements.
//! - [`RuleEngine`] alternates the two until the grid settles.

pub mod engine;
pub mod execute;
pub mod search;
pub mod table;

pub use engine::{RuleEngine, TickReport};
pub use execute::{ExecuteOutcome, ExecuteStats, Removal, RemovalReason, Replacement, RuleExecute};
pub use search::{RuleEvents, RuleSearch};
pub use table::{GrantChange, Grants, RuleTable};
