//! Recoverable errors.
//!
//! Only the entity store's placement API and configuration validation can
//! fail. Engine invariants are assertions.

use super::entity::EntityId;
use super::hex::HexPos;

/// Errors from the reference entity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("cell {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: HexPos, width: i32, height: i32 },

    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}

/// Errors from [`crate::core::EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_settle_iterations must be at least 1")]
    ZeroIterationCap,

    #[error("collateral rule {index} has no destroyer property")]
    EmptyDestroyer { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = WorldError::OutOfBounds { pos: HexPos::new(9, 0), width: 4, height: 3 };
        assert_eq!(err.to_string(), "cell (9, 0) is outside the 4x3 grid");

        let err = WorldError::EntityNotFound(EntityId(5));
        assert_eq!(err.to_string(), "entity not found: Entity(5)");

        let err = ConfigError::EmptyDestroyer { index: 1 };
        assert_eq!(err.to_string(), "collateral rule 1 has no destroyer property");
    }
}
