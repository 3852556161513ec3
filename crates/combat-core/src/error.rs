//! Error types for the combat-core crate.
//!
//! Host notifications never fail: lookup misses, unknown damage kinds and
//! unmatched death confirmations are recovered locally and logged. Errors
//! only reach callers of the synthetic damage API, and engine setup.

use combat_types::EntityId;

/// Errors returned by the combat manager.
#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// The entity is not in the tracked population.
    #[error("entity not tracked: {0}")]
    UntrackedEntity(EntityId),

    /// The host simulation has no record of the entity.
    #[error("entity unknown to the host simulation: {0}")]
    MissingHostEntity(EntityId),

    /// The tracker configuration is unusable.
    #[error("tracker error: {source}")]
    Tracker {
        /// The underlying tracker error.
        #[from]
        source: combat_tracker::TrackerError,
    },

    /// The engine configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },
}
