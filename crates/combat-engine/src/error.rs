//! Error types for the combat engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode of loading configuration, loading a scenario and replaying it.

/// Top-level error for the combat engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: combat_core::ConfigError,
    },

    /// Scenario loading or resolution failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: crate::scenario::ScenarioError,
    },

    /// A scripted engine call was rejected.
    #[error("combat error: {source}")]
    Combat {
        /// The underlying combat error.
        #[from]
        source: combat_core::CombatError,
    },

    /// The replay report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
