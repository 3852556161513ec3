//! Error types for the combat-tracker crate.
//!
//! Recording damage and resolving deaths never fail; only constructing a
//! tracker from an invalid configuration does.

/// Errors that can occur when setting up combat tracking.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The tracker configuration is unusable.
    #[error("invalid tracker configuration: {reason}")]
    InvalidConfig {
        /// Description of what is wrong with the configuration.
        reason: String,
    },
}
