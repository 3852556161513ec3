//! Tunables for per-entity combat logs.

use serde::Deserialize;

use crate::error::TrackerError;

/// Configuration shared by every [`CombatTracker`].
///
/// [`CombatTracker`]: crate::tracker::CombatTracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Ticks after which a combat entry expires (default: 300).
    #[serde(default = "default_retention_ticks")]
    pub retention_ticks: u64,

    /// Maximum entries kept per entity; the oldest is evicted first
    /// (default: 64).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_ticks: default_retention_ticks(),
            max_entries: default_max_entries(),
        }
    }
}

impl TrackerConfig {
    /// Reject configurations under which no entry could ever be kept.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidConfig`] if `retention_ticks` or
    /// `max_entries` is zero.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.retention_ticks == 0 {
            return Err(TrackerError::InvalidConfig {
                reason: "retention_ticks must be at least 1".to_owned(),
            });
        }
        if self.max_entries == 0 {
            return Err(TrackerError::InvalidConfig {
                reason: "max_entries must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

const fn default_retention_ticks() -> u64 {
    300
}

const fn default_max_entries() -> usize {
    64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrackerConfig::default();
        assert_eq!(config.retention_ticks, 300);
        assert_eq!(config.max_entries, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_retention_is_rejected() {
        let config = TrackerConfig {
            retention_ticks: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = TrackerConfig {
            max_entries: 0,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrackerConfig = serde_json::from_str(r#"{"retention_ticks": 40}"#).unwrap();
        assert_eq!(config.retention_ticks, 40);
        assert_eq!(config.max_entries, 64);
    }
}
