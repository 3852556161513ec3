//! Combat logs and death resolution for tracked entities.
//!
//! This crate holds everything that operates on one entity's combat state
//! without talking to the host simulation. The orchestration layer in
//! `combat-core` owns one [`CombatTracker`] per tracked entity and drives
//! it from host notifications.
//!
//! # Modules
//!
//! - [`config`] -- Retention and capacity of combat logs ([`TrackerConfig`])
//! - [`death_event`] -- The cancellable death payload ([`CombatDeathEvent`])
//! - [`entry`] -- One recorded damage occurrence ([`CombatEntry`])
//! - [`error`] -- Error types ([`TrackerError`])
//! - [`message`] -- Death message templates
//! - [`tracker`] -- The per-entity rolling log ([`CombatTracker`])
//! - [`translator`] -- Damage kind to death cause translation
//!   ([`TranslatorRegistry`])

pub mod config;
pub mod death_event;
pub mod entry;
pub mod error;
pub mod message;
pub mod tracker;
pub mod translator;

pub use config::TrackerConfig;
pub use death_event::{CombatDeathEvent, DeathResolution};
pub use entry::CombatEntry;
pub use error::TrackerError;
pub use tracker::{CombatTracker, TrackerState};
pub use translator::{DeathCauseTranslator, TranslatorRegistry};
